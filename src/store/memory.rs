use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{BoardStore, StoreTx};
use crate::error::AppError;
use crate::models::{Board, Card, CardPatch, Column};

#[derive(Debug, Clone, Default)]
struct Tables {
    boards: HashMap<String, Board>,
    columns: HashMap<String, Column>,
    cards: HashMap<String, Card>,
}

/// Process-local store used by tests and for running without a database.
///
/// Transactions hold an exclusive lock from `begin` until commit or drop and write to
/// a staged copy, so they are fully serialized and a dropped transaction leaves no
/// trace.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let committed = self.tables.clone().lock_owned().await;
        let staged = committed.clone();
        Ok(Box::new(MemoryTx { committed, staged }))
    }
}

struct MemoryTx {
    committed: OwnedMutexGuard<Tables>,
    staged: Tables,
}

fn constraint(message: &str) -> AppError {
    AppError::DatabaseError(message.to_string())
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn insert_board(&mut self, board: &Board) -> Result<(), AppError> {
        if self.staged.boards.contains_key(&board.id) {
            return Err(constraint("duplicate key value violates boards_pkey"));
        }
        self.staged.boards.insert(board.id.clone(), board.clone());
        Ok(())
    }

    async fn find_board(&mut self, board_id: &str) -> Result<Option<Board>, AppError> {
        Ok(self.staged.boards.get(board_id).cloned())
    }

    async fn list_columns(&mut self, board_id: &str) -> Result<Vec<Column>, AppError> {
        Ok(self
            .staged
            .columns
            .values()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn list_cards(&mut self, board_id: &str) -> Result<Vec<Card>, AppError> {
        Ok(self
            .staged
            .cards
            .values()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn column_orders(&mut self, board_id: &str) -> Result<Vec<i32>, AppError> {
        Ok(self
            .staged
            .columns
            .values()
            .filter(|c| c.board_id == board_id)
            .map(|c| c.order)
            .collect())
    }

    async fn insert_column(&mut self, column: &Column) -> Result<(), AppError> {
        if !self.staged.boards.contains_key(&column.board_id) {
            return Err(constraint("columns.board_id violates foreign key"));
        }
        if self.staged.columns.contains_key(&column.id) {
            return Err(constraint("duplicate key value violates columns_pkey"));
        }
        self.staged.columns.insert(column.id.clone(), column.clone());
        Ok(())
    }

    async fn find_column(
        &mut self,
        board_id: &str,
        column_id: &str,
    ) -> Result<Option<Column>, AppError> {
        Ok(self
            .staged
            .columns
            .get(column_id)
            .filter(|c| c.board_id == board_id)
            .cloned())
    }

    async fn rename_column(
        &mut self,
        board_id: &str,
        column_id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        match self.staged.columns.get_mut(column_id) {
            Some(column) if column.board_id == board_id => {
                column.name = name.to_string();
                column.updated_at = now;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_column(&mut self, board_id: &str, column_id: &str) -> Result<u64, AppError> {
        self.staged
            .cards
            .retain(|_, card| !(card.board_id == board_id && card.column_id == column_id));

        let owned = self
            .staged
            .columns
            .get(column_id)
            .map_or(false, |c| c.board_id == board_id);
        if owned {
            self.staged.columns.remove(column_id);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn card_orders(
        &mut self,
        board_id: &str,
        column_id: &str,
    ) -> Result<Vec<i32>, AppError> {
        Ok(self
            .staged
            .cards
            .values()
            .filter(|c| c.board_id == board_id && c.column_id == column_id)
            .map(|c| c.order)
            .collect())
    }

    async fn insert_card(&mut self, card: &Card) -> Result<(), AppError> {
        if !self.staged.boards.contains_key(&card.board_id) {
            return Err(constraint("cards.board_id violates foreign key"));
        }
        if !self.staged.columns.contains_key(&card.column_id) {
            return Err(constraint("cards.column_id violates foreign key"));
        }
        if self.staged.cards.contains_key(&card.id) {
            return Err(constraint("duplicate key value violates cards_pkey"));
        }
        self.staged.cards.insert(card.id.clone(), card.clone());
        Ok(())
    }

    async fn find_card(
        &mut self,
        board_id: &str,
        card_id: &str,
    ) -> Result<Option<Card>, AppError> {
        Ok(self
            .staged
            .cards
            .get(card_id)
            .filter(|c| c.board_id == board_id)
            .cloned())
    }

    async fn update_card(
        &mut self,
        board_id: &str,
        card_id: &str,
        patch: &CardPatch,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        match self.staged.cards.get_mut(card_id) {
            Some(card) if card.board_id == board_id => {
                patch.apply_to(card, now);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn place_card(
        &mut self,
        board_id: &str,
        card_id: &str,
        column_id: &str,
        order: i32,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        if !self.staged.columns.contains_key(column_id) {
            return Err(constraint("cards.column_id violates foreign key"));
        }
        match self.staged.cards.get_mut(card_id) {
            Some(card) if card.board_id == board_id => {
                card.column_id = column_id.to_string();
                card.order = order;
                card.updated_at = now;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_card(&mut self, board_id: &str, card_id: &str) -> Result<u64, AppError> {
        let owned = self
            .staged
            .cards
            .get(card_id)
            .map_or(false, |c| c.board_id == board_id);
        if owned {
            self.staged.cards.remove(card_id);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryTx {
            mut committed,
            staged,
        } = *self;
        *committed = staged;
        Ok(())
    }
}
