//! Board use cases: each public method is one atomic unit of work.
//!
//! Every method past `create_board` and `login` takes the board ID proven by the
//! caller's credential as an explicit argument. Entities owned by another board are
//! reported as not found.

use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::auth::{Credential, IdentityBroker};
use crate::error::AppError;
use crate::models::{
    is_board_id, Board, BoardView, Card, CardPatch, Column, ColumnInput, CreateBoardRequest,
    CreateCardRequest, MoveCardRequest, UpdateCardRequest,
};
use crate::ordering::{is_no_op_move, next_order};
use crate::store::{BoardStore, StoreTx};

const INVALID_LOGIN: &str = "Invalid board or password";

pub struct BoardService {
    store: Arc<dyn BoardStore>,
    identity: Arc<IdentityBroker>,
}

impl BoardService {
    pub fn new(store: Arc<dyn BoardStore>, identity: Arc<IdentityBroker>) -> Self {
        Self { store, identity }
    }

    pub fn identity(&self) -> &Arc<IdentityBroker> {
        &self.identity
    }

    /// Creates a board with its three default columns and signs the creator in.
    pub async fn create_board(
        &self,
        input: CreateBoardRequest,
    ) -> Result<(BoardView, Credential), AppError> {
        input.validate()?;

        let password_hash = self.identity.hash_password(&input.password)?;
        let board = Board::new(input.name, password_hash);
        let columns = Column::defaults_for(&board.id);

        let mut tx = self.store.begin().await?;
        tx.insert_board(&board).await?;
        for column in &columns {
            tx.insert_column(column).await?;
        }
        tx.commit().await?;

        let credential = self.identity.issue_credential(&board.id)?;
        log::info!("Created board {}", board.id);

        Ok((BoardView::assemble(board, columns, Vec::new()), credential))
    }

    /// Exchanges a board password for a credential.
    ///
    /// An unknown board and a wrong password are indistinguishable to the caller.
    pub async fn login(&self, board_id: &str, password: &str) -> Result<Credential, AppError> {
        if !is_board_id(board_id) {
            log::debug!("Login rejected: malformed board id");
            return Err(AppError::Unauthorized(INVALID_LOGIN.into()));
        }

        let board = {
            let mut tx = self.store.begin().await?;
            let board = tx.find_board(board_id).await?;
            tx.commit().await?;
            board
        };

        let board = match board {
            Some(board) => board,
            None => {
                log::debug!("Login rejected: board {} does not exist", board_id);
                return Err(AppError::Unauthorized(INVALID_LOGIN.into()));
            }
        };

        if !self.identity.verify_password(&board.password_hash, password)? {
            log::warn!("Login rejected: wrong password for board {}", board_id);
            return Err(AppError::Unauthorized(INVALID_LOGIN.into()));
        }

        log::info!("Signed in to board {}", board_id);
        self.identity.issue_credential(board_id)
    }

    pub async fn get_board(&self, board_id: &str) -> Result<BoardView, AppError> {
        let mut tx = self.store.begin().await?;
        let view = load_board(tx.as_mut(), board_id).await?;
        tx.commit().await?;
        Ok(view)
    }

    /// Appends a column after the board's current last column.
    pub async fn create_column(
        &self,
        board_id: &str,
        input: ColumnInput,
    ) -> Result<Column, AppError> {
        input.validate()?;

        let mut tx = self.store.begin().await?;
        require_board(tx.as_mut(), board_id).await?;

        let order = next_order(tx.column_orders(board_id).await?);
        let column = Column::new(board_id, input.name, order);
        tx.insert_column(&column).await?;
        tx.commit().await?;

        log::debug!("Board {}: added column {} at {}", board_id, column.id, order);
        Ok(column)
    }

    pub async fn update_column(
        &self,
        board_id: &str,
        column_id: &str,
        input: ColumnInput,
    ) -> Result<Column, AppError> {
        input.validate()?;

        let mut tx = self.store.begin().await?;
        let renamed = tx
            .rename_column(board_id, column_id, &input.name, Utc::now())
            .await?;
        if renamed == 0 {
            return Err(AppError::not_found("Column"));
        }
        let column = tx
            .find_column(board_id, column_id)
            .await?
            .ok_or_else(|| AppError::not_found("Column"))?;
        tx.commit().await?;

        Ok(column)
    }

    /// Deletes a column together with every card in it.
    pub async fn delete_column(&self, board_id: &str, column_id: &str) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        if tx.delete_column(board_id, column_id).await? == 0 {
            return Err(AppError::not_found("Column"));
        }
        tx.commit().await?;

        log::debug!("Board {}: deleted column {}", board_id, column_id);
        Ok(())
    }

    /// Appends a card after the last card of its column.
    pub async fn create_card(
        &self,
        board_id: &str,
        input: CreateCardRequest,
    ) -> Result<Card, AppError> {
        input.validate()?;

        let mut tx = self.store.begin().await?;
        require_board(tx.as_mut(), board_id).await?;
        require_column(tx.as_mut(), board_id, &input.column_id).await?;

        let order = next_order(tx.card_orders(board_id, &input.column_id).await?);
        let card = Card::new(board_id, input, order);
        tx.insert_card(&card).await?;
        tx.commit().await?;

        Ok(card)
    }

    /// Applies the non-empty fields of `input` and returns the reloaded card.
    pub async fn update_card(
        &self,
        board_id: &str,
        card_id: &str,
        input: UpdateCardRequest,
    ) -> Result<Card, AppError> {
        input.validate()?;
        let patch = CardPatch::from(input);

        let mut tx = self.store.begin().await?;
        let card = require_card(tx.as_mut(), board_id, card_id).await?;
        if patch.is_empty() {
            return Ok(card);
        }

        tx.update_card(board_id, card_id, &patch, Utc::now()).await?;
        let card = require_card(tx.as_mut(), board_id, card_id).await?;
        tx.commit().await?;

        Ok(card)
    }

    /// Moves a card to the end of another column of the same board.
    ///
    /// Targeting the card's current column is a no-op and writes nothing. The
    /// requested `order`, if any, is ignored.
    pub async fn move_card(
        &self,
        board_id: &str,
        card_id: &str,
        input: MoveCardRequest,
    ) -> Result<Card, AppError> {
        input.validate()?;
        if let Some(order) = input.order {
            log::debug!("Ignoring requested order {} for card {}", order, card_id);
        }

        let mut tx = self.store.begin().await?;
        let card = require_card(tx.as_mut(), board_id, card_id).await?;
        if is_no_op_move(&card.column_id, &input.column_id) {
            return Ok(card);
        }
        require_column(tx.as_mut(), board_id, &input.column_id).await?;

        let order = next_order(tx.card_orders(board_id, &input.column_id).await?);
        tx.place_card(board_id, card_id, &input.column_id, order, Utc::now())
            .await?;
        let card = require_card(tx.as_mut(), board_id, card_id).await?;
        tx.commit().await?;

        log::debug!(
            "Board {}: moved card {} to column {} at {}",
            board_id,
            card_id,
            card.column_id,
            order
        );
        Ok(card)
    }

    pub async fn delete_card(&self, board_id: &str, card_id: &str) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        if tx.delete_card(board_id, card_id).await? == 0 {
            return Err(AppError::not_found("Card"));
        }
        tx.commit().await?;
        Ok(())
    }
}

async fn require_board(tx: &mut dyn StoreTx, board_id: &str) -> Result<Board, AppError> {
    tx.find_board(board_id)
        .await?
        .ok_or_else(|| AppError::not_found("Board"))
}

async fn require_column(
    tx: &mut dyn StoreTx,
    board_id: &str,
    column_id: &str,
) -> Result<Column, AppError> {
    tx.find_column(board_id, column_id)
        .await?
        .ok_or_else(|| {
            log::debug!("Column {} not found on board {}", column_id, board_id);
            AppError::not_found("Column")
        })
}

async fn require_card(
    tx: &mut dyn StoreTx,
    board_id: &str,
    card_id: &str,
) -> Result<Card, AppError> {
    tx.find_card(board_id, card_id)
        .await?
        .ok_or_else(|| {
            log::debug!("Card {} not found on board {}", card_id, board_id);
            AppError::not_found("Card")
        })
}

async fn load_board(tx: &mut dyn StoreTx, board_id: &str) -> Result<BoardView, AppError> {
    let board = require_board(tx, board_id).await?;
    let columns = tx.list_columns(board_id).await?;
    let cards = tx.list_cards(board_id).await?;
    Ok(BoardView::assemble(board, columns, cards))
}
