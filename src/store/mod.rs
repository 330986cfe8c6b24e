//! Persistence contract for boards, columns and cards.
//!
//! Every service operation opens one [`StoreTx`], performs its reads and writes
//! through it, and calls [`StoreTx::commit`]. A transaction dropped without commit
//! is rolled back, so a failure part-way through leaves committed state untouched.
//!
//! Lookups and deletes are always filtered by the owning board ID. A row that belongs
//! to another board behaves exactly like a missing row.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{Board, Card, CardPatch, Column};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A source of transactions.
#[async_trait]
pub trait BoardStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError>;
}

/// One atomic unit of work against the boards, columns and cards tables.
///
/// Methods returning `u64` report the number of rows affected.
#[async_trait]
pub trait StoreTx: Send {
    async fn insert_board(&mut self, board: &Board) -> Result<(), AppError>;

    async fn find_board(&mut self, board_id: &str) -> Result<Option<Board>, AppError>;

    async fn list_columns(&mut self, board_id: &str) -> Result<Vec<Column>, AppError>;

    async fn list_cards(&mut self, board_id: &str) -> Result<Vec<Card>, AppError>;

    async fn column_orders(&mut self, board_id: &str) -> Result<Vec<i32>, AppError>;

    async fn insert_column(&mut self, column: &Column) -> Result<(), AppError>;

    async fn find_column(
        &mut self,
        board_id: &str,
        column_id: &str,
    ) -> Result<Option<Column>, AppError>;

    async fn rename_column(
        &mut self,
        board_id: &str,
        column_id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError>;

    /// Deletes the column's cards, then the column itself. Returns the number of
    /// columns removed.
    async fn delete_column(&mut self, board_id: &str, column_id: &str) -> Result<u64, AppError>;

    async fn card_orders(&mut self, board_id: &str, column_id: &str)
        -> Result<Vec<i32>, AppError>;

    async fn insert_card(&mut self, card: &Card) -> Result<(), AppError>;

    async fn find_card(&mut self, board_id: &str, card_id: &str)
        -> Result<Option<Card>, AppError>;

    /// Writes only the fields present in `patch`.
    async fn update_card(
        &mut self,
        board_id: &str,
        card_id: &str,
        patch: &CardPatch,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError>;

    /// Reassigns a card's column and order.
    async fn place_card(
        &mut self,
        board_id: &str,
        card_id: &str,
        column_id: &str,
        order: i32,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError>;

    async fn delete_card(&mut self, board_id: &str, card_id: &str) -> Result<u64, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}
