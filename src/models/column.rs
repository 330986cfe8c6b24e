use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ordering::Ordered;

/// Names of the columns every new board starts with, in display order.
pub const DEFAULT_COLUMNS: [&str; 3] = ["Актуальные задачи", "В работе", "Выполнено"];

/// A named, ordered bucket of cards within one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Column {
    pub id: String,
    /// Owning board; never changes after creation.
    pub board_id: String,
    pub name: String,
    /// Display position within the board, assigned append-only.
    #[sqlx(rename = "order_num")]
    pub order: i32,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: DateTime<Utc>,
}

impl Column {
    pub fn new(board_id: &str, name: impl Into<String>, order: i32) -> Self {
        let now = Utc::now();
        Self {
            id: super::generate_id(),
            board_id: board_id.to_string(),
            name: name.into(),
            order,
            created_at: now,
            updated_at: now,
        }
    }

    /// The three columns created together with a board, ordered 1, 2, 3.
    pub fn defaults_for(board_id: &str) -> Vec<Column> {
        DEFAULT_COLUMNS
            .iter()
            .zip(1..)
            .map(|(name, order)| Column::new(board_id, *name, order))
            .collect()
    }
}

impl Ordered for Column {
    fn order(&self) -> i32 {
        self.order
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for creating or renaming a column.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ColumnInput {
    #[validate(length(min = 1, max = 100, message = "Column name is required"))]
    pub name: String,
}
