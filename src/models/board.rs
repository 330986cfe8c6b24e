use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{Card, Column};
use crate::ordering::sort_for_display;

lazy_static! {
    // Board IDs are 32 lowercase hex characters.
    static ref BOARD_ID_REGEX: Regex = Regex::new(r"^[0-9a-f]{32}$").unwrap();
}

/// Whether `id` has the shape of a board ID.
pub fn is_board_id(id: &str) -> bool {
    BOARD_ID_REGEX.is_match(id)
}

/// Top-level, password-protected task container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Board {
    /// Globally unique and immutable once created.
    pub id: String,
    pub name: String,
    /// bcrypt hash; never leaves the server.
    #[serde(skip)]
    pub password_hash: String,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(name: impl Into<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: super::generate_id(),
            name: name.into(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A column together with its cards, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnView {
    #[serde(flatten)]
    pub column: Column,
    pub cards: Vec<Card>,
}

/// Read-only projection of a whole board: columns by order, cards by order within
/// each column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    #[serde(flatten)]
    pub board: Board,
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    /// Groups `cards` under their columns and sorts both levels for display.
    ///
    /// Cards whose column is not among `columns` are dropped.
    pub fn assemble(board: Board, mut columns: Vec<Column>, mut cards: Vec<Card>) -> Self {
        sort_for_display(&mut columns);
        sort_for_display(&mut cards);

        let mut views: Vec<ColumnView> = columns
            .into_iter()
            .map(|column| ColumnView {
                column,
                cards: Vec::new(),
            })
            .collect();

        for card in cards {
            if let Some(view) = views.iter_mut().find(|v| v.column.id == card.column_id) {
                view.cards.push(card);
            }
        }

        Self {
            board,
            columns: views,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateBoardRequest {
    #[validate(length(min = 1, max = 255, message = "Board name is required"))]
    pub name: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub board_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateCardRequest;
    use pretty_assertions::assert_eq;

    fn card(board_id: &str, column_id: &str, title: &str, order: i32) -> Card {
        Card::new(
            board_id,
            CreateCardRequest {
                title: title.into(),
                description: None,
                assignee: None,
                deadline: None,
                column_id: column_id.into(),
            },
            order,
        )
    }

    #[test]
    fn test_board_id_shape() {
        assert!(is_board_id("0123456789abcdef0123456789abcdef"));
        assert!(!is_board_id("0123456789ABCDEF0123456789ABCDEF"));
        assert!(!is_board_id("short"));
        assert!(!is_board_id("../../etc/passwd"));
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let board = Board::new("Sprint1", "$2b$04$hash".into());
        let json = serde_json::to_value(&board).unwrap();

        assert_eq!(json["name"], "Sprint1");
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("$2b$04$hash"));
    }

    #[test]
    fn test_assemble_sorts_columns_and_cards() {
        let board = Board::new("Sprint1", String::new());
        let mut columns = Column::defaults_for(&board.id);
        columns.reverse();
        let todo = columns[2].id.clone();
        let doing = columns[1].id.clone();

        let cards = vec![
            card(&board.id, &todo, "second", 2),
            card(&board.id, &doing, "moved", 1),
            card(&board.id, &todo, "first", 1),
            card(&board.id, "deleted-column", "orphan", 1),
        ];

        let view = BoardView::assemble(board, columns, cards);

        let orders: Vec<_> = view.columns.iter().map(|v| v.column.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);

        let titles: Vec<_> = view.columns[0].cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert_eq!(view.columns[1].column.id, doing);
        assert_eq!(view.columns[1].cards.len(), 1);
        assert!(view.columns[2].cards.is_empty());
    }

    #[test]
    fn test_create_board_validation() {
        let valid = CreateBoardRequest {
            name: "Sprint1".into(),
            password: "secret1".into(),
        };
        assert!(valid.validate().is_ok());

        let short_password = CreateBoardRequest {
            name: "Sprint1".into(),
            password: "12345".into(),
        };
        assert!(short_password.validate().is_err());

        let empty_name = CreateBoardRequest {
            name: "".into(),
            password: "secret1".into(),
        };
        assert!(empty_name.validate().is_err());
    }
}
