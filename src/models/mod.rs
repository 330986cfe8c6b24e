pub mod board;
pub mod card;
pub mod column;

pub use board::{
    is_board_id, Board, BoardView, ColumnView, CreateBoardRequest, LoginRequest, LoginResponse,
};
pub use card::{Card, CardPatch, CreateCardRequest, MoveCardRequest, UpdateCardRequest};
pub use column::{Column, ColumnInput, DEFAULT_COLUMNS};

use uuid::Uuid;

/// Generates an opaque 32-character lowercase hex identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
