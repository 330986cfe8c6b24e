use actix_web::{delete, post, put, web, HttpResponse, Responder};
use serde_json::json;

use crate::{
    auth::AuthenticatedBoard,
    error::AppError,
    models::{CreateCardRequest, MoveCardRequest, UpdateCardRequest},
    service::BoardService,
};

/// Creates a card at the end of the given column.
///
/// ## Request Body:
/// - `title` (required), `column_id` (required)
/// - `description`, `assignee`, `deadline` (optional)
///
/// ## Responses:
/// - `201 Created`: the new card.
/// - `404 Not Found`: the column is not on this board.
/// - `422 Unprocessable Entity`: missing title or column ID.
#[post("")]
pub async fn create_card(
    service: web::Data<BoardService>,
    board: AuthenticatedBoard,
    body: web::Json<CreateCardRequest>,
) -> Result<impl Responder, AppError> {
    let card = service.create_card(board.id(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(card))
}

/// Partially updates a card.
///
/// Only non-empty fields are written; an empty string leaves the stored value as is,
/// so fields cannot be cleared this way.
#[put("/{card_id}")]
pub async fn update_card(
    service: web::Data<BoardService>,
    board: AuthenticatedBoard,
    card_id: web::Path<String>,
    body: web::Json<UpdateCardRequest>,
) -> Result<impl Responder, AppError> {
    let card = service
        .update_card(board.id(), &card_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(card))
}

/// Moves a card to the end of another column. Moving into the current column is a
/// no-op that returns the card unchanged.
#[put("/{card_id}/move")]
pub async fn move_card(
    service: web::Data<BoardService>,
    board: AuthenticatedBoard,
    card_id: web::Path<String>,
    body: web::Json<MoveCardRequest>,
) -> Result<impl Responder, AppError> {
    let card = service
        .move_card(board.id(), &card_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(card))
}

#[delete("/{card_id}")]
pub async fn delete_card(
    service: web::Data<BoardService>,
    board: AuthenticatedBoard,
    card_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    service.delete_card(board.id(), &card_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Card deleted" })))
}
