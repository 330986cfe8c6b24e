use actix_web::{delete, post, put, web, HttpResponse, Responder};
use serde_json::json;

use crate::{
    auth::AuthenticatedBoard, error::AppError, models::ColumnInput, service::BoardService,
};

/// Appends a column to the end of the authenticated board.
///
/// ## Responses:
/// - `201 Created`: the new column.
/// - `422 Unprocessable Entity`: empty name.
#[post("")]
pub async fn create_column(
    service: web::Data<BoardService>,
    board: AuthenticatedBoard,
    body: web::Json<ColumnInput>,
) -> Result<impl Responder, AppError> {
    let column = service.create_column(board.id(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(column))
}

/// Renames a column.
///
/// ## Responses:
/// - `200 OK`: the renamed column.
/// - `404 Not Found`: no such column on this board.
#[put("/{column_id}")]
pub async fn update_column(
    service: web::Data<BoardService>,
    board: AuthenticatedBoard,
    column_id: web::Path<String>,
    body: web::Json<ColumnInput>,
) -> Result<impl Responder, AppError> {
    let column = service
        .update_column(board.id(), &column_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(column))
}

/// Deletes a column and every card in it.
#[delete("/{column_id}")]
pub async fn delete_column(
    service: web::Data<BoardService>,
    board: AuthenticatedBoard,
    column_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    service.delete_column(board.id(), &column_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Column deleted" })))
}
