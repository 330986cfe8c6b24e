use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

use crate::{
    auth::{AuthenticatedBoard, SessionCookie},
    error::AppError,
    models::{CreateBoardRequest, LoginRequest, LoginResponse},
    service::BoardService,
};

/// Create a board
///
/// Creates a password-protected board with its three default columns and signs the
/// caller in by setting the session cookie.
///
/// ## Responses:
/// - `201 Created`: the new board with its columns.
/// - `422 Unprocessable Entity`: empty name or a password shorter than 6 characters.
#[post("/boards")]
pub async fn create_board(
    service: web::Data<BoardService>,
    session: web::Data<SessionCookie>,
    body: web::Json<CreateBoardRequest>,
) -> Result<impl Responder, AppError> {
    let (board, credential) = service.create_board(body.into_inner()).await?;

    Ok(HttpResponse::Created()
        .cookie(session.issue(&credential))
        .json(board))
}

/// Sign in to a board
///
/// ## Responses:
/// - `200 OK`: `{message, board_id}` and the session cookie.
/// - `401 Unauthorized`: unknown board or wrong password.
/// - `422 Unprocessable Entity`: empty password.
#[post("/boards/{board_id}/login")]
pub async fn login(
    service: web::Data<BoardService>,
    session: web::Data<SessionCookie>,
    board_id: web::Path<String>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;
    let board_id = board_id.into_inner();
    let credential = service.login(&board_id, &body.password).await?;

    Ok(HttpResponse::Ok()
        .cookie(session.issue(&credential))
        .json(LoginResponse {
            message: "Signed in".to_string(),
            board_id,
        }))
}

/// The authenticated board with its columns and cards, both in display order.
#[get("/board")]
pub async fn get_board(
    service: web::Data<BoardService>,
    board: AuthenticatedBoard,
) -> Result<impl Responder, AppError> {
    let view = service.get_board(board.id()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Sign out by expiring the session cookie.
#[post("/logout")]
pub async fn logout(
    session: web::Data<SessionCookie>,
    board: AuthenticatedBoard,
) -> impl Responder {
    log::debug!("Signed out of board {}", board.id());
    HttpResponse::Ok()
        .cookie(session.clear())
        .json(json!({ "message": "Signed out" }))
}
