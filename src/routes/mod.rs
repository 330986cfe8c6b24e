pub mod boards;
pub mod cards;
pub mod columns;
pub mod health;

use actix_web::{error, web};

use crate::error::AppError;

/// Malformed JSON bodies get the same `{"error": ...}` shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = match err {
            error::JsonPayloadError::ContentType => "Expected a JSON request body".to_string(),
            other => format!("Invalid request body: {}", other),
        };
        AppError::BadRequest(message).into()
    })
}

/// Registers every `/api` route. Mount inside a scope wrapped with `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(boards::create_board)
        .service(boards::login)
        .service(boards::get_board)
        .service(boards::logout)
        .service(
            web::scope("/columns")
                .service(columns::create_column)
                .service(columns::update_column)
                .service(columns::delete_column),
        )
        .service(
            web::scope("/cards")
                .service(cards::create_card)
                .service(cards::move_card)
                .service(cards::update_card)
                .service(cards::delete_card),
        );
}
