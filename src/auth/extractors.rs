use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// The board ID proven by the request's session credential.
///
/// Inserted into request extensions by `AuthMiddleware`; handlers take it as a
/// parameter and pass it explicitly to every `BoardService` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedBoard(pub String);

impl AuthenticatedBoard {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl FromRequest for AuthenticatedBoard {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedBoard>().cloned() {
            Some(board) => ready(Ok(board)),
            None => {
                let err = AppError::Unauthorized("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
