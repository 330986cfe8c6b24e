use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use super::{cookie::SESSION_COOKIE, extractors::AuthenticatedBoard, IdentityBroker};
use crate::error::AppError;

/// Rejects requests under `/api` that carry no valid board credential, and records the
/// authenticated board ID in the request extensions for [`AuthenticatedBoard`].
///
/// Board creation and login stay public. Rejections are rendered as regular
/// `AppError` responses rather than propagated as service errors.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

fn is_public(method: &Method, path: &str) -> bool {
    if *method == Method::OPTIONS {
        return true;
    }
    if *method != Method::POST {
        return false;
    }
    let path = path.trim_end_matches('/');
    path == "/api/boards"
        || path
            .strip_prefix("/api/boards/")
            .and_then(|rest| rest.strip_suffix("/login"))
            .map_or(false, |board_id| !board_id.is_empty() && !board_id.contains('/'))
}

/// Cookie first, then an `Authorization: Bearer` header.
fn presented_token(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public(req.method(), req.path()) {
            return self.forward(req);
        }

        let broker = match req.app_data::<web::Data<IdentityBroker>>() {
            Some(broker) => broker.clone(),
            None => {
                let app_err =
                    AppError::InternalServerError("Identity broker is not configured".into());
                return reject(req, app_err);
            }
        };

        match broker.verify_credential(presented_token(&req).as_deref()) {
            Ok(board_id) => {
                req.extensions_mut().insert(AuthenticatedBoard(board_id));
                self.forward(req)
            }
            Err(auth_err) => {
                log::debug!("rejected {} {}: {}", req.method(), req.path(), auth_err);
                reject(req, auth_err.into())
            }
        }
    }
}

impl<S, B> AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    fn forward(
        &self,
        req: ServiceRequest,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
    }
}

fn reject<B: 'static>(
    req: ServiceRequest,
    app_err: AppError,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
    let response = req
        .into_response(app_err.error_response())
        .map_into_right_body();
    Box::pin(async move { Ok(response) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public(&Method::POST, "/api/boards"));
        assert!(is_public(
            &Method::POST,
            "/api/boards/0123456789abcdef0123456789abcdef/login"
        ));
        assert!(is_public(&Method::OPTIONS, "/api/cards"));

        assert!(!is_public(&Method::GET, "/api/boards"));
        assert!(!is_public(&Method::GET, "/api/board"));
        assert!(!is_public(&Method::POST, "/api/boards//login"));
        assert!(!is_public(&Method::POST, "/api/boards/a/b/login"));
        assert!(!is_public(&Method::POST, "/api/cards"));
        assert!(!is_public(&Method::POST, "/api/logout"));
    }
}
