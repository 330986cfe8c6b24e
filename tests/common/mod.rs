#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, web, App, Error};
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;

use taskboard::auth::{AuthMiddleware, IdentityBroker, SessionCookie, SESSION_COOKIE};
use taskboard::routes::{self, health};
use taskboard::store::MemoryStore;
use taskboard::BoardService;

pub const PASSWORD: &str = "secret123";

/// Lowest bcrypt cost the crate accepts; keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn identity() -> Arc<IdentityBroker> {
    Arc::new(IdentityBroker::new(
        b"integration-test-secret",
        Duration::hours(24),
        TEST_BCRYPT_COST,
    ))
}

/// The full application over a fresh in-memory store.
pub async fn test_app(
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let identity = identity();
    let service = web::Data::new(BoardService::new(
        Arc::new(MemoryStore::new()),
        identity.clone(),
    ));

    test::init_service(
        App::new()
            .app_data(service)
            .app_data(web::Data::from(identity))
            .app_data(web::Data::new(SessionCookie::default()))
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}

/// Creates a board and returns its JSON view together with the session cookie.
pub async fn create_board<S, B>(app: &S, name: &str) -> (Value, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/boards")
        .set_json(json!({ "name": name, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "board creation should succeed");

    let cookie = session_cookie(&resp).expect("session cookie on board creation");
    let body: Value = test::read_body_json(resp).await;
    (body, cookie)
}

pub async fn fetch_board<S, B>(app: &S, cookie: &Cookie<'static>) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri("/api/board")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    test::read_body_json(resp).await
}

pub fn column_id(board: &Value, index: usize) -> String {
    board["columns"][index]["id"]
        .as_str()
        .expect("column id")
        .to_string()
}
