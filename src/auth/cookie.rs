use actix_web::cookie::{time::Duration, Cookie, SameSite};
use chrono::Utc;

use super::token::Credential;

/// Name of the cookie carrying the session credential.
pub const SESSION_COOKIE: &str = "auth_token";

/// Builds the HTTP-only cookie that transports a session credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionCookie {
    /// Whether to mark the cookie `Secure` (HTTPS-only).
    pub secure: bool,
}

impl SessionCookie {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    pub fn issue(&self, credential: &Credential) -> Cookie<'static> {
        let remaining = (credential.expires_at - Utc::now()).num_seconds().max(0);

        Cookie::build(SESSION_COOKIE, credential.token.clone())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(Duration::seconds(remaining))
            .finish()
    }

    /// An already-expired cookie that makes the browser drop the session.
    pub fn clear(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .finish();
        cookie.make_removal();
        cookie
    }
}
