//! Board-scoped authentication: password hashing, session credentials and the
//! request plumbing that carries them.

pub mod cookie;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use chrono::Duration;

use crate::config::Config;
use crate::error::AppError;

pub use cookie::{SessionCookie, SESSION_COOKIE};
pub use extractors::AuthenticatedBoard;
pub use middleware::AuthMiddleware;
pub use token::{AuthError, Claims, Credential, TokenSigner};

/// Hashes and checks board passwords, and issues and verifies the credentials that
/// stand in for them afterwards.
///
/// Holds no mutable state; the signing secret is fixed for the life of the process.
pub struct IdentityBroker {
    signer: TokenSigner,
    bcrypt_cost: u32,
}

impl IdentityBroker {
    pub fn new(secret: &[u8], ttl: Duration, bcrypt_cost: u32) -> Self {
        Self {
            signer: TokenSigner::new(secret, ttl),
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let ttl = Duration::try_hours(config.session_ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| {
                AppError::InternalServerError(format!(
                    "SESSION_TTL_HOURS={} is not a usable credential lifetime",
                    config.session_ttl_hours
                ))
            })?;

        Ok(Self::new(
            config.session_secret.as_bytes(),
            ttl,
            config.bcrypt_cost,
        ))
    }

    pub fn hash_password(&self, plaintext: &str) -> Result<String, AppError> {
        password::hash_password(plaintext, self.bcrypt_cost)
    }

    pub fn verify_password(&self, hash: &str, plaintext: &str) -> Result<bool, AppError> {
        password::verify_password(plaintext, hash)
    }

    pub fn issue_credential(&self, board_id: &str) -> Result<Credential, AppError> {
        self.signer.issue(board_id)
    }

    /// Returns the board ID bound to `token`.
    pub fn verify_credential(&self, token: Option<&str>) -> Result<String, AuthError> {
        self.signer.verify(token).map(|claims| claims.board_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broker() -> IdentityBroker {
        IdentityBroker::new(b"broker-test-secret", Duration::hours(24), 4)
    }

    #[test]
    fn test_credential_binds_single_board() {
        let broker = broker();
        let credential = broker.issue_credential("board-b").unwrap();

        assert_eq!(
            broker.verify_credential(Some(&credential.token)).unwrap(),
            "board-b"
        );
        assert_eq!(broker.verify_credential(None), Err(AuthError::Missing));
    }

    #[test]
    fn test_password_round_trip_through_broker() {
        let broker = broker();
        let hash = broker.hash_password("secret1").unwrap();

        assert!(broker.verify_password(&hash, "secret1").unwrap());
        assert!(!broker.verify_password(&hash, "secret2").unwrap());
    }

    fn config_with_ttl(hours: i64) -> Config {
        Config {
            database_url: "memory://".into(),
            database_max_connections: 1,
            server_port: 3000,
            server_host: "127.0.0.1".into(),
            session_secret: "broker-test-secret".into(),
            session_ttl_hours: hours,
            bcrypt_cost: 4,
            cookie_secure: false,
            cors_origin: "http://localhost:3000".into(),
        }
    }

    #[test]
    fn test_from_config_rejects_unusable_ttl() {
        for hours in [0, -1, i64::MAX] {
            let result = IdentityBroker::from_config(&config_with_ttl(hours));
            assert!(
                matches!(result, Err(AppError::InternalServerError(_))),
                "ttl {} hours",
                hours
            );
        }

        let broker = IdentityBroker::from_config(&config_with_ttl(24)).unwrap();
        let credential = broker.issue_credential("board-a").unwrap();
        assert_eq!(
            broker.verify_credential(Some(&credential.token)).unwrap(),
            "board-a"
        );
    }
}
