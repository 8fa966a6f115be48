use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::password;
use crate::{config::AuthConfig, db::entities::user, error::AppError};

pub const SESSION_COOKIE: &str = "recipe_session";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String,
    /// Password fingerprint at login; a password change ends the session.
    pub pwd: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// True when the claims were issued to `account` under its current password.
    pub fn matches(&self, account: &user::Model) -> bool {
        self.user_id() == Some(account.id)
            && !self.pwd.is_empty()
            && self.pwd == password::fingerprint(&account.password_hash)
    }
}

/// Signs and checks the HS256 token stored in the session cookie.
#[derive(Clone)]
pub struct SessionKeys {
    enc: EncodingKey,
    dec: DecodingKey,
    ttl_secs: i64,
    secure_cookies: bool,
}

impl SessionKeys {
    pub fn from_config(cfg: &AuthConfig) -> Self {
        let secret = cfg.session_secret.as_bytes();
        let ttl_hours = i64::try_from(cfg.session_ttl_hours).unwrap_or(i64::MAX / 3600);
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
            ttl_secs: ttl_hours.saturating_mul(3600),
            secure_cookies: cfg.secure_cookies,
        }
    }

    pub fn issue(&self, account: &user::Model) -> Result<String, AppError> {
        let iat = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: account.id.to_string(),
            pwd: password::fingerprint(&account.password_hash),
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.enc)
            .map_err(|err| AppError::internal(format!("session signing failed: {err}")))
    }

    /// `None` for anything forged, expired or malformed.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(token, &self.dec, &validation)
            .ok()
            .map(|data| data.claims)
    }

    pub fn login_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .build()
    }

    pub fn logout_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, "")).path("/").build()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::SessionKeys;
    use crate::{auth::password, config::AuthConfig, db::entities::user};

    fn keys(secret: &str) -> SessionKeys {
        SessionKeys::from_config(&AuthConfig {
            session_secret: secret.to_string(),
            ..AuthConfig::default()
        })
    }

    fn account(password_hash: String) -> user::Model {
        let now = Utc::now().fixed_offset();
        user::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash,
            is_active: true,
            last_login_at: None,
        }
    }

    #[test]
    fn issued_token_verifies_to_the_same_user() {
        let keys = keys("unit-test-session-secret");
        let alice = account(password::hash_password("first-password").expect("hash"));

        let token = keys.issue(&alice).expect("token should sign");
        let claims = keys.verify(&token).expect("token should verify");

        assert_eq!(claims.user_id(), Some(alice.id));
        assert!(claims.matches(&alice));
    }

    #[test]
    fn password_change_ends_the_session() {
        let keys = keys("unit-test-session-secret");
        let alice = account(password::hash_password("first-password").expect("hash"));
        let token = keys.issue(&alice).expect("token should sign");

        let changed = user::Model {
            password_hash: password::hash_password("second-password").expect("hash"),
            ..alice.clone()
        };
        let claims = keys.verify(&token).expect("signature still checks");

        assert!(!claims.matches(&changed));
        assert!(!claims.matches(&account(alice.password_hash.clone())));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let alice = account(password::hash_password("first-password").expect("hash"));
        let token = keys("first-session-secret-x")
            .issue(&alice)
            .expect("token should sign");

        assert!(keys("second-session-secret").verify(&token).is_none());
        assert!(keys("second-session-secret").verify("garbage").is_none());
    }

    #[test]
    fn login_cookie_is_http_only_and_lax() {
        let cookie = keys("unit-test-session-secret").login_cookie("token".to_string());

        assert_eq!(cookie.name(), "recipe_session");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(axum_extra::extract::cookie::SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }
}
