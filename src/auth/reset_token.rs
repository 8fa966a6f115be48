use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{db::entities::user, error::AppError};

pub const RESET_TOKEN_TTL_SECS: i64 = 3 * 24 * 3600;

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// The signing key mixes in the user's current password hash, so a token
/// dies as soon as the password changes.
fn key_material(secret: &str, account: &user::Model) -> Vec<u8> {
    let mut material = Vec::with_capacity(secret.len() + account.password_hash.len() + 1);
    material.extend_from_slice(secret.as_bytes());
    material.push(b':');
    material.extend_from_slice(account.password_hash.as_bytes());
    material
}

pub fn issue(secret: &str, account: &user::Model) -> Result<String, AppError> {
    let iat = Utc::now().timestamp();
    let claims = ResetClaims {
        sub: account.id.to_string(),
        iat,
        exp: iat + RESET_TOKEN_TTL_SECS,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&key_material(secret, account)),
    )
    .map_err(|err| AppError::internal(format!("reset token signing failed: {err}")))
}

pub fn is_valid(secret: &str, account: &user::Model, token: &str) -> bool {
    let validation = Validation::new(Algorithm::HS256);
    decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(&key_material(secret, account)),
        &validation,
    )
    .ok()
    .and_then(|data| Uuid::parse_str(&data.claims.sub).ok())
    .is_some_and(|id| id == account.id)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{is_valid, issue};
    use crate::db::entities::user;

    const SECRET: &str = "unit-test-session-secret";

    fn account(password_hash: &str) -> user::Model {
        let now = Utc::now().fixed_offset();
        user::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: password_hash.to_string(),
            is_active: true,
            last_login_at: None,
        }
    }

    #[test]
    fn token_is_valid_for_its_account() {
        let alice = account("hash-one");
        let token = issue(SECRET, &alice).expect("token should sign");

        assert!(is_valid(SECRET, &alice, &token));
    }

    #[test]
    fn changing_the_password_invalidates_the_token() {
        let mut alice = account("hash-one");
        let token = issue(SECRET, &alice).expect("token should sign");

        alice.password_hash = "hash-two".to_string();

        assert!(!is_valid(SECRET, &alice, &token));
    }

    #[test]
    fn token_does_not_transfer_to_another_account() {
        let alice = account("same-hash");
        let mut bob = account("same-hash");
        bob.username = "bob".to_string();
        let token = issue(SECRET, &alice).expect("token should sign");

        assert!(!is_valid(SECRET, &bob, &token));
    }
}
