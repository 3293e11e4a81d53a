use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::query_scalar;
use tracing::{info, warn};

use crate::{
    db::Database,
    error::{AppError, Result},
    model::CurrentUser,
};

const MAX_USERNAME_CHARS: usize = 64;
/// Longest password accepted, in bytes.
const MAX_PASSWORD_BYTES: usize = 72;
const MIN_PASSWORD_CHARS: usize = 8;

/// Persists username/password-hash pairs and checks login attempts against them.
#[derive(Clone)]
pub struct CredentialStore {
    db: Database,
}

impl CredentialStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        password_repeated: &str,
    ) -> Result<()> {
        check_registration(username, password, password_repeated)?;

        let taken: i64 = self
            .db
            .run(
                query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
                    .bind(username)
                    .fetch_one(&self.db.pool),
            )
            .await?;
        if taken > 0 {
            return Err(AppError::Duplicate("username is taken".to_string()));
        }

        let password_hash = hash_password(password)?;

        // The unique index still catches a registration racing past the check above
        self.db
            .run(async {
                sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
                    .bind(username)
                    .bind(&password_hash)
                    .execute(&self.db.pool)
                    .await
                    .map_err(|e| AppError::from_insert(e, "username is taken"))
            })
            .await?;

        info!("registered user {}", username);
        Ok(())
    }

    /// Unknown usernames and wrong passwords fail identically.
    pub async fn verify(&self, username: &str, password: &str) -> Result<CurrentUser> {
        let stored: Option<String> = self
            .db
            .run(
                query_scalar("SELECT password_hash FROM users WHERE username = ?")
                    .bind(username)
                    .fetch_optional(&self.db.pool),
            )
            .await?;

        let Some(stored) = stored else {
            warn!("login attempt for unknown user");
            // Pay the same hashing cost as a wrong password
            let _ = verify_password(password, dummy_hash());
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &stored)? {
            warn!("wrong password for {}", username);
            return Err(AppError::InvalidCredentials);
        }

        Ok(CurrentUser {
            username: username.to_string(),
        })
    }
}

fn check_registration(username: &str, password: &str, password_repeated: &str) -> Result<()> {
    let invalid = |msg: &str| Err(AppError::Validation(msg.to_string()));

    if username.trim().is_empty() || password.is_empty() || password_repeated.is_empty() {
        return invalid("all fields must be filled");
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return invalid("username too long");
    }
    if password != password_repeated {
        return invalid("passwords don't match");
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return invalid("password too long");
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return invalid("password must be at least 8 characters");
    }
    if password.contains(username) {
        return invalid("password should not include the username");
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))
}

/// Hash checked against when the username is unknown.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("not-a-real-account-password").unwrap_or_default())
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
