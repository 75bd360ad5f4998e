//! Admin password check and session tokens

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AdminConfig,
    error::{AppError, AppResult},
    models::session::AdminClaims,
};

const ADMIN_SUBJECT: &str = "admin";

#[derive(Clone)]
pub struct SessionService {
    password_hash: String,
    secret: String,
    session_days: i64,
}

impl SessionService {
    /// Plain configured passwords are hashed once here, PHC strings are used as-is
    pub fn new(config: &AdminConfig) -> AppResult<Self> {
        if config.password.is_empty() {
            return Err(AppError::Internal("Admin password is not configured".to_string()));
        }

        let password_hash = if config.password.starts_with("$argon2") {
            PasswordHash::new(&config.password)
                .map_err(|e| AppError::Internal(format!("Invalid admin password hash: {}", e)))?;
            config.password.clone()
        } else {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(config.password.as_bytes(), &salt)
                .map_err(|e| AppError::Internal(format!("Failed to hash admin password: {}", e)))?
                .to_string()
        };

        Ok(Self {
            password_hash,
            secret: config.session_secret.clone(),
            session_days: config.session_days,
        })
    }

    pub fn session_days(&self) -> i64 {
        self.session_days
    }

    /// Check the admin password and issue a session token
    pub fn login(&self, password: &str) -> AppResult<String> {
        let parsed = PasswordHash::new(&self.password_hash)
            .map_err(|e| AppError::Internal(format!("Invalid admin password hash: {}", e)))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(AppError::Authentication("Invalid password".to_string()));
        }

        let now = Utc::now().timestamp();
        let claims = AdminClaims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now,
            exp: now + self.session_days * 24 * 3600,
        };

        claims
            .create_token(&self.secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Validate a session token taken from the cookie
    pub fn verify(&self, token: &str) -> AppResult<AdminClaims> {
        let claims = AdminClaims::from_token(token, &self.secret)
            .map_err(|e| AppError::Authentication(format!("Invalid session: {}", e)))?;
        if claims.sub != ADMIN_SUBJECT {
            return Err(AppError::Authentication("Invalid session".to_string()));
        }
        Ok(claims)
    }
}
