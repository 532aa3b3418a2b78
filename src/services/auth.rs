//! Administrator authentication

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginResponse, User, UserClaims},
    repository::Repository,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Check credentials and issue a JWT
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let Some(user) = self.repository.users.get_by_username(username).await? else {
            tracing::warn!("Login failed: unknown user {:?}", username);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&user, password)? {
            tracing::warn!("Login failed: wrong password for {:?}", user.username);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let expires_in = self.token_lifetime_secs();
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            exp: now + expires_in,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!("User {} logged in", user.username);

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
        })
    }

    /// Validate a token issued by [`authenticate`](Self::authenticate)
    pub fn verify_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))
    }

    pub fn token_lifetime_secs(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    pub fn cookie_secure(&self) -> bool {
        self.config.cookie_secure
    }

    /// Create the administrator account. An existing account keeps its
    /// password unless `reset_password` is set.
    pub async fn seed_admin(
        &self,
        username: &str,
        password: &str,
        reset_password: bool,
    ) -> AppResult<User> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password must not be empty".to_string(),
            ));
        }
        let hash = hash_password(password)?;
        let user = self
            .repository
            .users
            .upsert(username.trim(), &hash, reset_password)
            .await?;
        tracing::info!("Administrator {} seeded", user.username);
        Ok(user)
    }
}

fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
