//! Admin authentication and session management.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use portfolio_common::{AppError, AppResult, IdGenerator};
use portfolio_db::{
    entities::{admin_session, admin_user},
    repositories::{AdminRepository, AdminSessionRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Session lifetime.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Login credentials.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    /// Admin username.
    #[validate(length(min = 1, max = 64, message = "Username is required"))]
    pub username: String,
    /// Admin password.
    #[validate(length(min = 1, max = 256, message = "Password is required"))]
    pub password: String,
}

/// The authenticated admin attached to a request.
#[derive(Debug, Clone)]
pub struct AdminPrincipal {
    /// Admin account ID.
    pub id: String,
    /// Admin username.
    pub username: String,
}

/// Auth service for admin login, session checks and logout.
#[derive(Clone)]
pub struct AuthService {
    admin_repo: AdminRepository,
    session_repo: AdminSessionRepository,
    id_gen: IdGenerator,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub fn new(admin_repo: AdminRepository, session_repo: AdminSessionRepository) -> Self {
        Self {
            admin_repo,
            session_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Log in with username and password. Returns the new session on
    /// success; bad username and bad password are indistinguishable to
    /// the caller.
    pub async fn login(&self, input: LoginInput) -> AppResult<admin_session::Model> {
        input.validate()?;

        let Some(admin) = self.admin_repo.find_by_username(input.username.trim()).await? else {
            return Err(AppError::Unauthorized);
        };

        if !verify_password(&input.password, &admin.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let now = Utc::now();
        let session = self
            .session_repo
            .create(admin_session::ActiveModel {
                id: Set(self.id_gen.generate()),
                admin_id: Set(admin.id.clone()),
                session_token: Set(self.id_gen.generate_token()),
                expires_at: Set((now + Duration::hours(SESSION_TTL_HOURS)).into()),
                created_at: Set(now.into()),
            })
            .await?;

        let admin = self.admin_repo.update_last_login(admin).await?;
        tracing::info!(admin_id = %admin.id, "admin logged in");

        Ok(session)
    }

    /// Resolve a session token to its admin. Expired sessions are
    /// deleted on sight and report as no session.
    pub async fn check(&self, token: &str) -> AppResult<Option<AdminPrincipal>> {
        let Some((session, admin)) = self.session_repo.find_by_token(token).await? else {
            return Ok(None);
        };

        if session.expires_at < Utc::now() {
            self.session_repo.delete_by_token(token).await?;
            return Ok(None);
        }

        let Some(admin) = admin else {
            return Ok(None);
        };

        Ok(Some(AdminPrincipal {
            id: admin.id,
            username: admin.username,
        }))
    }

    /// Log out a session. Unknown tokens are a no-op.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.session_repo.delete_by_token(token).await?;
        Ok(())
    }

    /// Purge expired sessions.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        self.session_repo.delete_expired(Utc::now()).await
    }

    /// Create an admin account with a freshly hashed password.
    pub async fn create_admin(&self, username: &str, password: &str) -> AppResult<admin_user::Model> {
        let model = admin_user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username.trim().to_string()),
            password_hash: Set(hash_password(password)?),
            last_login: Set(None),
            created_at: Set(Utc::now().into()),
        };

        self.admin_repo.create(model).await
    }
}

/// Hash a password with Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
