//! Admin account and session repositories.

use std::sync::Arc;

use crate::entities::{AdminSession, AdminUser, admin_session, admin_user};
use chrono::{DateTime, Utc};
use portfolio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

/// Repository for admin accounts.
#[derive(Clone)]
pub struct AdminRepository {
    db: Arc<DatabaseConnection>,
}

impl AdminRepository {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an admin by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<admin_user::Model>> {
        AdminUser::find()
            .filter(admin_user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new admin account.
    pub async fn create(&self, model: admin_user::ActiveModel) -> AppResult<admin_user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record a successful login.
    pub async fn update_last_login(&self, admin: admin_user::Model) -> AppResult<admin_user::Model> {
        let mut active: admin_user::ActiveModel = admin.into();
        active.last_login = Set(Some(Utc::now().into()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Repository for admin login sessions.
#[derive(Clone)]
pub struct AdminSessionRepository {
    db: Arc<DatabaseConnection>,
}

impl AdminSessionRepository {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Persist a new session.
    pub async fn create(
        &self,
        model: admin_session::ActiveModel,
    ) -> AppResult<admin_session::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a session with its admin by opaque token.
    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> AppResult<Option<(admin_session::Model, Option<admin_user::Model>)>> {
        AdminSession::find()
            .filter(admin_session::Column::SessionToken.eq(token))
            .find_also_related(AdminUser)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a session by token; returns whether a row was removed.
    pub async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        let result = AdminSession::delete_many()
            .filter(admin_session::Column::SessionToken.eq(token))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Purge sessions that expired before `now`.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = AdminSession::delete_many()
            .filter(admin_session::Column::ExpiresAt.lt(now))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
