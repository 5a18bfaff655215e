//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
    sea_query::{Expr, Func},
};

use super::contains_pattern;

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List users, optionally filtered by a case-insensitive match on
    /// username or email.
    pub async fn search(&self, query: Option<&str>) -> AppResult<Vec<user::Model>> {
        let mut select = User::find().order_by_asc(user::Column::Id);

        if let Some(q) = query.filter(|q| !q.is_empty()) {
            let pattern = contains_pattern(q);
            select = select.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Username))).like(pattern.as_str()))
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Email))).like(pattern.as_str())),
            );
        }

        select
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set a user's role. Returns whether a user matched.
    pub async fn set_role(&self, id: &str, role: user::UserRole) -> AppResult<bool> {
        let result = User::update_many()
            .col_expr(user::Column::Role, Expr::value(role.to_value()))
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}
