//! User service.

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::{
    entities::user::{self, UserRole},
    repositories::UserRepository,
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Input for registering a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(url)]
    pub photo_url: Option<String>,
}

/// Service for user accounts and the admin role.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a user with the `user` role.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A user with email {} already exists",
                input.email
            )));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username),
            email: Set(input.email),
            photo_url: Set(input.photo_url),
            role: Set(UserRole::User),
            created_at: Set(Utc::now().into()),
        };

        let created = self.user_repo.create(model).await?;
        info!(user_id = %created.id, "User registered");
        Ok(created)
    }

    /// List users, optionally filtered by username or email substring.
    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<user::Model>> {
        self.user_repo.search(search).await
    }

    /// Whether the user with `email` holds the admin role.
    pub async fn is_admin(&self, email: &str) -> AppResult<bool> {
        self.user_repo
            .find_by_email(email)
            .await?
            .map(|u| u.is_admin())
            .ok_or_else(|| AppError::UserNotFound(email.to_string()))
    }

    /// Grant the admin role.
    pub async fn promote_to_admin(&self, id: &str) -> AppResult<()> {
        if !self.user_repo.set_role(id, UserRole::Admin).await? {
            return Err(AppError::UserNotFound(id.to_string()));
        }
        info!(user_id = %id, "User promoted to admin");
        Ok(())
    }
}
