//! Meal service.

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::{entities::meal, repositories::MealRepository};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::info;
use validator::Validate;

/// Largest page a meal listing returns.
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Input for creating a meal or an upcoming meal.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    #[validate(length(min = 1, max = 128))]
    pub distributor_name: String,
    #[validate(email)]
    pub distributor_email: String,
}

impl CreateMealInput {
    pub(crate) fn ingredients_json(&self) -> JsonValue {
        JsonValue::from(self.ingredients.clone())
    }
}

/// Search and pagination for the meal listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPage {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl MealPage {
    /// Rows to skip and rows to take. Pages start at 1 and the limit is
    /// clamped to `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn offset_limit(&self) -> (u64, u64) {
        let limit = self.limit.unwrap_or(MAX_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
        let page = self.page.unwrap_or(1).max(1);
        ((page - 1).saturating_mul(limit), limit)
    }
}

/// Service for published meals.
#[derive(Clone)]
pub struct MealService {
    meal_repo: MealRepository,
    id_gen: IdGenerator,
}

impl MealService {
    /// Create a new meal service.
    #[must_use]
    pub const fn new(meal_repo: MealRepository) -> Self {
        Self {
            meal_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a meal to the menu.
    pub async fn create(&self, input: CreateMealInput) -> AppResult<meal::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self
            .meal_repo
            .find_duplicate(&input.title, &input.distributor_email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Meal {} from {} already exists",
                input.title, input.distributor_email
            )));
        }

        let model = meal::ActiveModel {
            id: Set(self.id_gen.generate()),
            ingredients: Set(input.ingredients_json()),
            title: Set(input.title),
            category: Set(input.category),
            image: Set(input.image),
            description: Set(input.description),
            price: Set(input.price),
            rating: Set(input.rating),
            distributor_name: Set(input.distributor_name),
            distributor_email: Set(input.distributor_email),
            likes: Set(0),
            reviews_count: Set(0),
            created_at: Set(Utc::now().into()),
        };

        let created = self.meal_repo.create(model).await?;
        info!(meal_id = %created.id, "Meal created");
        Ok(created)
    }

    /// List a page of meals.
    pub async fn list(&self, page: &MealPage) -> AppResult<Vec<meal::Model>> {
        let (offset, limit) = page.offset_limit();
        self.meal_repo
            .find_page(page.search.as_deref(), offset, limit)
            .await
    }

    /// List every meal.
    pub async fn all(&self) -> AppResult<Vec<meal::Model>> {
        self.meal_repo.find_all().await
    }

    /// Get a meal by ID.
    pub async fn get(&self, id: &str) -> AppResult<meal::Model> {
        self.meal_repo.get_by_id(id).await
    }

    /// Remove a meal from the menu.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.meal_repo.delete(id).await? {
            return Err(AppError::MealNotFound(id.to_string()));
        }
        info!(meal_id = %id, "Meal deleted");
        Ok(())
    }

    /// Add one like.
    pub async fn like(&self, id: &str) -> AppResult<()> {
        if !self.meal_repo.increment_likes(id).await? {
            return Err(AppError::MealNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Remove one like. The count never drops below zero.
    pub async fn unlike(&self, id: &str) -> AppResult<()> {
        if !self.meal_repo.decrement_likes(id).await? {
            return Err(AppError::MealNotFound(id.to_string()));
        }
        Ok(())
    }
}
