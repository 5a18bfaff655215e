//! Review service.

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::{
    entities::review,
    repositories::{MealRepository, ReviewRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Input for reviewing a meal.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewInput {
    #[validate(length(min = 1))]
    pub meal_id: String,
    #[validate(email)]
    pub user_email: String,
    pub user_name: Option<String>,
    #[validate(length(min = 1, max = 4096))]
    pub review: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
}

/// Input for editing a review.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewInput {
    #[validate(length(min = 1, max = 4096))]
    pub review: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
}

/// Service for meal reviews.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    meal_repo: MealRepository,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(review_repo: ReviewRepository, meal_repo: MealRepository) -> Self {
        Self {
            review_repo,
            meal_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Review a meal and bump its review count.
    pub async fn create(&self, input: CreateReviewInput) -> AppResult<review::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let meal = self.meal_repo.get_by_id(&input.meal_id).await?;

        let model = review::ActiveModel {
            id: Set(self.id_gen.generate()),
            meal_id: Set(meal.id.clone()),
            meal_title: Set(meal.title),
            user_email: Set(input.user_email),
            user_name: Set(input.user_name),
            review: Set(input.review),
            rating: Set(input.rating),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.review_repo.create(model).await?;
        self.meal_repo.increment_reviews_count(&meal.id).await?;

        info!(review_id = %created.id, meal_id = %meal.id, "Review posted");
        Ok(created)
    }

    /// Replace a review's text and rating.
    pub async fn update(&self, id: &str, input: UpdateReviewInput) -> AppResult<review::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self
            .review_repo
            .update_text(id, &input.review, input.rating)
            .await?
            == 0
        {
            return Err(AppError::NotFound(format!("Review {id}")));
        }

        self.review_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {id}")))
    }

    /// List reviews, newest first, optionally for one meal.
    pub async fn list(&self, meal_id: Option<&str>) -> AppResult<Vec<review::Model>> {
        self.review_repo.find(meal_id).await
    }
}
