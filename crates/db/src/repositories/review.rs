//! Review repository.

use std::sync::Arc;

use crate::entities::{Review, review};
use campus_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::Expr,
};

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List reviews, newest first, optionally for a single meal.
    pub async fn find(&self, meal_id: Option<&str>) -> AppResult<Vec<review::Model>> {
        let mut select = Review::find().order_by_desc(review::Column::Id);

        if let Some(meal_id) = meal_id {
            select = select.filter(review::Column::MealId.eq(meal_id));
        }

        select
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new review.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace a review's text and rating. Returns the number of rows changed.
    pub async fn update_text(
        &self,
        id: &str,
        text: &str,
        rating: Option<i32>,
    ) -> AppResult<u64> {
        let result = Review::update_many()
            .col_expr(review::Column::Review, Expr::value(text))
            .col_expr(review::Column::Rating, Expr::value(rating))
            .col_expr(review::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(review::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_review(id: &str, meal_id: &str) -> review::Model {
        review::Model {
            id: id.to_string(),
            meal_id: meal_id.to_string(),
            meal_title: "Biryani".to_string(),
            user_email: "student@campus.edu".to_string(),
            user_name: Some("Student".to_string()),
            review: "Great".to_string(),
            rating: Some(5),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_meal() {
        let r1 = create_test_review("r1", "m1");
        let r2 = create_test_review("r2", "m1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.find(Some("m1")).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.meal_id == "m1"));
    }

    #[tokio::test]
    async fn test_update_text_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let changed = repo.update_text("r1", "Too salty", Some(2)).await.unwrap();

        assert_eq!(changed, 1);
    }
}
