//! Meal repository.

use std::sync::Arc;

use crate::entities::{Meal, meal};
use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
    sea_query::{Expr, Func},
};

use super::contains_pattern;

/// Meal repository for database operations.
#[derive(Clone)]
pub struct MealRepository {
    db: Arc<DatabaseConnection>,
}

impl MealRepository {
    /// Create a new meal repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a meal by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<meal::Model>> {
        Meal::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a meal by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<meal::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::MealNotFound(id.to_string()))
    }

    /// Find a meal with the same title from the same distributor.
    pub async fn find_duplicate(
        &self,
        title: &str,
        distributor_email: &str,
    ) -> AppResult<Option<meal::Model>> {
        Meal::find()
            .filter(meal::Column::Title.eq(title))
            .filter(meal::Column::DistributorEmail.eq(distributor_email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a page of meals, optionally filtered by a case-insensitive match
    /// on title or distributor email.
    pub async fn find_page(
        &self,
        search: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<meal::Model>> {
        let mut select = Meal::find().order_by_asc(meal::Column::Id);

        if let Some(q) = search.filter(|q| !q.is_empty()) {
            let pattern = contains_pattern(q);
            select = select.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(meal::Column::Title))).like(pattern.as_str()))
                    .add(
                        Expr::expr(Func::lower(Expr::col(meal::Column::DistributorEmail)))
                            .like(pattern.as_str()),
                    ),
            );
        }

        select
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every meal.
    pub async fn find_all(&self) -> AppResult<Vec<meal::Model>> {
        Meal::find()
            .order_by_asc(meal::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new meal.
    pub async fn create(&self, model: meal::ActiveModel) -> AppResult<meal::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a meal. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Meal::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Increment likes atomically. Returns whether the meal exists.
    pub async fn increment_likes(&self, id: &str) -> AppResult<bool> {
        let result = Meal::update_many()
            .col_expr(meal::Column::Likes, Expr::col(meal::Column::Likes).add(1))
            .filter(meal::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Decrement likes atomically, never below zero. Returns whether the
    /// meal exists.
    pub async fn decrement_likes(&self, id: &str) -> AppResult<bool> {
        let result = Meal::update_many()
            .col_expr(meal::Column::Likes, Expr::cust("GREATEST(likes - 1, 0)"))
            .filter(meal::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Increment the review counter atomically.
    pub async fn increment_reviews_count(&self, id: &str) -> AppResult<()> {
        Meal::update_many()
            .col_expr(
                meal::Column::ReviewsCount,
                Expr::col(meal::Column::ReviewsCount).add(1),
            )
            .filter(meal::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    fn create_test_meal(id: &str, title: &str) -> meal::Model {
        meal::Model {
            id: id.to_string(),
            title: title.to_string(),
            category: "dinner".to_string(),
            image: None,
            ingredients: json!(["rice", "chicken"]),
            description: Some("Slow-cooked".to_string()),
            price: 120.0,
            rating: 4.5,
            distributor_name: "Hall Kitchen".to_string(),
            distributor_email: "kitchen@campus.edu".to_string(),
            likes: 3,
            reviews_count: 1,
            created_at: Utc::now().into(),
        }
    }

    fn exec_result(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let meal = create_test_meal("m1", "Biryani");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[meal.clone()]])
                .into_connection(),
        );

        let repo = MealRepository::new(db);
        let result = repo.find_by_id("m1").await.unwrap();

        assert_eq!(result.unwrap().title, "Biryani");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<meal::Model>::new()])
                .into_connection(),
        );

        let repo = MealRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::MealNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_page() {
        let m1 = create_test_meal("m1", "Biryani");
        let m2 = create_test_meal("m2", "Kacchi Biryani");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[m1, m2]])
                .into_connection(),
        );

        let repo = MealRepository::new(db);
        let result = repo.find_page(Some("biryani"), 0, 100).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_like_counters_report_match() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_result(1), exec_result(0), exec_result(1)])
                .into_connection(),
        );

        let repo = MealRepository::new(db);
        assert!(repo.increment_likes("m1").await.unwrap());
        assert!(!repo.increment_likes("missing").await.unwrap());
        assert!(repo.decrement_likes("m1").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec_result(1)])
                .into_connection(),
        );

        let repo = MealRepository::new(db);
        assert!(repo.delete("m1").await.unwrap());
    }
}
