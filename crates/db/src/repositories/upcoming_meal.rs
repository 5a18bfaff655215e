//! Upcoming meal repository.
//!
//! Besides plain CRUD this owns the two voting statements. Each one checks
//! membership in `liked_by` and applies the paired counter update in a single
//! conditional `UPDATE`, so concurrent votes on the same row serialize on the
//! row lock and the loser re-evaluates the membership predicate.

use std::sync::Arc;

use crate::entities::{UpcomingMeal, upcoming_meal};
use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseBackend, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Statement,
};

/// Add a voter and bump the counter, only if the voter is not a member yet.
pub(crate) const ADD_VOTER_SQL: &str = r#"UPDATE "upcoming_meal"
SET "likes" = "likes" + 1, "liked_by" = "liked_by" || jsonb_build_array($2::text)
WHERE "id" = $1 AND NOT ("liked_by" @> jsonb_build_array($2::text))
RETURNING *"#;

/// Remove a voter and drop the counter, only if the voter is a member.
pub(crate) const REMOVE_VOTER_SQL: &str = r#"UPDATE "upcoming_meal"
SET "likes" = "likes" - 1, "liked_by" = "liked_by" - $2::text
WHERE "id" = $1 AND "liked_by" @> jsonb_build_array($2::text)
RETURNING *"#;

/// Upcoming meal repository for database operations.
#[derive(Clone)]
pub struct UpcomingMealRepository {
    db: Arc<DatabaseConnection>,
}

impl UpcomingMealRepository {
    /// Create a new upcoming meal repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an upcoming meal by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<upcoming_meal::Model>> {
        UpcomingMeal::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an upcoming meal by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<upcoming_meal::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::MealNotFound(id.to_string()))
    }

    /// Find an upcoming meal with the same title from the same distributor.
    pub async fn find_duplicate(
        &self,
        title: &str,
        distributor_email: &str,
    ) -> AppResult<Option<upcoming_meal::Model>> {
        UpcomingMeal::find()
            .filter(upcoming_meal::Column::Title.eq(title))
            .filter(upcoming_meal::Column::DistributorEmail.eq(distributor_email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every upcoming meal, most liked first.
    pub async fn find_all(&self) -> AppResult<Vec<upcoming_meal::Model>> {
        UpcomingMeal::find()
            .order_by_desc(upcoming_meal::Column::Likes)
            .order_by_asc(upcoming_meal::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new upcoming meal.
    pub async fn create(
        &self,
        model: upcoming_meal::ActiveModel,
    ) -> AppResult<upcoming_meal::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an upcoming meal. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = UpcomingMeal::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Record a like from `voter_id`.
    ///
    /// Returns the updated row, or `None` when the item does not exist or the
    /// voter already holds a like on it.
    pub async fn add_voter(
        &self,
        id: &str,
        voter_id: &str,
    ) -> AppResult<Option<upcoming_meal::Model>> {
        self.conditional_update(ADD_VOTER_SQL, id, voter_id).await
    }

    /// Withdraw the like held by `voter_id`.
    ///
    /// Returns the updated row, or `None` when the item does not exist or the
    /// voter holds no like on it.
    pub async fn remove_voter(
        &self,
        id: &str,
        voter_id: &str,
    ) -> AppResult<Option<upcoming_meal::Model>> {
        self.conditional_update(REMOVE_VOTER_SQL, id, voter_id).await
    }

    async fn conditional_update(
        &self,
        sql: &str,
        id: &str,
        voter_id: &str,
    ) -> AppResult<Option<upcoming_meal::Model>> {
        UpcomingMeal::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                sql,
                [id.into(), voter_id.into()],
            ))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{MockDatabase, Transaction};
    use serde_json::json;

    fn create_test_item(id: &str, likes: i32, liked_by: &[&str]) -> upcoming_meal::Model {
        upcoming_meal::Model {
            id: id.to_string(),
            title: "Beef Tehari".to_string(),
            category: "lunch".to_string(),
            image: None,
            ingredients: json!(["rice", "beef"]),
            description: None,
            price: 150.0,
            rating: 0.0,
            distributor_name: "Hall Kitchen".to_string(),
            distributor_email: "kitchen@campus.edu".to_string(),
            likes,
            liked_by: json!(liked_by),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_add_voter_issues_single_conditional_update() {
        let updated = create_test_item("m1", 1, &["u1"]);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[updated]])
                .into_connection(),
        );

        let repo = UpcomingMealRepository::new(db.clone());
        let result = repo.add_voter("m1", "u1").await.unwrap().unwrap();
        assert_eq!(result.likes, 1);
        assert!(result.has_voter("u1"));

        drop(repo);
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        assert_eq!(
            log,
            vec![Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                ADD_VOTER_SQL,
                ["m1".into(), "u1".into()],
            )]
        );
    }

    #[tokio::test]
    async fn test_add_voter_no_row_when_precondition_fails() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<upcoming_meal::Model>::new()])
                .into_connection(),
        );

        let repo = UpcomingMealRepository::new(db);
        let result = repo.add_voter("m1", "u1").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_remove_voter_issues_single_conditional_update() {
        let updated = create_test_item("m1", 0, &[]);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[updated]])
                .into_connection(),
        );

        let repo = UpcomingMealRepository::new(db.clone());
        let result = repo.remove_voter("m1", "u1").await.unwrap().unwrap();
        assert_eq!(result.likes, 0);
        assert!(result.voters().is_empty());

        drop(repo);
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        assert_eq!(
            log,
            vec![Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                REMOVE_VOTER_SQL,
                ["m1".into(), "u1".into()],
            )]
        );
    }

    #[test]
    fn test_vote_statements_guard_membership() {
        assert!(ADD_VOTER_SQL.contains(r#"NOT ("liked_by" @> jsonb_build_array($2::text))"#));
        assert!(REMOVE_VOTER_SQL.contains(r#"AND "liked_by" @> jsonb_build_array($2::text)"#));
        assert!(ADD_VOTER_SQL.ends_with("RETURNING *"));
        assert!(REMOVE_VOTER_SQL.ends_with("RETURNING *"));
    }

    #[tokio::test]
    async fn test_find_all() {
        let a = create_test_item("m1", 2, &["u1", "u2"]);
        let b = create_test_item("m2", 0, &[]);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[a, b]])
                .into_connection(),
        );

        let repo = UpcomingMealRepository::new(db);
        let result = repo.find_all().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].likes, 2);
    }
}
