//! Upcoming meal service.
//!
//! Upcoming meals are poll items. Their like state is owned by
//! [`crate::VotingLedger`]; this service handles the rest of their lifecycle,
//! ending with publication to the regular menu.

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::{
    entities::{meal, upcoming_meal},
    repositories::{MealRepository, UpcomingMealRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use tracing::{info, warn};
use validator::Validate;

use super::meal::CreateMealInput;

/// Service for upcoming meals.
#[derive(Clone)]
pub struct UpcomingMealService {
    upcoming_repo: UpcomingMealRepository,
    meal_repo: MealRepository,
    id_gen: IdGenerator,
}

impl UpcomingMealService {
    /// Create a new upcoming meal service.
    #[must_use]
    pub const fn new(upcoming_repo: UpcomingMealRepository, meal_repo: MealRepository) -> Self {
        Self {
            upcoming_repo,
            meal_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Open a poll item with no likes.
    pub async fn create(&self, input: CreateMealInput) -> AppResult<upcoming_meal::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self
            .upcoming_repo
            .find_duplicate(&input.title, &input.distributor_email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Upcoming meal {} from {} already exists",
                input.title, input.distributor_email
            )));
        }

        let model = upcoming_meal::ActiveModel {
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
            liked_by: Set(json!([])),
            created_at: Set(Utc::now().into()),
        };

        let created = self.upcoming_repo.create(model).await?;
        info!(item_id = %created.id, "Upcoming meal created");
        Ok(created)
    }

    /// List every upcoming meal, most liked first.
    pub async fn list(&self) -> AppResult<Vec<upcoming_meal::Model>> {
        self.upcoming_repo.find_all().await
    }

    /// Get an upcoming meal by ID.
    pub async fn get(&self, id: &str) -> AppResult<upcoming_meal::Model> {
        self.upcoming_repo.get_by_id(id).await
    }

    /// Close a poll item without publishing it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.upcoming_repo.delete(id).await? {
            return Err(AppError::MealNotFound(id.to_string()));
        }
        info!(item_id = %id, "Upcoming meal deleted");
        Ok(())
    }

    /// Move an upcoming meal onto the menu, carrying over its like count.
    pub async fn publish(&self, id: &str) -> AppResult<meal::Model> {
        let item = self.upcoming_repo.get_by_id(id).await?;

        if self
            .meal_repo
            .find_duplicate(&item.title, &item.distributor_email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Meal {} from {} is already published",
                item.title, item.distributor_email
            )));
        }

        let model = meal::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(item.title),
            category: Set(item.category),
            image: Set(item.image),
            ingredients: Set(item.ingredients),
            description: Set(item.description),
            price: Set(item.price),
            rating: Set(item.rating),
            distributor_name: Set(item.distributor_name),
            distributor_email: Set(item.distributor_email),
            likes: Set(item.likes),
            reviews_count: Set(0),
            created_at: Set(Utc::now().into()),
        };

        let published = self.meal_repo.create(model).await?;
        if !self.upcoming_repo.delete(id).await? {
            warn!(
                item_id = %id,
                meal_id = %published.id,
                "Upcoming meal removed before publish completed"
            );
        }

        info!(item_id = %id, meal_id = %published.id, likes = published.likes, "Upcoming meal published");
        Ok(published)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_item(id: &str, likes: i32, liked_by: serde_json::Value) -> upcoming_meal::Model {
        upcoming_meal::Model {
            id: id.to_string(),
            title: "Mutton Kacchi".to_string(),
            category: "dinner".to_string(),
            image: None,
            ingredients: json!(["mutton", "rice"]),
            description: None,
            price: 220.0,
            rating: 0.0,
            distributor_name: "Hall Kitchen".to_string(),
            distributor_email: "kitchen@campus.edu".to_string(),
            likes,
            liked_by,
            created_at: Utc::now().into(),
        }
    }

    fn published_meal(item: &upcoming_meal::Model) -> meal::Model {
        meal::Model {
            id: "p1".to_string(),
            title: item.title.clone(),
            category: item.category.clone(),
            image: None,
            ingredients: item.ingredients.clone(),
            description: None,
            price: item.price,
            rating: item.rating,
            distributor_name: item.distributor_name.clone(),
            distributor_email: item.distributor_email.clone(),
            likes: item.likes,
            reviews_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> UpcomingMealService {
        let db = Arc::new(db);
        UpcomingMealService::new(
            UpcomingMealRepository::new(Arc::clone(&db)),
            MealRepository::new(db),
        )
    }

    fn create_input() -> CreateMealInput {
        CreateMealInput {
            title: "Mutton Kacchi".to_string(),
            category: "dinner".to_string(),
            image: None,
            ingredients: vec!["mutton".to_string(), "rice".to_string()],
            description: None,
            price: 220.0,
            rating: 0.0,
            distributor_name: "Hall Kitchen".to_string(),
            distributor_email: "kitchen@campus.edu".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_without_likes() {
        let created = create_test_item("up1", 0, json!([]));
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<upcoming_meal::Model>::new()])
                .append_query_results([[created]])
                .into_connection(),
        );

        let result = service.create(create_input()).await.unwrap();

        assert_eq!(result.likes, 0);
        assert!(result.voters().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let existing = create_test_item("up1", 0, json!([]));
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let result = service.create(create_input()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_publish_carries_likes() {
        let item = create_test_item("up1", 2, json!(["u1", "u2"]));
        let meal = published_meal(&item);
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[item]])
                .append_query_results([Vec::<meal::Model>::new()])
                .append_query_results([[meal]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let result = service.publish("up1").await.unwrap();

        assert_eq!(result.likes, 2);
        assert_eq!(result.reviews_count, 0);
    }

    #[tokio::test]
    async fn test_publish_succeeds_when_item_already_removed() {
        let item = create_test_item("up1", 1, json!(["u1"]));
        let meal = published_meal(&item);
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[item]])
                .append_query_results([Vec::<meal::Model>::new()])
                .append_query_results([[meal]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let result = service.publish("up1").await.unwrap();

        assert_eq!(result.id, "p1");
        assert_eq!(result.likes, 1);
    }

    #[tokio::test]
    async fn test_publish_missing_item() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<upcoming_meal::Model>::new()])
                .into_connection(),
        );

        let result = service.publish("gone").await;

        assert!(matches!(result, Err(AppError::MealNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_item() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        assert!(matches!(
            service.delete("gone").await,
            Err(AppError::MealNotFound(_))
        ));
    }
}
