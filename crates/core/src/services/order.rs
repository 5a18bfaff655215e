//! Meal order service.

use campus_common::{AppError, AppResult, IdGenerator};
use campus_db::{
    entities::meal_order::{self, OrderStatus},
    repositories::MealOrderRepository,
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Input for placing an order.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    #[validate(length(min = 1))]
    pub meal_id: String,
    #[validate(length(min = 1, max = 256))]
    pub meal_title: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(email)]
    pub user_email: String,
    pub user_name: Option<String>,
}

/// Service for meal orders.
#[derive(Clone)]
pub struct OrderService {
    order_repo: MealOrderRepository,
    id_gen: IdGenerator,
}

impl OrderService {
    /// Create a new order service.
    #[must_use]
    pub const fn new(order_repo: MealOrderRepository) -> Self {
        Self {
            order_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Place a pending order.
    pub async fn create(&self, input: CreateOrderInput) -> AppResult<meal_order::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let model = meal_order::ActiveModel {
            id: Set(self.id_gen.generate()),
            meal_id: Set(input.meal_id),
            meal_title: Set(input.meal_title),
            price: Set(input.price),
            user_email: Set(input.user_email),
            user_name: Set(input.user_name),
            status: Set(OrderStatus::Pending),
            created_at: Set(Utc::now().into()),
        };

        let created = self.order_repo.create(model).await?;
        info!(order_id = %created.id, "Order placed");
        Ok(created)
    }

    /// List orders, newest first, optionally for one customer.
    pub async fn list(&self, user_email: Option<&str>) -> AppResult<Vec<meal_order::Model>> {
        self.order_repo.find(user_email).await
    }

    /// Mark an order as served.
    pub async fn mark_done(&self, id: &str) -> AppResult<()> {
        if !self.order_repo.set_status(id, OrderStatus::Done).await? {
            return Err(AppError::NotFound(format!("Order {id}")));
        }
        info!(order_id = %id, "Order done");
        Ok(())
    }
}
