//! Meal order repository.

use std::sync::Arc;

use crate::entities::{MealOrder, meal_order};
use campus_common::{AppError, AppResult};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};

/// Meal order repository for database operations.
#[derive(Clone)]
pub struct MealOrderRepository {
    db: Arc<DatabaseConnection>,
}

impl MealOrderRepository {
    /// Create a new meal order repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an order by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<meal_order::Model>> {
        MealOrder::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List orders, newest first, optionally for a single user.
    pub async fn find(&self, user_email: Option<&str>) -> AppResult<Vec<meal_order::Model>> {
        let mut select = MealOrder::find().order_by_desc(meal_order::Column::Id);

        if let Some(email) = user_email {
            select = select.filter(meal_order::Column::UserEmail.eq(email));
        }

        select
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new order.
    pub async fn create(&self, model: meal_order::ActiveModel) -> AppResult<meal_order::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set an order's status. Returns whether an order matched.
    pub async fn set_status(&self, id: &str, status: meal_order::OrderStatus) -> AppResult<bool> {
        let result = MealOrder::update_many()
            .col_expr(meal_order::Column::Status, Expr::value(status.to_value()))
            .filter(meal_order::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }
}
