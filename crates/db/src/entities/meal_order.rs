//! Meal order entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order fulfilment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Done")]
    Done,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub meal_id: String,

    pub meal_title: String,

    pub price: f64,

    #[sea_orm(indexed)]
    pub user_email: String,

    #[sea_orm(nullable)]
    pub user_name: Option<String>,

    pub status: OrderStatus,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
