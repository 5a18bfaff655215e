//! Meal entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    /// Breakfast, lunch, dinner, ...
    pub category: String,

    #[sea_orm(nullable)]
    pub image: Option<String>,

    /// Ingredient names (JSON array of strings)
    #[sea_orm(column_type = "JsonBinary")]
    pub ingredients: JsonValue,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub price: f64,

    pub rating: f64,

    pub distributor_name: String,

    #[sea_orm(indexed)]
    pub distributor_email: String,

    /// Unconditional like counter, never below zero
    #[sea_orm(default_value = 0)]
    pub likes: i32,

    #[sea_orm(default_value = 0)]
    pub reviews_count: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review::Entity")]
    Review,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
