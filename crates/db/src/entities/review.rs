//! Meal review entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub meal_id: String,

    pub meal_title: String,

    pub user_email: String,

    #[sea_orm(nullable)]
    pub user_name: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub review: String,

    /// 1..=5 stars
    #[sea_orm(nullable)]
    pub rating: Option<i32>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::meal::Entity",
        from = "Column::MealId",
        to = "super::meal::Column::Id",
        on_delete = "Cascade"
    )]
    Meal,
}

impl Related<super::meal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
