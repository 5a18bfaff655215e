//! Upcoming meal entity.
//!
//! An upcoming meal is a poll item: users like it to signal demand before it
//! is published to the regular menu. `likes` and `liked_by` move together and
//! are only written through the voting statements in
//! [`crate::repositories::UpcomingMealRepository`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "upcoming_meal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    pub category: String,

    #[sea_orm(nullable)]
    pub image: Option<String>,

    #[sea_orm(column_type = "JsonBinary")]
    pub ingredients: JsonValue,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub price: f64,

    pub rating: f64,

    pub distributor_name: String,

    #[sea_orm(indexed)]
    pub distributor_email: String,

    #[sea_orm(default_value = 0)]
    pub likes: i32,

    /// Voter IDs with an active like (JSON array of strings, no duplicates)
    #[sea_orm(column_type = "JsonBinary")]
    pub liked_by: JsonValue,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Voter IDs currently holding a like.
    #[must_use]
    pub fn voters(&self) -> Vec<String> {
        self.liked_by
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `voter_id` currently holds a like.
    #[must_use]
    pub fn has_voter(&self, voter_id: &str) -> bool {
        self.liked_by
            .as_array()
            .is_some_and(|ids| ids.iter().any(|v| v.as_str() == Some(voter_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn item(liked_by: JsonValue) -> Model {
        Model {
            id: "m1".to_string(),
            title: "Khichuri".to_string(),
            category: "lunch".to_string(),
            image: None,
            ingredients: json!([]),
            description: None,
            price: 80.0,
            rating: 0.0,
            distributor_name: "Hall Kitchen".to_string(),
            distributor_email: "kitchen@campus.edu".to_string(),
            likes: 0,
            liked_by,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_voters_reads_string_array() {
        let model = item(json!(["u1", "u2"]));
        assert_eq!(model.voters(), vec!["u1".to_string(), "u2".to_string()]);
        assert!(model.has_voter("u2"));
        assert!(!model.has_voter("u3"));
    }

    #[test]
    fn test_voters_tolerates_missing_array() {
        let model = item(JsonValue::Null);
        assert!(model.voters().is_empty());
        assert!(!model.has_voter("u1"));
    }
}
