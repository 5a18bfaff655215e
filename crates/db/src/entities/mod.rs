//! Database entities.
//!
//! One entity per stored collection.

pub mod meal;
pub mod meal_order;
pub mod review;
pub mod upcoming_meal;
pub mod user;

pub use meal::Entity as Meal;
pub use meal_order::Entity as MealOrder;
pub use review::Entity as Review;
pub use upcoming_meal::Entity as UpcomingMeal;
pub use user::Entity as User;
