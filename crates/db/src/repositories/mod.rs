//! Repositories over the stored collections.
//!
//! Each repository method issues a single statement against the store.

mod meal;
mod meal_order;
mod review;
mod upcoming_meal;
mod user;

pub use meal::MealRepository;
pub use meal_order::MealOrderRepository;
pub use review::ReviewRepository;
pub use upcoming_meal::UpcomingMealRepository;
pub use user::UserRepository;

/// Build a `LIKE` pattern matching `needle` anywhere, case-folded.
///
/// `%`, `_` and `\` in the needle match literally.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
