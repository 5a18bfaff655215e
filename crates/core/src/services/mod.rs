//! Business logic services.

#![allow(missing_docs)]

pub mod meal;
pub mod order;
pub mod review;
pub mod upcoming_meal;
pub mod user;
pub mod voting;

pub use meal::{CreateMealInput, MealPage, MealService};
pub use order::{CreateOrderInput, OrderService};
pub use review::{CreateReviewInput, ReviewService, UpdateReviewInput};
pub use upcoming_meal::UpcomingMealService;
pub use user::{CreateUserInput, UserService};
#[cfg(any(test, feature = "test-utils"))]
pub use voting::InMemoryVoteStore;
pub use voting::{Tally, VoteError, VoteResult, VoteStore, VotingLedger};
