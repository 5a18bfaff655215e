//! Application state and HTTP middleware.

#![allow(missing_docs)]

use std::{sync::Arc, time::Duration};

use axum::Router;
use campus_core::{
    MealService, OrderService, ReviewService, UpcomingMealService, UserService, VoteStore,
    VotingLedger,
};
use campus_db::repositories::{
    MealOrderRepository, MealRepository, ReviewRepository, UpcomingMealRepository, UserRepository,
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub meal_service: MealService,
    pub upcoming_meal_service: UpcomingMealService,
    pub review_service: ReviewService,
    pub order_service: OrderService,
    pub voting: VotingLedger,
}

impl AppState {
    /// Wire every service over one connection pool.
    ///
    /// The voting ledger writes through [`UpcomingMealRepository`].
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let meal_repo = MealRepository::new(Arc::clone(&db));
        let upcoming_repo = UpcomingMealRepository::new(Arc::clone(&db));
        let review_repo = ReviewRepository::new(Arc::clone(&db));
        let order_repo = MealOrderRepository::new(db);

        Self {
            user_service: UserService::new(user_repo),
            meal_service: MealService::new(meal_repo.clone()),
            upcoming_meal_service: UpcomingMealService::new(
                upcoming_repo.clone(),
                meal_repo.clone(),
            ),
            review_service: ReviewService::new(review_repo, meal_repo),
            order_service: OrderService::new(order_repo),
            voting: VotingLedger::new(Arc::new(upcoming_repo)),
        }
    }

    /// Route vote operations to a different store.
    #[must_use]
    pub fn with_vote_store(mut self, store: Arc<dyn VoteStore>) -> Self {
        self.voting = VotingLedger::new(store);
        self
    }
}

/// Wrap a router in the request tracing, CORS and timeout layers.
///
/// A request still running after `request_timeout` is answered with
/// `408 Request Timeout` and its handler future is dropped.
pub fn layered<S>(router: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
