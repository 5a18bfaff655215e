//! Voting ledger for upcoming meals.
//!
//! A voter holds at most one like per upcoming meal. Casting and withdrawing
//! each map to one compound store operation that checks membership in
//! `liked_by` and moves `likes` in the same step, so the counter always equals
//! the number of voters for items created with no likes.
//!
//! Per (item, voter) pair there are two states, not voted and voted. A cast
//! from the voted state or a withdraw from the not-voted state is rejected
//! without touching the store.

use std::sync::Arc;

use async_trait::async_trait;
use campus_common::{AppError, AppResult};
use campus_db::{entities::upcoming_meal, repositories::UpcomingMealRepository};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Ledger result type.
pub type VoteResult<T> = Result<T, VoteError>;

/// Why a vote operation did not apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    /// The upcoming meal does not exist.
    #[error("Upcoming meal not found: {0}")]
    NotFound(String),

    /// Cast by a voter who already likes the item.
    #[error("{voter_id} has already liked {item_id}")]
    AlreadyVoted { item_id: String, voter_id: String },

    /// Withdraw by a voter who does not like the item.
    #[error("{voter_id} has not liked {item_id}")]
    NotVoted { item_id: String, voter_id: String },

    /// Empty voter identifier.
    #[error("Voter ID must not be empty")]
    InvalidVoter,

    /// The store call failed. Safe to retry; nothing was applied.
    #[error("Vote storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<VoteError> for AppError {
    fn from(err: VoteError) -> Self {
        match err {
            VoteError::NotFound(id) => Self::MealNotFound(id),
            VoteError::AlreadyVoted { .. } | VoteError::NotVoted { .. } => {
                Self::Conflict(err.to_string())
            }
            VoteError::InvalidVoter => Self::Validation(err.to_string()),
            VoteError::StorageUnavailable(msg) => Self::Database(msg),
        }
    }
}

/// Like count and current voters of one upcoming meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub item_id: String,
    pub like_count: i32,
    pub liked_by: Vec<String>,
}

impl From<&upcoming_meal::Model> for Tally {
    fn from(item: &upcoming_meal::Model) -> Self {
        Self {
            item_id: item.id.clone(),
            like_count: item.likes,
            liked_by: item.voters(),
        }
    }
}

/// Storage operations the ledger needs.
///
/// `add_voter` and `remove_voter` must each apply the membership check and
/// both field updates atomically with respect to other calls on the same
/// item. They return `None` when the item is absent or the membership
/// precondition does not hold.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Read an item.
    async fn find_item(&self, item_id: &str) -> AppResult<Option<upcoming_meal::Model>>;

    /// Add `voter_id` to `liked_by` and increment `likes`, if not a member.
    async fn add_voter(
        &self,
        item_id: &str,
        voter_id: &str,
    ) -> AppResult<Option<upcoming_meal::Model>>;

    /// Remove `voter_id` from `liked_by` and decrement `likes`, if a member.
    async fn remove_voter(
        &self,
        item_id: &str,
        voter_id: &str,
    ) -> AppResult<Option<upcoming_meal::Model>>;
}

#[async_trait]
impl VoteStore for UpcomingMealRepository {
    async fn find_item(&self, item_id: &str) -> AppResult<Option<upcoming_meal::Model>> {
        self.find_by_id(item_id).await
    }

    async fn add_voter(
        &self,
        item_id: &str,
        voter_id: &str,
    ) -> AppResult<Option<upcoming_meal::Model>> {
        Self::add_voter(self, item_id, voter_id).await
    }

    async fn remove_voter(
        &self,
        item_id: &str,
        voter_id: &str,
    ) -> AppResult<Option<upcoming_meal::Model>> {
        Self::remove_voter(self, item_id, voter_id).await
    }
}

/// The only writer of `likes` and `liked_by` on upcoming meals.
#[derive(Clone)]
pub struct VotingLedger {
    store: Arc<dyn VoteStore>,
}

impl VotingLedger {
    /// Create a ledger over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self { store }
    }

    /// Like an upcoming meal on behalf of `voter_id`.
    pub async fn cast_vote(&self, item_id: &str, voter_id: &str) -> VoteResult<Tally> {
        check_voter(voter_id)?;

        let updated = self
            .store
            .add_voter(item_id, voter_id)
            .await
            .map_err(|e| storage_unavailable(item_id, &e))?;

        match updated {
            Some(item) => {
                info!(item_id, voter_id, likes = item.likes, "Vote cast");
                Ok(Tally::from(&item))
            }
            None => {
                let err = self
                    .explain_rejection(
                        item_id,
                        VoteError::AlreadyVoted {
                            item_id: item_id.to_string(),
                            voter_id: voter_id.to_string(),
                        },
                    )
                    .await;
                debug!(item_id, voter_id, error = %err, "Vote cast rejected");
                Err(err)
            }
        }
    }

    /// Withdraw the like `voter_id` holds on an upcoming meal.
    pub async fn withdraw_vote(&self, item_id: &str, voter_id: &str) -> VoteResult<Tally> {
        check_voter(voter_id)?;

        let updated = self
            .store
            .remove_voter(item_id, voter_id)
            .await
            .map_err(|e| storage_unavailable(item_id, &e))?;

        match updated {
            Some(item) => {
                info!(item_id, voter_id, likes = item.likes, "Vote withdrawn");
                Ok(Tally::from(&item))
            }
            None => {
                let err = self
                    .explain_rejection(
                        item_id,
                        VoteError::NotVoted {
                            item_id: item_id.to_string(),
                            voter_id: voter_id.to_string(),
                        },
                    )
                    .await;
                debug!(item_id, voter_id, error = %err, "Vote withdrawal rejected");
                Err(err)
            }
        }
    }

    /// Current like count and voters.
    pub async fn tally(&self, item_id: &str) -> VoteResult<Tally> {
        self.store
            .find_item(item_id)
            .await
            .map_err(|e| storage_unavailable(item_id, &e))?
            .map(|item| Tally::from(&item))
            .ok_or_else(|| VoteError::NotFound(item_id.to_string()))
    }

    /// A conditional update matched nothing: either the item is gone or the
    /// membership precondition failed.
    async fn explain_rejection(&self, item_id: &str, precondition: VoteError) -> VoteError {
        match self.store.find_item(item_id).await {
            Ok(Some(_)) => precondition,
            Ok(None) => VoteError::NotFound(item_id.to_string()),
            Err(e) => storage_unavailable(item_id, &e),
        }
    }
}

fn check_voter(voter_id: &str) -> VoteResult<()> {
    if voter_id.trim().is_empty() {
        return Err(VoteError::InvalidVoter);
    }
    Ok(())
}

fn storage_unavailable(item_id: &str, err: &AppError) -> VoteError {
    warn!(item_id, error = %err, "Vote store call failed");
    VoteError::StorageUnavailable(err.to_string())
}

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryVoteStore;

#[cfg(any(test, feature = "test-utils"))]
mod memory {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use campus_common::{AppError, AppResult};
    use campus_db::entities::upcoming_meal;
    use serde_json::{Value as JsonValue, json};
    use tokio::sync::Mutex;

    use super::VoteStore;

    /// Process-local [`VoteStore`]; one lock serializes every compound update.
    #[derive(Clone, Default)]
    pub struct InMemoryVoteStore {
        items: Arc<Mutex<HashMap<String, upcoming_meal::Model>>>,
        unavailable: Arc<AtomicBool>,
    }

    impl InMemoryVoteStore {
        /// Create an empty store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert or replace an item.
        pub async fn insert(&self, item: upcoming_meal::Model) {
            self.items.lock().await.insert(item.id.clone(), item);
        }

        /// Make every subsequent call fail as if the store were down.
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        fn check_available(&self) -> AppResult<()> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(AppError::Database("connection refused".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl VoteStore for InMemoryVoteStore {
        async fn find_item(&self, item_id: &str) -> AppResult<Option<upcoming_meal::Model>> {
            self.check_available()?;
            Ok(self.items.lock().await.get(item_id).cloned())
        }

        async fn add_voter(
            &self,
            item_id: &str,
            voter_id: &str,
        ) -> AppResult<Option<upcoming_meal::Model>> {
            self.check_available()?;
            let mut items = self.items.lock().await;
            let Some(item) = items.get_mut(item_id) else {
                return Ok(None);
            };
            if item.has_voter(voter_id) {
                return Ok(None);
            }

            match item.liked_by.as_array_mut() {
                Some(voters) => voters.push(JsonValue::from(voter_id)),
                None => item.liked_by = json!([voter_id]),
            }
            item.likes += 1;
            Ok(Some(item.clone()))
        }

        async fn remove_voter(
            &self,
            item_id: &str,
            voter_id: &str,
        ) -> AppResult<Option<upcoming_meal::Model>> {
            self.check_available()?;
            let mut items = self.items.lock().await;
            let Some(item) = items.get_mut(item_id) else {
                return Ok(None);
            };
            if !item.has_voter(voter_id) {
                return Ok(None);
            }

            if let Some(voters) = item.liked_by.as_array_mut() {
                voters.retain(|v| v.as_str() != Some(voter_id));
            }
            item.likes -= 1;
            Ok(Some(item.clone()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    fn create_test_item(id: &str, liked_by: &[&str]) -> upcoming_meal::Model {
        upcoming_meal::Model {
            id: id.to_string(),
            title: "Chicken Roast".to_string(),
            category: "dinner".to_string(),
            image: None,
            ingredients: json!(["chicken", "ghee"]),
            description: None,
            price: 140.0,
            rating: 0.0,
            distributor_name: "Hall Kitchen".to_string(),
            distributor_email: "kitchen@campus.edu".to_string(),
            likes: i32::try_from(liked_by.len()).unwrap(),
            liked_by: json!(liked_by),
            created_at: Utc::now().into(),
        }
    }

    async fn ledger_with(items: Vec<upcoming_meal::Model>) -> (VotingLedger, InMemoryVoteStore) {
        let store = InMemoryVoteStore::new();
        for item in items {
            store.insert(item).await;
        }
        (VotingLedger::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_second_cast_is_rejected_and_counts_once() {
        let (ledger, _) = ledger_with(vec![create_test_item("m1", &[])]).await;

        let first = ledger.cast_vote("m1", "u1").await.unwrap();
        assert_eq!(first.like_count, 1);

        let second = ledger.cast_vote("m1", "u1").await;
        assert_eq!(
            second,
            Err(VoteError::AlreadyVoted {
                item_id: "m1".to_string(),
                voter_id: "u1".to_string(),
            })
        );

        let tally = ledger.tally("m1").await.unwrap();
        assert_eq!(tally.like_count, 1);
        assert_eq!(tally.liked_by, vec!["u1".to_string()]);
    }

    #[tokio::test]
    async fn test_cast_then_withdraw_restores_tally() {
        let (ledger, _) = ledger_with(vec![create_test_item("m1", &["a", "b"])]).await;
        let before = ledger.tally("m1").await.unwrap();

        ledger.cast_vote("m1", "u1").await.unwrap();
        let after = ledger.withdraw_vote("m1", "u1").await.unwrap();

        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_counter_matches_voters_after_every_operation() {
        let (ledger, _) = ledger_with(vec![create_test_item("m1", &[])]).await;
        let voters = ["u1", "u2", "u3", "u4"];

        // Deterministic pseudo-random walk over cast/withdraw for four voters.
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..200 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let voter = voters[(seed >> 16) as usize % voters.len()];
            let _ = if seed & 1 == 0 {
                ledger.cast_vote("m1", voter).await
            } else {
                ledger.withdraw_vote("m1", voter).await
            };

            let tally = ledger.tally("m1").await.unwrap();
            assert_eq!(tally.like_count as usize, tally.liked_by.len());

            let mut unique = tally.liked_by.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), tally.liked_by.len());
        }
    }

    #[tokio::test]
    async fn test_withdraw_without_vote_is_rejected_without_mutation() {
        let (ledger, _) = ledger_with(vec![create_test_item("m1", &["a"])]).await;
        let before = ledger.tally("m1").await.unwrap();

        let result = ledger.withdraw_vote("m1", "stranger").await;

        assert!(matches!(result, Err(VoteError::NotVoted { .. })));
        assert_eq!(ledger.tally("m1").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_missing_item_is_not_found() {
        let (ledger, _) = ledger_with(vec![]).await;

        assert_eq!(
            ledger.cast_vote("nope", "u1").await,
            Err(VoteError::NotFound("nope".to_string()))
        );
        assert_eq!(
            ledger.withdraw_vote("nope", "u1").await,
            Err(VoteError::NotFound("nope".to_string()))
        );
        assert_eq!(
            ledger.tally("nope").await,
            Err(VoteError::NotFound("nope".to_string()))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_casts_by_same_voter_apply_once() {
        for _ in 0..50 {
            let (ledger, _) = ledger_with(vec![create_test_item("m1", &[])]).await;

            let a = tokio::spawn({
                let ledger = ledger.clone();
                async move { ledger.cast_vote("m1", "u1").await }
            });
            let b = tokio::spawn({
                let ledger = ledger.clone();
                async move { ledger.cast_vote("m1", "u1").await }
            });
            let results = [a.await.unwrap(), b.await.unwrap()];

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            assert!(
                results
                    .iter()
                    .any(|r| matches!(r, Err(VoteError::AlreadyVoted { .. })))
            );
            assert_eq!(ledger.tally("m1").await.unwrap().like_count, 1);
        }
    }

    #[tokio::test]
    async fn test_empty_voter_is_rejected() {
        let (ledger, _) = ledger_with(vec![create_test_item("m1", &[])]).await;

        assert_eq!(ledger.cast_vote("m1", "").await, Err(VoteError::InvalidVoter));
        assert_eq!(
            ledger.withdraw_vote("m1", "   ").await,
            Err(VoteError::InvalidVoter)
        );
        assert_eq!(ledger.tally("m1").await.unwrap().like_count, 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_storage_unavailable() {
        let (ledger, store) = ledger_with(vec![create_test_item("m1", &[])]).await;
        store.set_unavailable(true);

        assert!(matches!(
            ledger.cast_vote("m1", "u1").await,
            Err(VoteError::StorageUnavailable(_))
        ));

        store.set_unavailable(false);
        assert_eq!(ledger.tally("m1").await.unwrap().like_count, 0);
    }

    #[tokio::test]
    async fn test_repository_rejection_distinguishes_missing_item() {
        // First statement: conditional update matches nothing.
        // Second statement: the follow-up read.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    Vec::<upcoming_meal::Model>::new(),
                    vec![create_test_item("m1", &["u1"])],
                    Vec::<upcoming_meal::Model>::new(),
                    Vec::<upcoming_meal::Model>::new(),
                ])
                .into_connection(),
        );
        let ledger = VotingLedger::new(Arc::new(UpcomingMealRepository::new(db)));

        assert!(matches!(
            ledger.cast_vote("m1", "u1").await,
            Err(VoteError::AlreadyVoted { .. })
        ));
        assert_eq!(
            ledger.cast_vote("gone", "u1").await,
            Err(VoteError::NotFound("gone".to_string()))
        );
    }

    #[test]
    fn test_vote_errors_map_to_app_errors() {
        let status = |err: VoteError| AppError::from(err).status_code().as_u16();

        assert_eq!(status(VoteError::NotFound("m1".to_string())), 404);
        assert_eq!(
            status(VoteError::AlreadyVoted {
                item_id: "m1".to_string(),
                voter_id: "u1".to_string(),
            }),
            409
        );
        assert_eq!(
            status(VoteError::NotVoted {
                item_id: "m1".to_string(),
                voter_id: "u1".to_string(),
            }),
            409
        );
        assert_eq!(status(VoteError::InvalidVoter), 400);
        assert_eq!(
            status(VoteError::StorageUnavailable("down".to_string())),
            503
        );
    }
}
