//! Optimistic vote-and-navigate protocol for a single feed card
//!
//! A vote is applied locally first so the card reacts immediately, then
//! sent to the API. The server's answer replaces the local sets. On success
//! the feed flashes the vote color and advances to the next card after a
//! short pause.
//!
//! Ordering rules:
//! - Single-flight: one vote request per card at a time; a second cast while
//!   one is pending is rejected without touching state.
//! - Every cast takes a sequence number; a response (or a rollback) only
//!   applies if it belongs to the latest cast.
//! - The card's lifetime token cancels pending requests and the advance
//!   timer; nothing is applied after unmount.

use std::sync::Arc;
use std::time::Duration;

use hottake_api::{ApiError, HotTakeApi, Post};
use parking_lot::Mutex;
use resilience::{with_retry_if, RetryConfig, RetryError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::vote::{FlashColor, VoteDirection, VoteState};

/// Pause between a successful vote and the feed moving on
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(750);

/// Callbacks into the feed that hosts the card
pub trait FeedNavigator: Send + Sync {
    /// Show the vote color; the feed clears it on its own
    fn flash(&self, color: FlashColor);

    /// Move to the card after this one
    fn advance(&self);
}

/// What to do with the optimistic edit when the vote request fails
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VoteFailurePolicy {
    /// Log and leave the optimistic sets in place
    #[default]
    KeepOptimistic,
    /// Restore the sets from before the vote
    Rollback,
    /// Retry retryable errors with backoff, roll back once retries run out
    Retry(RetryConfig),
}

impl VoteFailurePolicy {
    /// Parse `keep`, `rollback` or `retry`
    pub fn parse(value: &str, retry: RetryConfig) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keep" | "keep-optimistic" => Some(Self::KeepOptimistic),
            "rollback" => Some(Self::Rollback),
            "retry" => Some(Self::Retry(retry)),
            _ => None,
        }
    }

    fn rolls_back(&self) -> bool {
        !matches!(self, Self::KeepOptimistic)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    #[error("Invalid vote: {0}")]
    Validation(String),

    #[error("A vote on post {0} is already in flight")]
    InFlight(String),

    #[error("Card unmounted before the vote completed")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result of a vote the server accepted
#[derive(Debug, Clone, PartialEq)]
pub struct VoteOutcome {
    pub direction: VoteDirection,
    pub flash: FlashColor,
    /// Card state after reconciliation
    pub state: VoteState,
}

struct Inner {
    vote: VoteState,
    seq: u64,
    in_flight: bool,
}

/// Clears the single-flight flag however the cast ends, including when
/// the caller drops the future
struct InFlightGuard<'a> {
    inner: &'a Mutex<Inner>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.inner.lock().in_flight = false;
    }
}

pub struct VoteCoordinator {
    post_id: String,
    voter_id: String,
    api: Arc<dyn HotTakeApi>,
    navigator: Arc<dyn FeedNavigator>,
    lifetime: CancellationToken,
    advance_delay: Duration,
    policy: VoteFailurePolicy,
    inner: Mutex<Inner>,
}

impl VoteCoordinator {
    pub fn new(
        post: &Post,
        voter_id: impl Into<String>,
        api: Arc<dyn HotTakeApi>,
        navigator: Arc<dyn FeedNavigator>,
        lifetime: CancellationToken,
    ) -> Self {
        let voter_id = voter_id.into();
        let vote = VoteState::seed(post, &voter_id);

        Self {
            post_id: post.id.clone(),
            voter_id,
            api,
            navigator,
            lifetime,
            advance_delay: DEFAULT_ADVANCE_DELAY,
            policy: VoteFailurePolicy::default(),
            inner: Mutex::new(Inner {
                vote,
                seq: 0,
                in_flight: false,
            }),
        }
    }

    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    pub fn with_failure_policy(mut self, policy: VoteFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn voter_id(&self) -> &str {
        &self.voter_id
    }

    /// Copy of the current (possibly provisional) state
    pub fn state(&self) -> VoteState {
        self.inner.lock().vote.clone()
    }

    pub fn has_voted(&self) -> bool {
        self.inner.lock().vote.has_voted()
    }

    pub fn is_in_flight(&self) -> bool {
        self.inner.lock().in_flight
    }

    /// Cast (or toggle off) a vote for this card's voter
    pub async fn cast_vote(&self, direction: VoteDirection) -> Result<VoteOutcome, VoteError> {
        if self.post_id.trim().is_empty() || self.voter_id.trim().is_empty() {
            return Err(VoteError::Validation(
                "post id and voter id are required".to_string(),
            ));
        }
        if self.lifetime.is_cancelled() {
            return Err(VoteError::Cancelled);
        }

        let (seq, before) = {
            let mut inner = self.inner.lock();
            if inner.in_flight {
                warn!(post_id = %self.post_id, %direction, "Vote rejected, previous vote still in flight");
                return Err(VoteError::InFlight(self.post_id.clone()));
            }
            inner.in_flight = true;

            let before = (inner.vote.agree.clone(), inner.vote.disagree.clone());
            inner.vote.apply_optimistic(direction, &self.voter_id);
            inner.seq += 1;
            (inner.seq, before)
        };
        let _guard = InFlightGuard { inner: &self.inner };

        debug!(post_id = %self.post_id, %direction, seq, "Sending vote");

        let result = tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => {
                info!(post_id = %self.post_id, seq, "Card unmounted, dropping vote response");
                return Err(VoteError::Cancelled);
            }
            result = self.send(direction) => result,
        };

        if self.lifetime.is_cancelled() {
            return Err(VoteError::Cancelled);
        }

        match result {
            Ok(post) => {
                let state = {
                    let mut inner = self.inner.lock();
                    if inner.seq == seq {
                        inner.vote.reconcile(&post);
                    } else {
                        debug!(post_id = %self.post_id, seq, latest = inner.seq, "Stale vote response ignored");
                    }
                    inner.vote.mark_voted();
                    inner.vote.clone()
                };

                info!(
                    post_id = %self.post_id,
                    %direction,
                    agree = state.agree_count(),
                    disagree = state.disagree_count(),
                    "Vote recorded"
                );

                self.schedule_cues(direction);

                Ok(VoteOutcome {
                    direction,
                    flash: direction.flash_color(),
                    state,
                })
            }
            Err(e) => {
                warn!(post_id = %self.post_id, %direction, error = %e, "Vote failed");

                if self.policy.rolls_back() {
                    let mut inner = self.inner.lock();
                    if inner.seq == seq {
                        inner.vote.restore_sets(before.0, before.1);
                        debug!(post_id = %self.post_id, seq, "Optimistic vote rolled back");
                    }
                }

                Err(VoteError::Api(e))
            }
        }
    }

    async fn send(&self, direction: VoteDirection) -> Result<Post, ApiError> {
        match &self.policy {
            VoteFailurePolicy::Retry(config) => {
                with_retry_if(config, || self.call(direction), ApiError::is_retryable)
                    .await
                    .map_err(RetryError::into_inner)
            }
            _ => self.call(direction).await,
        }
    }

    async fn call(&self, direction: VoteDirection) -> Result<Post, ApiError> {
        match direction {
            VoteDirection::Agree => self.api.agree(&self.post_id, &self.voter_id).await,
            VoteDirection::Disagree => self.api.disagree(&self.post_id, &self.voter_id).await,
        }
    }

    /// Flash now, advance after the delay unless the card goes away first
    fn schedule_cues(&self, direction: VoteDirection) {
        self.navigator.flash(direction.flash_color());

        let navigator = Arc::clone(&self.navigator);
        let lifetime = self.lifetime.clone();
        let delay = self.advance_delay;
        let post_id = self.post_id.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = lifetime.cancelled() => {
                    debug!(%post_id, "Card unmounted before advance");
                }
                _ = tokio::time::sleep(delay) => navigator.advance(),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        let retry = RetryConfig::default();
        assert_eq!(
            VoteFailurePolicy::parse("keep", retry.clone()),
            Some(VoteFailurePolicy::KeepOptimistic)
        );
        assert_eq!(
            VoteFailurePolicy::parse(" Rollback ", retry.clone()),
            Some(VoteFailurePolicy::Rollback)
        );
        assert_eq!(
            VoteFailurePolicy::parse("retry", retry.clone()),
            Some(VoteFailurePolicy::Retry(retry.clone()))
        );
        assert_eq!(VoteFailurePolicy::parse("panic", retry), None);
    }

    #[test]
    fn test_only_keep_leaves_optimistic_state() {
        assert!(!VoteFailurePolicy::KeepOptimistic.rolls_back());
        assert!(VoteFailurePolicy::Rollback.rolls_back());
        assert!(VoteFailurePolicy::Retry(RetryConfig::default()).rolls_back());
    }
}
