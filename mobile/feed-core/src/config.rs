/// Configuration management for the feed
///
/// Loads configuration from environment variables.
use std::time::Duration;

use anyhow::{bail, Result};
use resilience::RetryConfig;
use uuid::Uuid;

use crate::coordinator::{VoteFailurePolicy, DEFAULT_ADVANCE_DELAY};
use crate::feed::SortOption;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Acting voter for every vote cast from this installation
    pub voter_id: String,
    /// Sort used on first load
    pub default_sort: SortOption,
    /// Posts per page
    pub page_size: u32,
    /// How long the vote color stays on screen
    pub flash_duration: Duration,
    /// Pause between a vote landing and the next card
    pub advance_delay: Duration,
    /// Handling of failed vote requests
    pub failure_policy: VoteFailurePolicy,
}

// Default values
fn default_page_size() -> u32 {
    10
}

fn default_flash_duration() -> Duration {
    Duration::from_millis(600)
}

fn default_max_retries() -> u32 {
    3
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl FeedConfig {
    pub fn new(voter_id: impl Into<String>) -> Self {
        Self {
            voter_id: voter_id.into(),
            default_sort: SortOption::default(),
            page_size: default_page_size(),
            flash_duration: default_flash_duration(),
            advance_delay: DEFAULT_ADVANCE_DELAY,
            failure_policy: VoteFailurePolicy::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Without `HOTTAKE_VOTER_UUID` a fresh v4 UUID is used for the session.
    pub fn from_env() -> Result<Self> {
        let voter_id = std::env::var("HOTTAKE_VOTER_UUID")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let default_sort = match std::env::var("HOTTAKE_DEFAULT_SORT") {
            Ok(value) => match SortOption::parse(&value) {
                Some(sort) => sort,
                None => bail!("HOTTAKE_DEFAULT_SORT has unknown sort '{}'", value),
            },
            Err(_) => SortOption::default(),
        };

        let retry = RetryConfig::default().with_max_retries(
            env_parse("HOTTAKE_VOTE_MAX_RETRIES").unwrap_or_else(default_max_retries),
        );
        let failure_policy = match std::env::var("HOTTAKE_VOTE_FAILURE_POLICY") {
            Ok(value) => match VoteFailurePolicy::parse(&value, retry) {
                Some(policy) => policy,
                None => bail!(
                    "HOTTAKE_VOTE_FAILURE_POLICY must be keep, rollback or retry, got '{}'",
                    value
                ),
            },
            Err(_) => VoteFailurePolicy::default(),
        };

        Ok(Self {
            voter_id,
            default_sort,
            page_size: env_parse("HOTTAKE_PAGE_SIZE").unwrap_or_else(default_page_size),
            flash_duration: env_parse("HOTTAKE_FLASH_MS")
                .map(Duration::from_millis)
                .unwrap_or_else(default_flash_duration),
            advance_delay: env_parse("HOTTAKE_ADVANCE_MS")
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_ADVANCE_DELAY),
            failure_policy,
        })
    }
}
