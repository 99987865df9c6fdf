/// Resilience patterns for the HotTake client
///
/// This library provides the failure-handling building blocks used around
/// remote API calls:
/// - **Timeout**: Enforces a deadline on a single request
/// - **Retry**: Exponential backoff with jitter for transient failures,
///   optionally gated on a retryability predicate
///
/// # Example: Retrying a vote until the server accepts it
///
/// ```rust,no_run
/// use resilience::{with_retry_if, RetryConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let result = with_retry_if(
///         &RetryConfig::default(),
///         || async {
///             // Your API call here
///             Ok::<_, String>(())
///         },
///         |err: &String| !err.starts_with("4"),
///     )
///     .await;
/// }
/// ```
///
/// # Example: Request with Timeout
///
/// ```rust,no_run
/// use resilience::with_timeout;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let result = with_timeout(Duration::from_secs(10), async {
///         // Your request
///         42
///     })
///     .await;
/// }
/// ```

pub mod retry;
pub mod timeout;

// Re-export main types for convenience
pub use retry::{with_retry, with_retry_if, RetryConfig, RetryError};
pub use timeout::{with_timeout, TimeoutConfig, TimeoutError};
