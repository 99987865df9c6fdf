//! HotTake
//!
//! Facade over the HotTake workspace: the API client, the feed core that
//! drives cards and votes, and the resilience helpers both rely on.

pub use feed_core;
pub use hottake_api;
pub use resilience;
