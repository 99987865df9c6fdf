//! HotTake feed core
//!
//! Everything behind the swipeable feed that is not drawing pixels: the
//! per-card optimistic vote protocol, comment threads, the feed session
//! that cards call back into, and post composition.

pub mod card;
pub mod comments;
pub mod compose;
pub mod config;
pub mod coordinator;
pub mod feed;
pub mod format;
pub mod logging;
pub mod vote;

pub use card::PostCard;
pub use comments::{CommentError, CommentThread};
pub use compose::compose_post;
pub use config::FeedConfig;
pub use coordinator::{
    FeedNavigator, VoteCoordinator, VoteError, VoteFailurePolicy, VoteOutcome,
};
pub use feed::{FeedSession, FlashCue, SortOption};
pub use vote::{FlashColor, VoteDirection, VoteState};
