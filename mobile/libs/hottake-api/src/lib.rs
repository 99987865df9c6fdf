//! HotTake API Client
//!
//! Typed access to the HotTake REST API: posts, votes and comments.
//! Every call validates its inputs before touching the network, logs
//! failures at the call site and maps non-success responses to
//! [`ApiError::Rejected`] with the server's message when one is provided.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{HotTakeApi, HotTakeClient};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use models::{Comment, NewComment, NewPost, Post, VoteRequest, MAX_TITLE_CHARS};
