//! A mounted feed card: one post, its votes and its comments
//!
//! Everything asynchronous the card starts is tied to its lifetime token.
//! Unmounting (or dropping) the card cancels the token, so late responses
//! are discarded instead of being applied to a card nobody sees.

use std::sync::Arc;

use hottake_api::{HotTakeApi, Post};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::comments::CommentThread;
use crate::config::FeedConfig;
use crate::coordinator::{FeedNavigator, VoteCoordinator, VoteOutcome};
use crate::vote::{VoteDirection, VoteState};

const SHARE_BASE_URL: &str = "https://hottake.gg/post";

pub struct PostCard {
    post: Post,
    votes: VoteCoordinator,
    comments: CommentThread,
    lifetime: CancellationToken,
}

impl PostCard {
    pub fn new(
        post: Post,
        api: Arc<dyn HotTakeApi>,
        navigator: Arc<dyn FeedNavigator>,
        config: &FeedConfig,
    ) -> Self {
        let lifetime = CancellationToken::new();

        let votes = VoteCoordinator::new(
            &post,
            config.voter_id.clone(),
            Arc::clone(&api),
            navigator,
            lifetime.clone(),
        )
        .with_advance_delay(config.advance_delay)
        .with_failure_policy(config.failure_policy.clone());

        let comments = CommentThread::new(post.id.clone(), api, lifetime.clone());

        Self {
            post,
            votes,
            comments,
            lifetime,
        }
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn votes(&self) -> &VoteCoordinator {
        &self.votes
    }

    pub fn vote_state(&self) -> VoteState {
        self.votes.state()
    }

    pub fn comments(&self) -> &CommentThread {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut CommentThread {
        &mut self.comments
    }

    /// Token that ends with the card; clone it to unmount from elsewhere
    pub fn lifetime(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    /// Vote from the card's buttons. Failures are logged and otherwise
    /// silent; the card keeps whatever state the failure policy left.
    pub async fn press(&self, direction: VoteDirection) -> Option<VoteOutcome> {
        match self.votes.cast_vote(direction).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(post_id = %self.post.id, %direction, error = %e, "Failed to {}", direction);
                None
            }
        }
    }

    /// Total votes, shown next to the flame once the voter has voted
    pub fn heat(&self) -> Option<usize> {
        self.votes.state().heat()
    }

    pub fn share_message(&self) -> String {
        share_message(&self.post)
    }

    pub fn report(&self) {
        info!(post_id = %self.post.id, "Reported post");
    }

    pub fn unmount(self) {
        self.lifetime.cancel();
    }
}

impl Drop for PostCard {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

pub fn share_message(post: &Post) -> String {
    format!(
        "Check out this hottake: {}\n{}/{}",
        post.title, SHARE_BASE_URL, post.id
    )
}
