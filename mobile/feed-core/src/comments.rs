//! Comment thread for one card

use std::sync::Arc;

use hottake_api::{ApiError, Comment, HotTakeApi};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("Card unmounted before the comment request completed")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Comments in arrival order plus the unsent draft
pub struct CommentThread {
    post_id: String,
    api: Arc<dyn HotTakeApi>,
    lifetime: CancellationToken,
    comments: Vec<Comment>,
    draft: String,
    loading: bool,
}

impl CommentThread {
    pub fn new(post_id: String, api: Arc<dyn HotTakeApi>, lifetime: CancellationToken) -> Self {
        Self {
            post_id,
            api,
            lifetime,
            comments: Vec::new(),
            draft: String::new(),
            loading: false,
        }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn count_label(&self) -> String {
        if self.comments.is_empty() {
            "No comments yet".to_string()
        } else {
            format!("Comments ({})", self.comments.len())
        }
    }

    /// Fetch the thread. The result is dropped if the card unmounts first;
    /// on failure the current list is kept.
    pub async fn load(&mut self) -> Result<usize, CommentError> {
        self.loading = true;

        let result = tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => {
                debug!(post_id = %self.post_id, "Card unmounted, comment load discarded");
                return Err(CommentError::Cancelled);
            }
            result = self.api.fetch_comments(&self.post_id) => result,
        };

        self.loading = false;

        match result {
            Ok(comments) => {
                self.comments = comments;
                Ok(self.comments.len())
            }
            Err(e) => {
                error!(post_id = %self.post_id, error = %e, "Failed to load comments");
                Err(e.into())
            }
        }
    }

    /// Send the trimmed draft. A blank draft is a no-op. On success the
    /// server's comment is appended and the draft cleared; on failure both
    /// the list and the draft stay as they were.
    pub async fn submit(&mut self) -> Result<Option<Comment>, CommentError> {
        let content = self.draft.trim().to_string();
        if content.is_empty() {
            return Ok(None);
        }

        let result = tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => return Err(CommentError::Cancelled),
            result = self.api.add_comment(&self.post_id, &content) => result,
        };

        match result {
            Ok(comment) => {
                debug!(post_id = %self.post_id, comment_id = %comment.id, "Comment added");
                self.comments.push(comment.clone());
                self.draft.clear();
                Ok(Some(comment))
            }
            Err(e) => {
                error!(post_id = %self.post_id, error = %e, "Failed to add comment");
                Err(e.into())
            }
        }
    }
}
