//! In-memory HotTake API and feed navigator for tests
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use feed_core::{FeedNavigator, FlashColor};
use hottake_api::{ApiError, Comment, HotTakeApi, Post, Result};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Behaves like the real server: votes toggle server-side sets and the
/// updated post is returned. Failures and stalls can be queued.
#[derive(Default)]
pub struct FakeHotTake {
    posts: Mutex<Vec<Post>>,
    comments: Mutex<HashMap<String, Vec<Comment>>>,
    vote_failures: Mutex<VecDeque<u16>>,
    comment_failures: Mutex<VecDeque<u16>>,
    fetch_failures: Mutex<VecDeque<u16>>,
    vote_gate: Mutex<Option<Arc<Notify>>>,
    comment_gate: Mutex<Option<Arc<Notify>>>,
    fetch_gate: Mutex<Option<Arc<Notify>>>,
    pub vote_calls: AtomicUsize,
    pub fetch_calls: Mutex<Vec<(String, u32, u32)>>,
    next_comment_id: AtomicUsize,
}

impl FakeHotTake {
    pub fn new(posts: Vec<Post>) -> Arc<Self> {
        Arc::new(Self {
            posts: Mutex::new(posts),
            ..Default::default()
        })
    }

    pub fn with_comments(self: Arc<Self>, post_id: &str, comments: Vec<Comment>) -> Arc<Self> {
        self.comments.lock().insert(post_id.to_string(), comments);
        self
    }

    pub fn server_post(&self, post_id: &str) -> Post {
        self.posts
            .lock()
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
            .expect("post exists on fake server")
    }

    /// Overwrite the server's copy, e.g. to simulate other voters
    pub fn set_server_post(&self, post: Post) {
        let mut posts = self.posts.lock();
        if let Some(existing) = posts.iter_mut().find(|p| p.id == post.id) {
            *existing = post;
        }
    }

    /// Next `n` vote calls fail with `status`
    pub fn fail_votes(&self, n: usize, status: u16) {
        let mut failures = self.vote_failures.lock();
        for _ in 0..n {
            failures.push_back(status);
        }
    }

    pub fn fail_next_fetch(&self, status: u16) {
        self.fetch_failures.lock().push_back(status);
    }

    pub fn fail_next_comment(&self, status: u16) {
        self.comment_failures.lock().push_back(status);
    }

    /// Vote calls block until the returned handle is notified
    pub fn hold_votes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.vote_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// The next `fetch_posts` call blocks until the handle is notified
    pub fn hold_next_fetch(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.fetch_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn hold_comments(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.comment_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fetches(&self) -> Vec<(String, u32, u32)> {
        self.fetch_calls.lock().clone()
    }

    pub fn vote_calls(&self) -> usize {
        self.vote_calls.load(Ordering::SeqCst)
    }

    async fn vote(&self, operation: &str, post_id: &str, voter: &str, agree: bool) -> Result<Post> {
        self.vote_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.vote_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(status) = self.vote_failures.lock().pop_front() {
            return Err(ApiError::Rejected {
                status,
                message: format!("{} failed: {}", operation, status),
            });
        }

        let mut posts = self.posts.lock();
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| ApiError::Rejected {
                status: 404,
                message: "Post not found".to_string(),
            })?;

        let (this, other) = if agree {
            (&mut post.agree, &mut post.disagree)
        } else {
            (&mut post.disagree, &mut post.agree)
        };
        if this.iter().any(|v| v == voter) {
            this.retain(|v| v != voter);
        } else {
            this.push(voter.to_string());
            other.retain(|v| v != voter);
        }

        Ok(post.clone())
    }
}

#[async_trait]
impl HotTakeApi for FakeHotTake {
    async fn fetch_posts(&self, sort: &str, offset: u32, limit: u32) -> Result<Vec<Post>> {
        self.fetch_calls
            .lock()
            .push((sort.to_string(), offset, limit));

        let gate = self.fetch_gate.lock().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(status) = self.fetch_failures.lock().pop_front() {
            return Err(ApiError::Rejected {
                status,
                message: format!("fetch posts failed: {}", status),
            });
        }

        let posts = self.posts.lock();
        Ok(posts
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn fetch_post(&self, post_id: &str) -> Result<Post> {
        Ok(self.server_post(post_id))
    }

    async fn create_post(&self, title: &str) -> Result<Post> {
        let post = Post::new(format!("p{}", self.posts.lock().len() + 1), title);
        self.posts.lock().insert(0, post.clone());
        Ok(post)
    }

    async fn agree(&self, post_id: &str, user_uuid: &str) -> Result<Post> {
        self.vote("agree", post_id, user_uuid, true).await
    }

    async fn disagree(&self, post_id: &str, user_uuid: &str) -> Result<Post> {
        self.vote("disagree", post_id, user_uuid, false).await
    }

    async fn fetch_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let gate = self.comment_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        Ok(self
            .comments
            .lock()
            .get(post_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment> {
        if let Some(status) = self.comment_failures.lock().pop_front() {
            return Err(ApiError::Rejected {
                status,
                message: format!("add comment failed: {}", status),
            });
        }

        let id = self.next_comment_id.fetch_add(1, Ordering::SeqCst) + 1;
        let comment = Comment {
            id: format!("c{}", id),
            content: content.to_string(),
            date: "2025-06-01T12:00:00Z".to_string(),
            dev: "false".to_string(),
        };
        self.comments
            .lock()
            .entry(post_id.to_string())
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }
}

/// Records what a card asked the feed to do
#[derive(Default)]
pub struct RecordingNavigator {
    flashes: Mutex<Vec<FlashColor>>,
    advances: AtomicUsize,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn flashes(&self) -> Vec<FlashColor> {
        self.flashes.lock().clone()
    }

    pub fn advances(&self) -> usize {
        self.advances.load(Ordering::SeqCst)
    }
}

impl FeedNavigator for RecordingNavigator {
    fn flash(&self, color: FlashColor) {
        self.flashes.lock().push(color);
    }

    fn advance(&self) {
        self.advances.fetch_add(1, Ordering::SeqCst);
    }
}

/// `count` unvoted posts with ids `p0..`
pub fn numbered_posts(count: usize) -> Vec<Post> {
    (0..count).map(|i| post(&format!("p{}", i), &[], &[])).collect()
}

pub fn post(id: &str, agree: &[&str], disagree: &[&str]) -> Post {
    Post::new(id, format!("Take number {}", id)).with_votes(agree, disagree)
}
