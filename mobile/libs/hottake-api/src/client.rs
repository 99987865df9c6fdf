//! HTTP client for the HotTake API
//!
//! Thin request/response wrappers around the REST endpoints. No retries
//! happen here; callers decide whether a failure is worth another attempt
//! (see [`ApiError::is_retryable`]).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use resilience::with_timeout;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::models::{Comment, ErrorBody, NewComment, NewPost, Post, VoteRequest};

/// Operations the feed needs from the remote API
#[async_trait]
pub trait HotTakeApi: Send + Sync {
    /// `GET /api/posts`; `sort` is forwarded as-is
    async fn fetch_posts(&self, sort: &str, offset: u32, limit: u32) -> Result<Vec<Post>>;

    async fn fetch_post(&self, post_id: &str) -> Result<Post>;

    async fn create_post(&self, title: &str) -> Result<Post>;

    /// Returns the post with its authoritative vote sets
    async fn agree(&self, post_id: &str, user_uuid: &str) -> Result<Post>;

    /// Returns the post with its authoritative vote sets
    async fn disagree(&self, post_id: &str, user_uuid: &str) -> Result<Post>;

    async fn fetch_comments(&self, post_id: &str) -> Result<Vec<Comment>>;

    async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment>;
}

/// reqwest-backed [`HotTakeApi`]
#[derive(Clone)]
pub struct HotTakeClient {
    client: Client,
    config: ApiConfig,
}

impl HotTakeClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Send a request, decode the body on success and log any failure
    async fn execute<T>(&self, operation: &'static str, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(operation, "Calling HotTake API");

        let result = with_timeout(self.config.request_timeout.duration, Self::send(operation, request))
            .await
            .map_err(ApiError::from)
            .and_then(|inner| inner);

        if let Err(e) = &result {
            error!(operation, error = %e, "HotTake API call failed");
        }

        result
    }

    async fn send<T>(operation: &'static str, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            // Prefer the server's message, fall back to a generic one
            let fallback = format!("{} failed: {}", operation, status.as_u16());
            let message = match response.bytes().await {
                Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.message)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(fallback),
                Err(_) => fallback,
            };

            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            operation: operation.to_string(),
            reason: e.to_string(),
        })
    }
}

fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(message));
    }
    Ok(())
}

#[async_trait]
impl HotTakeApi for HotTakeClient {
    async fn fetch_posts(&self, sort: &str, offset: u32, limit: u32) -> Result<Vec<Post>> {
        let request = self
            .client
            .get(self.config.url("/api/posts"))
            .query(&[("sort", sort)])
            .query(&[("offset", offset), ("limit", limit)]);

        self.execute("fetch posts", request).await
    }

    async fn fetch_post(&self, post_id: &str) -> Result<Post> {
        require(post_id, "postID is required")?;

        let request = self
            .client
            .get(self.config.url("/api/post"))
            .query(&[("postID", post_id)]);

        self.execute("fetch post", request).await
    }

    async fn create_post(&self, title: &str) -> Result<Post> {
        require(title, "Post title is required")?;

        let request = self
            .client
            .post(self.config.url("/api/post"))
            .json(&NewPost {
                title: title.trim(),
            });

        self.execute("create post", request).await
    }

    async fn agree(&self, post_id: &str, user_uuid: &str) -> Result<Post> {
        require(post_id, "Missing postID or userUUID")?;
        require(user_uuid, "Missing postID or userUUID")?;

        let request = self
            .client
            .post(self.config.url("/api/agree"))
            .json(&VoteRequest { post_id, user_uuid });

        self.execute("agree", request).await
    }

    async fn disagree(&self, post_id: &str, user_uuid: &str) -> Result<Post> {
        require(post_id, "Missing postID or userUUID")?;
        require(user_uuid, "Missing postID or userUUID")?;

        let request = self
            .client
            .post(self.config.url("/api/disagree"))
            .json(&VoteRequest { post_id, user_uuid });

        self.execute("disagree", request).await
    }

    async fn fetch_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        require(post_id, "Missing postID")?;

        let request = self
            .client
            .get(self.config.url("/api/comment"))
            .query(&[("postID", post_id)]);

        self.execute("fetch comments", request).await
    }

    async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment> {
        require(post_id, "Missing postID or content")?;
        require(content, "Missing postID or content")?;

        let request = self
            .client
            .post(self.config.url("/api/comment"))
            .json(&NewComment { post_id, content });

        self.execute("add comment", request).await
    }
}
