//! Composing a new post

use hottake_api::{ApiError, HotTakeApi, Post, MAX_TITLE_CHARS};
use tracing::info;

/// Validate and submit a new hot take
pub async fn compose_post(api: &dyn HotTakeApi, title: &str) -> Result<Post, ApiError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ApiError::validation("Post cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::validation(format!(
            "Post cannot be longer than {} characters",
            MAX_TITLE_CHARS
        )));
    }

    let post = api.create_post(title).await?;
    info!(post_id = %post.id, "Post created");
    Ok(post)
}
