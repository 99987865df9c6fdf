//! Wire types for the HotTake API

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Longest title accepted when composing a post
pub const MAX_TITLE_CHARS: usize = 140;

/// A single hot take with the voters on each side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Voter UUIDs that agreed
    #[serde(default, deserialize_with = "nullable_list")]
    pub agree: Vec<String>,
    /// Voter UUIDs that disagreed
    #[serde(default, deserialize_with = "nullable_list")]
    pub disagree: Vec<String>,
}

impl Post {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            agree: Vec::new(),
            disagree: Vec::new(),
        }
    }

    pub fn with_votes(mut self, agree: &[&str], disagree: &[&str]) -> Self {
        self.agree = agree.iter().map(|s| s.to_string()).collect();
        self.disagree = disagree.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// A comment attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub content: String,
    /// Server timestamp, kept as sent
    #[serde(default)]
    pub date: String,
    /// `"true"` when written by a developer account
    #[serde(default = "default_dev")]
    pub dev: String,
}

impl Comment {
    pub fn is_dev(&self) -> bool {
        self.dev == "true"
    }

    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date).ok()
    }
}

fn default_dev() -> String {
    "false".to_string()
}

/// Body of `POST /api/agree` and `POST /api/disagree`
#[derive(Debug, Clone, Serialize)]
pub struct VoteRequest<'a> {
    #[serde(rename = "postID")]
    pub post_id: &'a str,
    #[serde(rename = "userUUID")]
    pub user_uuid: &'a str,
}

/// Body of `POST /api/post`
#[derive(Debug, Clone, Serialize)]
pub struct NewPost<'a> {
    pub title: &'a str,
}

/// Body of `POST /api/comment`
#[derive(Debug, Clone, Serialize)]
pub struct NewComment<'a> {
    #[serde(rename = "postID")]
    pub post_id: &'a str,
    pub content: &'a str,
}

/// Server error payload; only `message` is read
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_missing_vote_sets_default_to_empty() {
        let post: Post = serde_json::from_value(json!({
            "id": "p1",
            "title": "Pineapple belongs on pizza",
            "agree": null,
            "date": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(post.id, "p1");
        assert!(post.agree.is_empty());
        assert!(post.disagree.is_empty());
    }

    #[test]
    fn test_numeric_ids_are_accepted() {
        let comment: Comment = serde_json::from_value(json!({
            "id": 42,
            "content": "hot"
        }))
        .unwrap();

        assert_eq!(comment.id, "42");
        assert_eq!(comment.dev, "false");
        assert!(!comment.is_dev());
    }

    #[test]
    fn test_request_bodies_use_api_field_names() {
        let vote = serde_json::to_value(VoteRequest {
            post_id: "p1",
            user_uuid: "u1",
        })
        .unwrap();
        assert_eq!(vote, json!({"postID": "p1", "userUUID": "u1"}));

        let comment = serde_json::to_value(NewComment {
            post_id: "p1",
            content: "agreed",
        })
        .unwrap();
        assert_eq!(comment, json!({"postID": "p1", "content": "agreed"}));
    }

    #[test]
    fn test_comment_timestamp() {
        let comment = Comment {
            id: "c1".into(),
            content: "x".into(),
            date: "2025-03-04T15:07:00+00:00".into(),
            dev: "true".into(),
        };
        assert!(comment.is_dev());
        assert!(comment.timestamp().is_some());

        let undated = Comment {
            date: String::new(),
            ..comment
        };
        assert!(undated.timestamp().is_none());
    }
}
