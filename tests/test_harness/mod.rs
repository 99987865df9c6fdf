//! Test Harness Module
//!
//! Stands up a wiremock server playing the HotTake API and wires a real
//! `HotTakeClient` and `FeedSession` against it. Timers are shortened so
//! the vote flash and advance fire within a test's lifetime.

use std::sync::Arc;
use std::time::Duration;

use hottake::feed_core::{FeedConfig, FeedSession};
use hottake::hottake_api::{ApiConfig, HotTakeApi, HotTakeClient};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const VOTER: &str = "u1";
pub const FLASH: Duration = Duration::from_millis(40);
pub const ADVANCE: Duration = Duration::from_millis(80);

/// Test Environment
pub struct TestEnvironment {
    pub server: MockServer,
    pub api: Arc<dyn HotTakeApi>,
    pub config: FeedConfig,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let api_config = ApiConfig::new(&server.uri())
            .expect("mock server uri is valid")
            .with_request_timeout(Duration::from_secs(2));

        let mut config = FeedConfig::new(VOTER);
        config.flash_duration = FLASH;
        config.advance_delay = ADVANCE;

        Self {
            server,
            api: Arc::new(HotTakeClient::new(api_config)),
            config,
        }
    }

    pub fn feed(&self) -> FeedSession {
        FeedSession::new(Arc::clone(&self.api), self.config.clone())
    }

    /// Serve `posts` for `GET /api/posts?sort=<sort>`
    pub async fn mount_posts(&self, sort: &str, posts: Value) {
        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .and(query_param("sort", sort))
            .respond_with(ResponseTemplate::new(200).set_body_json(posts))
            .mount(&self.server)
            .await;
    }

    /// Answer a vote by `VOTER` on `post_id` with `status` and `body`
    pub async fn mount_vote(&self, endpoint: &str, post_id: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/api/{}", endpoint)))
            .and(body_json(json!({"postID": post_id, "userUUID": VOTER})))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Let the flash and advance timers run out
    pub async fn wait_for_cues(&self) {
        tokio::time::sleep(ADVANCE + Duration::from_millis(60)).await;
    }
}

pub fn post_json(id: &str, title: &str, agree: &[&str], disagree: &[&str]) -> Value {
    json!({"id": id, "title": title, "agree": agree, "disagree": disagree})
}
