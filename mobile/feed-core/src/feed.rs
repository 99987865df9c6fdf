//! Feed session: the list of posts behind the swipeable feed
//!
//! Holds the sort order, the loaded page(s) of posts, which card is on
//! screen, and the flash overlay. Cards mounted from the session get a
//! navigator bound to their index, so a vote on card `i` flashes this feed
//! and advances it to `i + 1`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hottake_api::{ApiError, HotTakeApi, Post};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::card::PostCard;
use crate::config::FeedConfig;
use crate::coordinator::FeedNavigator;
use crate::vote::FlashColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOption {
    #[default]
    Hot,
    New,
    Old,
    Popular,
    Random,
    Agreed,
    Disagreed,
    Reported,
}

impl SortOption {
    /// Cycle order of the sort button
    pub const ALL: [SortOption; 8] = [
        SortOption::Hot,
        SortOption::New,
        SortOption::Old,
        SortOption::Popular,
        SortOption::Random,
        SortOption::Agreed,
        SortOption::Disagreed,
        SortOption::Reported,
    ];

    /// Query value sent to `/api/posts`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::New => "new",
            Self::Old => "old",
            Self::Popular => "popular",
            Self::Random => "random",
            Self::Agreed => "agreed",
            Self::Disagreed => "disagreed",
            Self::Reported => "reported",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hot => "Sort by Hot",
            Self::New => "Sort by New",
            Self::Old => "Sort by Old",
            Self::Popular => "Sort by Popular",
            Self::Random => "Sort by Random",
            Self::Agreed => "Sort by Agreed",
            Self::Disagreed => "Sort by Disagreed",
            Self::Reported => "Sort by Reported",
        }
    }

    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transient vote-color overlay that clears itself
#[derive(Clone)]
pub struct FlashCue {
    state: Arc<Mutex<FlashState>>,
    duration: Duration,
}

#[derive(Default)]
struct FlashState {
    color: Option<FlashColor>,
    generation: u64,
}

impl FlashCue {
    pub fn new(duration: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(FlashState::default())),
            duration,
        }
    }

    pub fn current(&self) -> Option<FlashColor> {
        self.state.lock().color
    }

    /// Show `color` and clear it after the flash duration. A later trigger
    /// restarts the countdown; an older timer never clears a newer flash.
    pub fn trigger(&self, color: FlashColor) {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.color = Some(color);
            state.generation
        };

        let state = Arc::clone(&self.state);
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut state = state.lock();
            if state.generation == generation {
                state.color = None;
            }
        });
    }
}

struct FeedState {
    sort: SortOption,
    posts: Vec<Post>,
    current_index: usize,
    error: Option<String>,
    loading: bool,
    /// Bumped per load; only the latest load may apply its result
    load_generation: u64,
    /// Bumped whenever `posts` is replaced; cards from an older list go quiet
    view: u64,
}

impl FeedState {
    fn scroll_next(&mut self, from_index: usize) -> bool {
        let next = from_index + 1;
        if next < self.posts.len() {
            self.current_index = next;
            debug!(index = next, "Feed advanced");
            true
        } else {
            debug!(from_index, "Already at the last card");
            false
        }
    }
}

struct Shared {
    api: Arc<dyn HotTakeApi>,
    config: FeedConfig,
    state: Mutex<FeedState>,
    flash: FlashCue,
}

#[derive(Clone)]
pub struct FeedSession {
    shared: Arc<Shared>,
}

impl FeedSession {
    pub fn new(api: Arc<dyn HotTakeApi>, config: FeedConfig) -> Self {
        let flash = FlashCue::new(config.flash_duration);
        Self {
            shared: Arc::new(Shared {
                api,
                state: Mutex::new(FeedState {
                    sort: config.default_sort,
                    posts: Vec::new(),
                    current_index: 0,
                    error: None,
                    loading: false,
                    load_generation: 0,
                    view: 0,
                }),
                config,
                flash,
            }),
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.shared.config
    }

    pub fn sort(&self) -> SortOption {
        self.shared.state.lock().sort
    }

    pub fn posts(&self) -> Vec<Post> {
        self.shared.state.lock().posts.clone()
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current_index(&self) -> usize {
        self.shared.state.lock().current_index
    }

    pub fn current_post(&self) -> Option<Post> {
        let state = self.shared.state.lock();
        state.posts.get(state.current_index).cloned()
    }

    /// Message of the last failed load, shown inline in place of the feed
    pub fn error(&self) -> Option<String> {
        self.shared.state.lock().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.lock().loading
    }

    pub fn flash(&self) -> Option<FlashColor> {
        self.shared.flash.current()
    }

    /// Replace the feed with the first page for `sort`
    pub async fn load(&self, sort: SortOption) -> Result<usize, ApiError> {
        let generation = {
            let mut state = self.shared.state.lock();
            state.sort = sort;
            state.loading = true;
            state.load_generation += 1;
            state.load_generation
        };

        let result = self
            .shared
            .api
            .fetch_posts(sort.as_str(), 0, self.shared.config.page_size)
            .await;

        let mut state = self.shared.state.lock();
        if state.load_generation != generation {
            debug!(%sort, "Superseded feed load discarded");
            return result.map(|posts| posts.len());
        }
        state.loading = false;

        match result {
            Ok(posts) => {
                info!(%sort, count = posts.len(), "Feed loaded");
                let count = posts.len();
                state.posts = posts;
                state.view += 1;
                state.current_index = 0;
                state.error = None;
                Ok(count)
            }
            Err(e) => {
                error!(%sort, error = %e, "Failed to load feed");
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Append the next page for the current sort. Skipped while another
    /// load or page request is pending.
    pub async fn load_more(&self) -> Result<usize, ApiError> {
        let (sort, offset, generation) = {
            let mut state = self.shared.state.lock();
            if state.loading {
                debug!(sort = %state.sort, "Feed request pending, next page skipped");
                return Ok(0);
            }
            state.loading = true;
            (state.sort, state.posts.len(), state.load_generation)
        };

        let result = self
            .shared
            .api
            .fetch_posts(sort.as_str(), offset as u32, self.shared.config.page_size)
            .await;

        let mut state = self.shared.state.lock();
        if state.load_generation != generation {
            debug!(%sort, "Feed reloaded while paging, page discarded");
            return result.map(|_| 0);
        }
        state.loading = false;

        if state.posts.len() != offset {
            debug!(%sort, offset, len = state.posts.len(), "Feed changed while paging, page discarded");
            return result.map(|_| 0);
        }

        match result {
            Ok(posts) => {
                let count = posts.len();
                debug!(%sort, offset, count, "Loaded next page");
                state.posts.extend(posts);
                state.error = None;
                Ok(count)
            }
            Err(e) => {
                error!(%sort, offset, error = %e, "Failed to load next page");
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn reload(&self) -> Result<usize, ApiError> {
        self.load(self.sort()).await
    }

    /// Switch to the next sort option and reload
    pub async fn cycle_sort(&self) -> Result<usize, ApiError> {
        let next = self.sort().next();
        self.load(next).await
    }

    /// Show the newest posts so the author sees what they just wrote
    pub async fn post_created(&self, post: &Post) -> Result<usize, ApiError> {
        info!(post_id = %post.id, "Post created, switching feed to new");
        self.load(SortOption::New).await
    }

    /// Record the card the list reports as visible
    pub fn set_current_index(&self, index: usize) {
        let mut state = self.shared.state.lock();
        if index < state.posts.len() {
            state.current_index = index;
        }
    }

    /// Move past card `from_index` if there is a card after it
    pub fn scroll_next(&self, from_index: usize) -> bool {
        self.shared.state.lock().scroll_next(from_index)
    }

    /// Build the card for the post at `index`. The card only flashes and
    /// advances this feed while the list it came from is still shown.
    pub fn mount_card(&self, index: usize) -> Option<PostCard> {
        let (post, view) = {
            let state = self.shared.state.lock();
            (state.posts.get(index).cloned()?, state.view)
        };
        let navigator = Arc::new(CardNavigator {
            shared: Arc::clone(&self.shared),
            index,
            view,
        });

        Some(PostCard::new(
            post,
            Arc::clone(&self.shared.api),
            navigator,
            &self.shared.config,
        ))
    }
}

/// Navigator handed to a mounted card
struct CardNavigator {
    shared: Arc<Shared>,
    index: usize,
    view: u64,
}

impl FeedNavigator for CardNavigator {
    fn flash(&self, color: FlashColor) {
        if self.shared.state.lock().view != self.view {
            debug!(index = self.index, "Feed reloaded, flash dropped");
            return;
        }
        self.shared.flash.trigger(color);
    }

    fn advance(&self) {
        let mut state = self.shared.state.lock();
        if state.view != self.view {
            debug!(index = self.index, "Feed reloaded, advance dropped");
            return;
        }
        state.scroll_next(self.index);
    }
}
