//! Per-card vote state and its optimistic transitions

use std::fmt;

use hottake_api::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteDirection {
    Agree,
    Disagree,
}

impl VoteDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agree => "agree",
            Self::Disagree => "disagree",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::Agree => Self::Disagree,
            Self::Disagree => Self::Agree,
        }
    }

    pub fn flash_color(&self) -> FlashColor {
        match self {
            Self::Agree => FlashColor::Green,
            Self::Disagree => FlashColor::Red,
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color of the transient overlay shown after a vote lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashColor {
    Green,
    Red,
}

impl FlashColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
        }
    }
}

/// Local mirror of a post's voter sets.
///
/// The local voter is never in both sets at once. `has_voted` only ever
/// goes from false to true.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VoteState {
    pub agree: Vec<String>,
    pub disagree: Vec<String>,
    has_voted: bool,
}

impl VoteState {
    /// Seed from a fetched post. A voter already present on either side
    /// starts out as having voted.
    pub fn seed(post: &Post, voter_id: &str) -> Self {
        let mut state = Self {
            agree: post.agree.clone(),
            disagree: post.disagree.clone(),
            has_voted: false,
        };
        state.has_voted = state.position(voter_id) != (false, false);
        state
    }

    pub fn has_voted(&self) -> bool {
        self.has_voted
    }

    pub fn mark_voted(&mut self) {
        self.has_voted = true;
    }

    pub fn side(&self, direction: VoteDirection) -> &Vec<String> {
        match direction {
            VoteDirection::Agree => &self.agree,
            VoteDirection::Disagree => &self.disagree,
        }
    }

    fn side_mut(&mut self, direction: VoteDirection) -> &mut Vec<String> {
        match direction {
            VoteDirection::Agree => &mut self.agree,
            VoteDirection::Disagree => &mut self.disagree,
        }
    }

    pub fn contains(&self, direction: VoteDirection, voter_id: &str) -> bool {
        self.side(direction).iter().any(|v| v == voter_id)
    }

    /// (in agree, in disagree) for the given voter
    pub fn position(&self, voter_id: &str) -> (bool, bool) {
        (
            self.contains(VoteDirection::Agree, voter_id),
            self.contains(VoteDirection::Disagree, voter_id),
        )
    }

    /// Apply a vote locally before the server answers: toggle off when the
    /// voter is already on this side, otherwise move them onto it.
    pub fn apply_optimistic(&mut self, direction: VoteDirection, voter_id: &str) {
        self.has_voted = true;

        if self.contains(direction, voter_id) {
            self.side_mut(direction).retain(|v| v != voter_id);
        } else {
            self.side_mut(direction).push(voter_id.to_string());
            self.side_mut(direction.opposite()).retain(|v| v != voter_id);
        }
    }

    /// Replace both sides with the server's view
    pub fn reconcile(&mut self, post: &Post) {
        self.agree = post.agree.clone();
        self.disagree = post.disagree.clone();
        self.has_voted = true;
    }

    /// Put back the sets captured before an optimistic edit.
    /// `has_voted` is left untouched.
    pub fn restore_sets(&mut self, agree: Vec<String>, disagree: Vec<String>) {
        self.agree = agree;
        self.disagree = disagree;
    }

    pub fn agree_count(&self) -> usize {
        self.agree.len()
    }

    pub fn disagree_count(&self) -> usize {
        self.disagree.len()
    }

    /// Total votes on the post; only shown once the voter has voted
    pub fn heat(&self) -> Option<usize> {
        self.has_voted
            .then(|| self.agree.len() + self.disagree.len())
    }
}
