//! Per-(post, user) reaction state machine.
//!
//! A user's standing toward a post is one of three states: neutral, liked,
//! or disliked. Toggling a reaction flips between that reaction and neutral;
//! toggling the opposite reaction replaces the current one. Modeling this as
//! a single enum (rather than two independent membership sets) makes the
//! like/dislike mutual exclusion structural: no state can encode both.

/// Which toggle operation a request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    /// Stable storage representation, used in the `post_reactions.reaction`
    /// column and as a metrics label.
    pub fn as_str(self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
        }
    }
}

/// A user's current reaction standing on one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactionState {
    #[default]
    Neutral,
    Liked,
    Disliked,
}

impl ReactionState {
    /// Apply one toggle operation and return the next state.
    ///
    /// Toggling the reaction you already hold removes it; toggling the
    /// opposite reaction replaces it in a single step. Applying the same
    /// toggle twice always returns to the starting state.
    pub fn toggle(self, kind: ReactionKind) -> ReactionState {
        match (self, kind) {
            (ReactionState::Liked, ReactionKind::Like) => ReactionState::Neutral,
            (_, ReactionKind::Like) => ReactionState::Liked,
            (ReactionState::Disliked, ReactionKind::Dislike) => ReactionState::Neutral,
            (_, ReactionKind::Dislike) => ReactionState::Disliked,
        }
    }

    pub fn has_liked(self) -> bool {
        self == ReactionState::Liked
    }

    pub fn has_disliked(self) -> bool {
        self == ReactionState::Disliked
    }

    /// Decode the state from the stored reaction column, where absence of a
    /// row means neutral. Unknown values decode as neutral rather than
    /// failing; the CHECK constraint prevents them from being written.
    pub fn from_stored(value: Option<&str>) -> ReactionState {
        match value {
            Some("like") => ReactionState::Liked,
            Some("dislike") => ReactionState::Disliked,
            _ => ReactionState::Neutral,
        }
    }

    /// Encode the state for storage. `None` means the reaction row should
    /// not exist.
    pub fn as_stored(self) -> Option<&'static str> {
        match self {
            ReactionState::Neutral => None,
            ReactionState::Liked => Some("like"),
            ReactionState::Disliked => Some("dislike"),
        }
    }
}
