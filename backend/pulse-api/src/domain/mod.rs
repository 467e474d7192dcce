pub mod reaction;

pub use reaction::{ReactionKind, ReactionState};
