pub mod reactions;

pub use reactions::ReactionLedger;
