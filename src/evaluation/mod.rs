//! Evaluation
//!
//! Multi-reviewer evaluation: reviewer discovery, the per-reviewer sequencer
//! and the harvested results.

mod results;
mod reviewer;
mod sequencer;

pub use results::Results;
pub use reviewer::{discover_reviewers, reviewer_ordinal, Reviewer};
pub use sequencer::{EvaluationSequencer, SequencerOutcome, SequencerState};
