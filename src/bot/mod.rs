pub mod outcome;
pub mod runner;

pub use outcome::{AttemptFailure, AttemptOutcome, BotError, CandidateOutcome, RejectReason};
pub use runner::{MAX_SUMMARY_DEPTH, Published, Runner, publish_excerpt};
