//! States of the discovery loop.
//!
//! Every candidate ends as [`CandidateOutcome`] and every attempt as
//! [`AttemptOutcome`]; the runner matches on them to continue or stop. Only
//! [`BotError`] leaves the runner.

use thiserror::Error;

use crate::extractor::{Discard, Excerpt};
use crate::extractor::title::TitleVerdict;
use crate::fetcher::FetchError;
use crate::publisher::PublishError;

#[derive(Debug)]
pub enum CandidateOutcome {
    Accepted(Excerpt),
    Rejected(RejectReason),
}

#[derive(Debug, Error)]
pub enum RejectReason {
    #[error("title screened out ({0:?})")]
    Title(TitleVerdict),
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Discard(#[from] Discard),
}

#[derive(Debug)]
pub enum AttemptOutcome {
    Accepted(Excerpt),
    Failed(AttemptFailure),
}

#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("listing failed: {0}")]
    Listing(FetchError),
    #[error("listing returned no candidates")]
    EmptyListing,
    #[error("all {tried} candidates rejected")]
    AllRejected { tried: usize },
}

/// Terminal failures of a run.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("no publishable excerpt after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
    #[error("page '{title}' rejected: {reason}")]
    PageRejected { title: String, reason: RejectReason },
    #[error("no source site for language '{0}'")]
    UnknownLang(String),
}
