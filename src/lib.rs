//! Palimpseste excerpt bot.
//!
//! Discovers public-domain texts on Wikisource, reduces a page to plain
//! narrative text, picks an excerpt that fits a short-form post and hands the
//! formatted post to a publisher.

pub mod bot;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod publisher;
pub mod sources;
