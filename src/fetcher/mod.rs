pub mod client;
pub mod errors;
pub mod types;

pub use client::{PageSource, WikiClient};
pub use errors::FetchError;
pub use types::{CandidatePage, PageLink, ParsedPage};
