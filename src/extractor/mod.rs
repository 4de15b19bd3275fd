pub mod author;
pub mod cleaner;
pub mod excerpt;
pub mod model;
pub mod reader;
pub mod reject;
pub mod rules;
pub mod title;

#[cfg(test)]
mod tests;

pub use author::resolve_author;
pub use cleaner::extract_text;
pub use excerpt::select_excerpt;
pub use model::{Excerpt, page_url};
pub use reject::{Rejection, evaluate};
pub use title::is_content_title;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

use crate::fetcher::ParsedPage;
use crate::sources::SourceSite;

/// Sub-page links a table of contents carries at minimum.
const SUMMARY_MIN_SUBPAGES: usize = 3;
/// Cleaned text below this length on a page with sub-pages reads as a summary.
const SUMMARY_MAX_CHARS: usize = 500;

/// Why a fetched page produced no excerpt.
#[derive(Debug, Error)]
pub enum Discard {
    #[error("quality gate: {0}")]
    Quality(#[from] Rejection),
    #[error("no paragraph long enough for an excerpt")]
    NoExcerpt,
    #[error("cannot build source url: {0}")]
    SourceUrl(#[from] url::ParseError),
}

/// Reduce a fetched page and its cleaned text to a publishable excerpt.
pub fn extract_excerpt<R: Rng + ?Sized>(
    site: &SourceSite,
    page: &ParsedPage,
    text: &str,
    rng: &mut R,
) -> Result<Excerpt, Discard> {
    evaluate(text, page)?;
    let excerpt = select_excerpt(text, rng).ok_or(Discard::NoExcerpt)?;

    Ok(Excerpt {
        text: excerpt,
        author: resolve_author(page),
        title: page.title.clone(),
        lang: site.lang.clone(),
        source_url: page_url(&site.base_url, &page.title)?,
        fetched_at: Utc::now(),
    })
}

/// A short page linking to several of its own sub-pages is a table of
/// contents; the text lives one level down.
pub fn looks_like_summary(page: &ParsedPage, text: &str) -> bool {
    page.subpage_links().count() >= SUMMARY_MIN_SUBPAGES
        && text.chars().count() < SUMMARY_MAX_CHARS
}
