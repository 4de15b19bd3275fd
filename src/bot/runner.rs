use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{Instrument, Level, debug, info, info_span, instrument, warn};

use crate::bot::outcome::{AttemptFailure, AttemptOutcome, BotError, CandidateOutcome, RejectReason};
use crate::extractor::title::{TitleVerdict, classify_title};
use crate::extractor::{Excerpt, extract_excerpt, extract_text, is_content_title, looks_like_summary};
use crate::fetcher::types::MAIN_NAMESPACE;
use crate::fetcher::{FetchError, PageSource, ParsedPage};
use crate::publisher::{PostFormat, PublishReceipt, Publisher, format_post};
use crate::sources::{QueryStrategy, SourceSite, SourceTable};

/// How many table-of-contents levels a candidate may descend through.
pub const MAX_SUMMARY_DEPTH: usize = 3;

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct Published {
    pub excerpt: Excerpt,
    pub post: String,
    pub receipt: PublishReceipt,
}

/// Drives source pick → listing → per-candidate gates until one excerpt
/// survives or the attempt budget runs out.
pub struct Runner<S> {
    source: S,
    sites: SourceTable,
    max_attempts: u32,
}

impl<S: PageSource> Runner<S> {
    pub fn new(source: S, sites: SourceTable, max_attempts: u32) -> Self {
        Self {
            source,
            sites,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Discover, then publish.
    pub async fn run<P, R>(
        &self,
        publisher: &P,
        format: &PostFormat,
        rng: &mut R,
    ) -> Result<Published, BotError>
    where
        P: Publisher + ?Sized,
        R: Rng + ?Sized,
    {
        let excerpt = self.find_excerpt(rng).await?;
        publish_excerpt(publisher, format, excerpt).await
    }

    pub async fn find_excerpt<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Excerpt, BotError> {
        for attempt in 1..=self.max_attempts {
            let site = self.sites.pick(rng);
            let strategy = site.pick_query(rng);
            let span = info_span!("attempt", attempt, lang = %site.lang);

            match self.attempt(site, &strategy, rng).instrument(span).await {
                AttemptOutcome::Accepted(excerpt) => {
                    info!(
                        "Attempt {} accepted '{}' ({}, {} chars)",
                        attempt,
                        excerpt.title,
                        excerpt.lang,
                        excerpt.text.chars().count()
                    );
                    return Ok(excerpt);
                }
                AttemptOutcome::Failed(failure) => {
                    warn!("Attempt {}/{} failed: {}", attempt, self.max_attempts, failure);
                }
            }
        }

        Err(BotError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    /// Evaluate one named page of the site configured for `lang`.
    pub async fn run_title<R: Rng + ?Sized>(
        &self,
        lang: &str,
        title: &str,
        rng: &mut R,
    ) -> Result<Excerpt, BotError> {
        let site = self
            .sites
            .find(lang)
            .ok_or_else(|| BotError::UnknownLang(lang.to_string()))?;

        match self.evaluate(site, title, rng).await {
            CandidateOutcome::Accepted(excerpt) => Ok(excerpt),
            CandidateOutcome::Rejected(reason) => Err(BotError::PageRejected {
                title: title.to_string(),
                reason,
            }),
        }
    }

    async fn attempt<R: Rng + ?Sized>(
        &self,
        site: &SourceSite,
        strategy: &QueryStrategy,
        rng: &mut R,
    ) -> AttemptOutcome {
        let mut candidates = match self.source.list(site, strategy).await {
            Ok(candidates) => candidates,
            Err(e) => return AttemptOutcome::Failed(AttemptFailure::Listing(e)),
        };
        if candidates.is_empty() {
            return AttemptOutcome::Failed(AttemptFailure::EmptyListing);
        }

        candidates.shuffle(rng);
        let mut tried = 0;
        for candidate in candidates {
            if candidate.ns != MAIN_NAMESPACE {
                debug!("Skipping '{}': namespace {}", candidate.title, candidate.ns);
                continue;
            }
            tried += 1;
            match self.evaluate(site, &candidate.title, rng).await {
                CandidateOutcome::Accepted(excerpt) => return AttemptOutcome::Accepted(excerpt),
                CandidateOutcome::Rejected(reason) => log_rejection(&candidate.title, &reason),
            }
        }

        AttemptOutcome::Failed(AttemptFailure::AllRejected { tried })
    }

    /// Run one title through every gate. Tables of contents are followed into a
    /// random sub-page, at most [`MAX_SUMMARY_DEPTH`] levels down.
    #[instrument(skip_all, fields(lang = %site.lang, title = %title))]
    pub async fn evaluate<R: Rng + ?Sized>(
        &self,
        site: &SourceSite,
        title: &str,
        rng: &mut R,
    ) -> CandidateOutcome {
        let verdict = classify_title(title);
        if verdict != TitleVerdict::Content {
            return CandidateOutcome::Rejected(RejectReason::Title(verdict));
        }

        let mut page = match self.fetch(site, title).await {
            Ok(page) => page,
            Err(e) => return CandidateOutcome::Rejected(e.into()),
        };
        let mut text = extract_text(&page.html);

        for depth in 1..=MAX_SUMMARY_DEPTH {
            if !looks_like_summary(&page, &text) {
                break;
            }
            let subpages: Vec<String> = page
                .subpage_links()
                .filter(|link| link.exists && is_content_title(&link.title))
                .map(|link| link.title.clone())
                .collect();
            let Some(next) = subpages.choose(rng) else {
                break;
            };

            debug!(
                "'{}' reads as a table of contents, descending into '{}' (depth {})",
                page.title, next, depth
            );
            page = match self.fetch(site, next).await {
                Ok(page) => page,
                Err(e) => return CandidateOutcome::Rejected(e.into()),
            };
            text = extract_text(&page.html);
        }

        match extract_excerpt(site, &page, &text, rng) {
            Ok(excerpt) => CandidateOutcome::Accepted(excerpt),
            Err(discard) => CandidateOutcome::Rejected(discard.into()),
        }
    }

    async fn fetch(&self, site: &SourceSite, title: &str) -> Result<ParsedPage, FetchError> {
        self.source.parse(site, title).await
    }
}

/// Format `excerpt` and hand the post to `publisher`.
pub async fn publish_excerpt<P: Publisher + ?Sized>(
    publisher: &P,
    format: &PostFormat,
    excerpt: Excerpt,
) -> Result<Published, BotError> {
    let post = format_post(&excerpt, format);
    info!(
        "Publishing post ({} chars) from {} fetched at {}",
        post.chars().count(),
        excerpt.source_url,
        excerpt.fetched_at.to_rfc3339()
    );

    let receipt = publisher.publish(&post).await?;
    Ok(Published {
        excerpt,
        post,
        receipt,
    })
}

/// Transient fetch failures are worth a warning; refusals the API will
/// repeat and content rejections are routine.
fn rejection_level(reason: &RejectReason) -> Level {
    match reason {
        RejectReason::Fetch(e) if e.is_transient() => Level::WARN,
        _ => Level::DEBUG,
    }
}

fn log_rejection(title: &str, reason: &RejectReason) {
    let transient = rejection_level(reason) == Level::WARN;
    match reason {
        RejectReason::Fetch(e) if transient => warn!("Failed to fetch '{}': {}", title, e),
        RejectReason::Fetch(e) => debug!("Cannot fetch '{}': {}", title, e),
        other => debug!("Rejected '{}': {}", title, other),
    }
}
