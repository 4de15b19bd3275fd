//! Source sites and per-attempt selection.
//!
//! A [`SourceTable`] is loaded once at start-up and never mutated. Each attempt
//! draws one site proportionally to its weight, then one listing strategy.

use std::fs;
use std::path::Path;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Highest pagination offset drawn for a keyword search.
pub const MAX_SEARCH_OFFSET: u32 = 100;

/// One configured content origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSite {
    pub lang: String,
    pub base_url: String,
    pub search_terms: Vec<String>,
    pub weight: u32,
}

impl SourceSite {
    pub fn new(lang: &str, base_url: &str, search_terms: &[&str], weight: u32) -> Self {
        Self {
            lang: lang.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            search_terms: search_terms.iter().map(|t| t.to_string()).collect(),
            weight,
        }
    }

    /// MediaWiki API endpoint of this site.
    pub fn api_url(&self) -> String {
        format!("{}/w/api.php", self.base_url)
    }

    /// Draw a listing strategy: a fair coin between random pages and a keyword
    /// search with a random offset. Sites without terms always list randomly.
    pub fn pick_query<R: Rng + ?Sized>(&self, rng: &mut R) -> QueryStrategy {
        let use_search = rng.gen_bool(0.5);
        match self.search_terms.choose(rng) {
            Some(term) if use_search => QueryStrategy::Search {
                term: term.clone(),
                offset: rng.gen_range(0..=MAX_SEARCH_OFFSET),
            },
            _ => QueryStrategy::Random,
        }
    }
}

/// How candidate titles are listed for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStrategy {
    Random,
    Search { term: String, offset: u32 },
}

/// Immutable, validated set of source sites with their sampling distribution.
#[derive(Debug, Clone)]
pub struct SourceTable {
    sites: Vec<SourceSite>,
    index: WeightedIndex<u32>,
}

impl SourceTable {
    pub fn new(sites: Vec<SourceSite>) -> Result<Self, ConfigError> {
        if sites.is_empty() {
            return Err(ConfigError::InvalidSources("no source sites".to_string()));
        }
        if let Some(site) = sites.iter().find(|s| s.base_url.trim().is_empty()) {
            return Err(ConfigError::InvalidSources(format!(
                "site '{}' has an empty base url",
                site.lang
            )));
        }
        let index = WeightedIndex::new(sites.iter().map(|s| s.weight))
            .map_err(|e| ConfigError::InvalidSources(e.to_string()))?;
        Ok(Self { sites, index })
    }

    /// Load a JSON array of [`SourceSite`] objects.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Sources {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let sites: Vec<SourceSite> =
            serde_json::from_str(&raw).map_err(|e| ConfigError::Sources {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::new(
            sites
                .into_iter()
                .map(|mut s| {
                    s.base_url = s.base_url.trim_end_matches('/').to_string();
                    s
                })
                .collect(),
        )
    }

    /// Wikisource editions the bot reads from, French first.
    pub fn builtin() -> Result<Self, ConfigError> {
        let sites = vec![
            SourceSite::new(
                "fr",
                "https://fr.wikisource.org",
                &[
                    "sonnet", "élégie", "fable", "conte", "nouvelle", "ballade", "ode",
                    "lettre", "mémoires", "tragédie", "comédie", "poème en prose",
                ],
                5,
            ),
            SourceSite::new(
                "en",
                "https://en.wikisource.org",
                &["sonnet", "elegy", "fable", "tale", "ballad", "ode", "letter", "essay"],
                3,
            ),
            SourceSite::new(
                "de",
                "https://de.wikisource.org",
                &["Gedicht", "Ballade", "Märchen", "Fabel", "Novelle", "Brief"],
                1,
            ),
            SourceSite::new(
                "it",
                "https://it.wikisource.org",
                &["sonetto", "canzone", "novella", "favola", "lettera"],
                1,
            ),
            SourceSite::new(
                "es",
                "https://es.wikisource.org",
                &["soneto", "fábula", "cuento", "romance", "carta"],
                1,
            ),
        ];
        Self::new(sites)
    }

    pub fn sites(&self) -> &[SourceSite] {
        &self.sites
    }

    pub fn find(&self, lang: &str) -> Option<&SourceSite> {
        self.sites.iter().find(|s| s.lang == lang)
    }

    /// Weighted random site for one attempt.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &SourceSite {
        &self.sites[self.index.sample(rng)]
    }
}
