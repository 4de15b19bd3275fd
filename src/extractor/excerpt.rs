//! Excerpt selection over cleaned text.
//!
//! Text is cut into blank-line separated units. A unit whose length already
//! suits a short post is preferred; otherwise the first long unit is cut back
//! to a sentence or word boundary.

use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

const MIN_UNIT_CHARS: usize = 20;
const PREFERRED: (usize, usize) = (100, 450);
const ACCEPTABLE: (usize, usize) = (80, 500);
const MIN_FALLBACK_CHARS: usize = 60;
pub const MAX_EXCERPT_CHARS: usize = 500;
/// A sentence cut must keep more than this many characters.
const MIN_SENTENCE_CUT: usize = 200;
/// A whitespace cut must keep more than this many characters.
const MIN_WORD_CUT: usize = 300;
const ELLIPSIS: char = '…';

const SENTENCE_END: &[char] = &['.', '!', '?', '…'];

static UNIT_BREAK: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\n\s*\n").ok());

/// Trimmed paragraph-like units of at least 20 characters, in text order.
pub fn paragraphs(text: &str) -> Vec<&str> {
    let pieces: Vec<&str> = match UNIT_BREAK.as_ref() {
        Some(re) => re.split(text).collect(),
        None => text.split("\n\n").collect(),
    };
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|unit| unit.chars().count() >= MIN_UNIT_CHARS)
        .collect()
}

/// Pick the excerpt to publish, or `None` when no unit is long enough.
pub fn select_excerpt<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Option<String> {
    let units = paragraphs(text);

    for (min, max) in [PREFERRED, ACCEPTABLE] {
        let bucket: Vec<&str> = units
            .iter()
            .copied()
            .filter(|u| (min..=max).contains(&u.chars().count()))
            .collect();
        if let Some(unit) = bucket.choose(rng) {
            return Some(unit.to_string());
        }
    }

    units
        .iter()
        .find(|u| u.chars().count() >= MIN_FALLBACK_CHARS)
        .map(|unit| truncate_unit(unit))
}

/// Shorten a unit to at most 500 characters without splitting a word.
fn truncate_unit(unit: &str) -> String {
    let chars: Vec<char> = unit.chars().collect();
    if chars.len() <= MAX_EXCERPT_CHARS {
        return unit.to_string();
    }

    let window = &chars[..MAX_EXCERPT_CHARS];
    if let Some(end) = window.iter().rposition(|c| SENTENCE_END.contains(c))
        && end > MIN_SENTENCE_CUT
    {
        return window[..=end].iter().collect();
    }

    // Leave room for the ellipsis.
    let room = &chars[..MAX_EXCERPT_CHARS - 1];
    let mut cut: String = match room.iter().rposition(|c| c.is_whitespace()) {
        Some(space) if space > MIN_WORD_CUT => room[..=space].iter().collect(),
        _ => room.iter().collect(),
    };
    cut.push(ELLIPSIS);
    cut
}
