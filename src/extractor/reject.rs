use thiserror::Error;

use crate::fetcher::ParsedPage;

const MIN_TEXT_CHARS: usize = 200;
const MIN_TEXT_LINES: usize = 2;
/// Characters of text a single outbound link is assumed to occupy.
const CHARS_PER_LINK: usize = 15;
const MAX_LINK_DENSITY: f64 = 0.25;
/// Below this average line length the text reads as verse or as a list.
const SHORT_LINE_AVERAGE: f64 = 60.0;
const MIN_PUNCTUATED_RATIO: f64 = 0.30;

/// Lower-cased fragments of raw HTML that mark redirects, edition pickers and
/// list pages.
const HTML_SIGNATURES: &[&str] = &[
    "redirectmsg",
    "redirecttext",
    "class=\"redirect",
    "plusieurs éditions",
    "multiple editions",
    "this page lists",
    "cette page liste",
    "cette page répertorie",
    "versions page",
    "disambiguation",
    "homonymie",
];

const TERMINAL_PUNCTUATION: &[char] = &['.', '!', '?', ':', ';', '…'];
const TRAILING_CLOSERS: &[char] = &['"', '\'', '»', '”', '’', ')', ']', ' '];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("text too short ({chars} chars)")]
    TooShort { chars: usize },
    #[error("page markup matches '{0}'")]
    Signature(&'static str),
    #[error("link-dense page ({links} links, density {density:.2})")]
    LinkDense { links: usize, density: f64 },
    #[error("too few lines ({lines})")]
    TooFewLines { lines: usize },
    #[error("short lines without punctuation (ratio {ratio:.2})")]
    ListLike { ratio: f64 },
}

/// Decide whether cleaned text from `page` is narrative content.
pub fn evaluate(text: &str, page: &ParsedPage) -> Result<(), Rejection> {
    let chars = text.chars().count();
    if chars < MIN_TEXT_CHARS {
        return Err(Rejection::TooShort { chars });
    }

    let html = page.html.to_lowercase();
    if let Some(signature) = HTML_SIGNATURES.iter().copied().find(|s| html.contains(s)) {
        return Err(Rejection::Signature(signature));
    }

    let links = page.links.len();
    let density = (links * CHARS_PER_LINK) as f64 / chars as f64;
    if density > MAX_LINK_DENSITY {
        return Err(Rejection::LinkDense { links, density });
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() < MIN_TEXT_LINES {
        return Err(Rejection::TooFewLines { lines: lines.len() });
    }

    let average = lines.iter().map(|l| l.chars().count()).sum::<usize>() as f64 / lines.len() as f64;
    if average < SHORT_LINE_AVERAGE {
        let punctuated = lines
            .iter()
            .filter(|l| l.trim_end_matches(TRAILING_CLOSERS).ends_with(TERMINAL_PUNCTUATION))
            .count();
        let ratio = punctuated as f64 / lines.len() as f64;
        if ratio < MIN_PUNCTUATED_RATIO {
            return Err(Rejection::ListLike { ratio });
        }
    }

    Ok(())
}
