//! Best-effort author attribution for a parsed page.
//!
//! Heuristics run in order and the first hit wins: author-namespace links,
//! author-classed markup, author-namespace hrefs, a "par <Nom>" byline near the
//! top of the page, and finally the work name taken from the display title.

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::{Html, Selector};

use crate::extractor::cleaner::decode_entities;
use crate::extractor::model::normalize_lines;
use crate::fetcher::ParsedPage;

const MARKUP_NAME_CHARS: (usize, usize) = (2, 50);
const BYLINE_NAME_CHARS: (usize, usize) = (3, 40);
const BYLINE_WINDOW_CHARS: usize = 500;

static AUTHOR_LINK: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:auteur|author|autor|autore|scriptor|auctor)\s*:\s*(.+?)\s*$").ok()
});

static AUTHOR_HREF: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r#"(?i)href\s*=\s*["'][^"']*?/wiki/(?:auteur|author|autor|autore|scriptor|auctor):([^"'#?]+)"#)
        .ok()
});

static BYLINE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"(?:^|[\s>(])(?:[Bb]y|[Pp]ar|de|von|di|por)\s+(\p{Lu}[\p{L}'’.\-]*(?:[ \-]\p{Lu}[\p{L}'’.\-]*){0,3})",
    )
    .ok()
});

static TAG: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"<[^>]*>").ok());

static AUTHOR_MARKUP: Lazy<Option<Selector>> = Lazy::new(|| {
    Selector::parse(
        r#"[class*="author"], [class*="auteur"], [class*="autor"], [itemprop="author"]"#,
    )
    .ok()
});

pub fn resolve_author(page: &ParsedPage) -> Option<String> {
    from_links(page)
        .or_else(|| from_markup(&page.html))
        .or_else(|| from_hrefs(&page.html))
        .or_else(|| from_byline(&page.html))
        .or_else(|| from_display_title(&page.display_title))
}

fn from_links(page: &ParsedPage) -> Option<String> {
    let re = AUTHOR_LINK.as_ref()?;
    page.links.iter().find_map(|link| {
        re.captures(&link.title)
            .map(|caps| caps[1].to_string())
            .filter(|name| !name.is_empty())
    })
}

fn from_markup(html: &str) -> Option<String> {
    let selector = AUTHOR_MARKUP.as_ref()?;
    let fragment = Html::parse_fragment(html);
    fragment.select(selector).find_map(|element| {
        let text = collapse(&element.text().collect::<String>());
        within(&text, MARKUP_NAME_CHARS).then_some(text)
    })
}

fn from_hrefs(html: &str) -> Option<String> {
    let re = AUTHOR_HREF.as_ref()?;
    re.captures_iter(html).find_map(|caps| {
        let decoded = percent_decode_str(&caps[1]).decode_utf8().ok()?;
        let name = collapse(&decoded.replace('_', " "));
        (!name.is_empty()).then_some(name)
    })
}

fn from_byline(html: &str) -> Option<String> {
    let re = BYLINE.as_ref()?;
    let head: String = html.chars().take(BYLINE_WINDOW_CHARS).collect();
    re.captures_iter(&head).find_map(|caps| {
        let name = caps[1].trim().to_string();
        within(&name, BYLINE_NAME_CHARS).then_some(name)
    })
}

fn from_display_title(display_title: &str) -> Option<String> {
    let plain = match TAG.as_ref() {
        Some(re) => re.replace_all(display_title, "").into_owned(),
        None => display_title.to_string(),
    };
    let plain = decode_entities(&plain);
    let first = collapse(plain.split('/').next().unwrap_or_default());
    (!first.is_empty()).then_some(first)
}

fn collapse(text: &str) -> String {
    normalize_lines(&text.replace('\n', " "))
}

fn within(text: &str, (min, max): (usize, usize)) -> bool {
    (min..=max).contains(&text.chars().count())
}
