//! HTML → plain narrative text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{ElementRef, Html, Node};
use tracing::trace;

use crate::extractor::model::normalize_lines;
use crate::extractor::{reader, rules};

/// Leading lines inspected for page metadata.
const METADATA_SCAN_LINES: usize = 15;
/// Lines shorter than this are treated as noise when leading the text.
const NOISE_LINE_CHARS: usize = 3;

static MARKUP: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>]*)?/?>|<!--").ok());

static ENTITY: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});").ok());

static BLANK_RUNS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\n{3,}").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Inline,
    Block,
    Paragraph,
}

fn layout_of(tag: &str) -> Layout {
    match tag {
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "table" | "hr" | "pre" => {
            Layout::Paragraph
        }
        "div" | "li" | "ul" | "ol" | "dl" | "dd" | "dt" | "tr" | "td" | "th" | "center"
        | "section" | "article" | "body" => Layout::Block,
        _ => Layout::Inline,
    }
}

/// Reduce a page body to plain text.
///
/// Output has no tags or entities, at most one blank line between paragraphs,
/// and no leading metadata lines. Input that is already tag-free skips the
/// DOM pass, so running the extractor on its own output changes nothing.
pub fn extract_text(html: &str) -> String {
    let has_markup = MARKUP.as_ref().is_some_and(|re| re.is_match(html));
    let rendered = if has_markup {
        render_html(html)
    } else {
        html.to_string()
    };
    clean_text(&rendered)
}

fn render_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();
    for root in reader::content_roots(&document) {
        render_children(root, &mut out);
        out.push_str("\n\n");
    }
    out
}

fn render_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                // Source newlines are layout noise; structure comes from elements.
                out.extend(text.chars().map(|c| match c {
                    '\n' | '\r' | '\t' => ' ',
                    other => other,
                }));
            }
            Node::Element(el) => {
                if let Some(rule) = rules::removal_rule(el) {
                    trace!("Dropping <{}> block: {}", el.name(), rule.label);
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                if el.name() == "br" {
                    out.push('\n');
                    continue;
                }
                let layout = layout_of(el.name());
                if layout != Layout::Inline {
                    out.push('\n');
                }
                render_children(child_ref, out);
                match layout {
                    Layout::Paragraph => out.push_str("\n\n"),
                    Layout::Block => out.push('\n'),
                    Layout::Inline => {}
                }
            }
            _ => {}
        }
    }
}

fn clean_text(raw: &str) -> String {
    let mut text = decode_entities(raw);
    for rule in rules::TEXT_RULES.iter() {
        text = rule
            .pattern
            .replace_all(&text, rule.replacement)
            .into_owned();
    }
    let text = normalize_lines(&text);
    let text = match BLANK_RUNS.as_ref() {
        Some(re) => re.replace_all(&text, "\n\n").into_owned(),
        None => text,
    };
    strip_leading_metadata(text.trim())
}

/// Decode numeric and common named entities; unknown named entities vanish.
pub fn decode_entities(text: &str) -> String {
    let Some(re) = ENTITY.as_ref() else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &Captures| {
        let body = &caps[1];
        if let Some(num) = body.strip_prefix('#') {
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse().ok(),
            };
            return match code.and_then(char::from_u32) {
                Some('\u{a0}') => " ".to_string(),
                Some(c) => c.to_string(),
                None => String::new(),
            };
        }
        named_entity(body).map(str::to_string).unwrap_or_default()
    })
    .into_owned()
}

fn named_entity(name: &str) -> Option<&'static str> {
    let decoded = match name {
        "nbsp" | "ensp" | "emsp" | "thinsp" | "nnbsp" => " ",
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "laquo" => "«",
        "raquo" => "»",
        "lsquo" => "‘",
        "rsquo" => "’",
        "ldquo" => "“",
        "rdquo" => "”",
        "hellip" => "…",
        "mdash" => "—",
        "ndash" => "–",
        "shy" | "zwj" | "zwnj" => "",
        "oelig" => "œ",
        "OElig" => "Œ",
        "aelig" => "æ",
        "AElig" => "Æ",
        "eacute" => "é",
        "Eacute" => "É",
        "egrave" => "è",
        "Egrave" => "È",
        "ecirc" => "ê",
        "agrave" => "à",
        "Agrave" => "À",
        "acirc" => "â",
        "ccedil" => "ç",
        "Ccedil" => "Ç",
        "icirc" => "î",
        "ocirc" => "ô",
        "ucirc" => "û",
        "ugrave" => "ù",
        "uuml" => "ü",
        "ouml" => "ö",
        "auml" => "ä",
        "szlig" => "ß",
        "ntilde" => "ñ",
        "copy" => "©",
        "sect" => "§",
        "middot" => "·",
        _ => return None,
    };
    Some(decoded)
}

/// Drop the contiguous run of metadata-like lines that opens the text.
///
/// Signature matches, near-empty lines (stanza numerals) and fully
/// parenthetical lines extend the run. Any other non-blank line ends it, so
/// the first kept line is never droppable and a second pass is a no-op. A run
/// still open after the first [`METADATA_SCAN_LINES`] lines is left in place.
fn strip_leading_metadata(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let first_kept = lines.iter().take(METADATA_SCAN_LINES).position(|line| {
        let line = line.trim();
        !line.is_empty() && !is_droppable(line)
    });

    match first_kept {
        Some(start) => lines[start..].join("\n").trim().to_string(),
        None => text.to_string(),
    }
}

fn is_droppable(line: &str) -> bool {
    rules::metadata_signature(line).is_some()
        || line.chars().count() < NOISE_LINE_CHARS
        || is_parenthetical(line)
}

fn is_parenthetical(line: &str) -> bool {
    line.starts_with('(') && line.ends_with(')')
}
