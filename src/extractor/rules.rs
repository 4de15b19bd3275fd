//! Declarative rule tables driving text extraction.
//!
//! Three tables, each applied in order:
//! - [`BLOCK_RULES`]: elements whose whole subtree is dropped before rendering.
//! - [`TEXT_RULES`]: regex substitutions removing residue from rendered text.
//! - [`METADATA_RULES`]: signatures of leading lines that are not the work itself.
//!
//! Adding a source language usually means adding entries here and nowhere else.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Element;

/// What a block rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMatcher {
    Tag(&'static str),
    /// Substring of the `class` attribute, compared lowercase.
    ClassContains(&'static str),
    Id(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct BlockRule {
    pub label: &'static str,
    pub matcher: BlockMatcher,
}

impl BlockRule {
    const fn tag(label: &'static str, tag: &'static str) -> Self {
        Self {
            label,
            matcher: BlockMatcher::Tag(tag),
        }
    }

    const fn class(label: &'static str, needle: &'static str) -> Self {
        Self {
            label,
            matcher: BlockMatcher::ClassContains(needle),
        }
    }

    const fn id(label: &'static str, id: &'static str) -> Self {
        Self {
            label,
            matcher: BlockMatcher::Id(id),
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self.matcher {
            BlockMatcher::Tag(tag) => element.name().eq_ignore_ascii_case(tag),
            BlockMatcher::ClassContains(needle) => element
                .attr("class")
                .is_some_and(|class| class.to_lowercase().contains(needle)),
            BlockMatcher::Id(id) => element.id().is_some_and(|v| v.eq_ignore_ascii_case(id)),
        }
    }
}

pub static BLOCK_RULES: &[BlockRule] = &[
    BlockRule::tag("script", "script"),
    BlockRule::tag("style", "style"),
    BlockRule::tag("noscript", "noscript"),
    BlockRule::tag("head", "head"),
    BlockRule::tag("footnote marker", "sup"),
    BlockRule::tag("subscript", "sub"),
    BlockRule::class("reference", "reference"),
    BlockRule::class("footnotes", "mw-ref"),
    BlockRule::class("page number", "pagenum"),
    BlockRule::class("navigation box", "navbox"),
    BlockRule::class("navigation", "navigation"),
    BlockRule::class("info box", "infobox"),
    BlockRule::class("table of contents", "toc"),
    BlockRule::class("category links", "catlinks"),
    BlockRule::class("edit section", "mw-editsection"),
    BlockRule::class("header template", "ws-header"),
    BlockRule::class("header template", "headertemplate"),
    BlockRule::class("export exclusion", "ws-noexport"),
    BlockRule::class("print exclusion", "noprint"),
    BlockRule::class("disambiguation", "homonymie"),
    BlockRule::class("disambiguation", "disambig"),
    BlockRule::class("portal banner", "portal"),
    BlockRule::class("banner", "bandeau"),
    BlockRule::class("metadata", "metadata"),
    BlockRule::class("print footer", "printfooter"),
    BlockRule::class("jump link", "mw-jump-link"),
    BlockRule::id("table of contents", "toc"),
    BlockRule::id("category links", "catlinks"),
    BlockRule::id("header template", "headertemplate"),
    BlockRule::id("data block", "ws-data"),
];

/// First rule that keeps the element and its subtree out of the text output.
pub fn removal_rule(element: &Element) -> Option<&'static BlockRule> {
    BLOCK_RULES.iter().find(|rule| rule.matches(element))
}

/// A regex substitution applied to rendered text.
#[derive(Debug)]
pub struct TextRule {
    pub label: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
}

const TEXT_RULE_SPECS: &[(&str, &str, &str)] = &[
    (
        "edit marker",
        r"(?i)\[\s*(?:modifier|modifier le wikicode|edit|edit source|bearbeiten|quelltext bearbeiten|editar|editar código|modifica|modifica wikitesto)\s*\]",
        "",
    ),
    ("footnote index", r"\[\s*(?:\d+|[a-z]|note\s*\d+)\s*\]", ""),
    (
        "edit phrase",
        r"(?i)\b(?:modifier le wikicode|edit wikitext|edit source|quelltext bearbeiten|editar código|modifica wikitesto)\b",
        "",
    ),
    ("residual tag", r"</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>]*)?/?>", ""),
    ("html comment", r"(?s)<!--.*?-->", ""),
];

pub static TEXT_RULES: Lazy<Vec<TextRule>> = Lazy::new(|| {
    TEXT_RULE_SPECS
        .iter()
        .filter_map(|(label, pattern, replacement)| {
            Regex::new(pattern).ok().map(|pattern| TextRule {
                label,
                pattern,
                replacement,
            })
        })
        .collect()
});

/// Signature of a leading line that describes the page rather than the work.
#[derive(Debug)]
pub struct LineRule {
    pub label: &'static str,
    pub pattern: Regex,
}

const METADATA_RULE_SPECS: &[(&str, &str)] = &[
    (
        "table of contents",
        r"(?i)^(?:sommaire|table des matières|table of contents|contents|inhalt|inhaltsverzeichnis|indice|índice)\b",
    ),
    (
        "edition notice",
        r"(?i)^(?:(?:texte établi|éditions?|editions?|publié|paru|imprimerie|librairie|transcribed|transcription|text from|herausgegeben|verlag|edizione|edición)\b|sources?\s*:)",
    ),
    (
        "navigation",
        r"(?i)^(?:(?:précédent|suivant|previous|next|retour|back|zurück|weiter|anterior|siguiente|precedente|successivo)\b|<<|>>)",
    ),
    ("navigation arrows", r"[◄►←→‹›]\s*$|^\s*[◄►←→‹›]"),
    (
        "category",
        r"(?i)^(?:catégories?|categor(?:y|ies)|kategorien?|categorias?|categorías?)\s*:",
    ),
    (
        "see also",
        r"(?i)^(?:voir aussi|see also|siehe auch|vedi anche|véase también)",
    ),
    (
        "editorial notice",
        r"(?i)^(?:note de l[’']éditeur|notice|avertissement de l[’']éditeur|editor[’']?s note|anmerkung des herausgebers|nota del editor|nota dell[’']editore)",
    ),
];

pub static METADATA_RULES: Lazy<Vec<LineRule>> = Lazy::new(|| {
    METADATA_RULE_SPECS
        .iter()
        .filter_map(|(label, pattern)| {
            Regex::new(pattern)
                .ok()
                .map(|pattern| LineRule { label, pattern })
        })
        .collect()
});

/// Label of the first metadata signature the (trimmed) line matches.
pub fn metadata_signature(line: &str) -> Option<&'static str> {
    METADATA_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(line))
        .map(|rule| rule.label)
}
