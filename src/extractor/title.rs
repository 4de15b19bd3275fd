//! Cheap title screening, run before a page is fetched.

use once_cell::sync::Lazy;
use regex::Regex;

const MIN_TITLE_CHARS: usize = 3;
const MAX_TITLE_CHARS: usize = 200;

/// Non-article namespace prefixes across the configured languages.
const NAMESPACE_PREFIXES: &[&str] = &[
    // categories
    "category", "catégorie", "kategorie", "categoria", "categoría",
    // help
    "help", "aide", "hilfe", "aiuto", "ayuda", "auxilium",
    // templates and modules
    "template", "modèle", "vorlage", "plantilla", "formula", "module", "modul", "modulo", "módulo",
    // files
    "file", "fichier", "datei", "archivo", "image", "fasciculus", "media", "média",
    // talk
    "talk", "discussion", "diskussion", "discussione", "discussioni", "discusión", "disputatio",
    // authors
    "author", "auteur", "autor", "autore", "scriptor",
    // scan indexes and pages
    "index", "livre", "indice", "índice", "page", "seite", "pagina", "página",
    // portals and project pages
    "portal", "portail", "portale", "porta", "wikisource", "project", "mediawiki",
    "translation", "transwiki",
    // users and special pages
    "user", "utilisateur", "benutzer", "utente", "usuario",
    "special", "spécial", "spezial", "speciale", "especial",
];

/// Namespaces that take a talk companion (`User talk:`, `Discussion auteur:`).
const TALK_SUBJECTS: &[&str] = &[
    "user", "author", "template", "category", "help", "file", "index", "page", "portal",
    "module", "project", "wikisource", "mediawiki", "translation",
    "utilisateur", "auteur", "modèle", "catégorie", "aide", "fichier", "livre", "portail",
    "projet",
    "benutzer", "autor", "vorlage", "kategorie", "hilfe", "datei", "seite", "modul",
    "utente", "autore", "categoria", "aiuto", "pagina", "portale", "modulo", "indice",
    "usuario", "plantilla", "categoría", "ayuda", "archivo", "página", "índice", "módulo",
    "scriptoris", "usoris", "formulae", "categoriae", "auxilii", "fasciculi",
];

/// Talk words that follow their subject (`User talk`, `Benutzer Diskussion`).
const TALK_SUFFIXES: &[&str] = &["talk", "diskussion", "discusión"];

/// Talk words that lead their subject (`Discussion auteur`, `Discussioni utente`).
const TALK_PREFIXES: &[&str] = &["discussion", "discussioni", "discussione", "disputatio"];

const LIST_MARKERS: &[&str] = &[
    "liste des", "liste de", "list of", "table des matières", "sommaire", "bibliographie",
    "bibliography", "inhaltsverzeichnis", "werkverzeichnis", "verzeichnis", "elenco",
    "indice", "índice", "catalogue", "catálogo", "contents",
];

const STUDY_MARKERS: &[&str] = &[
    "biographie", "biography", "biografia", "biografía", "notice biographique", "notice sur",
    "étude sur", "études sur", "critical study", "life and works", "vie et œuvre",
    "vie et oeuvre", "leben und werk", "vita e opere",
];

const COMPLETE_WORKS_MARKERS: &[&str] = &[
    "œuvres complètes", "oeuvres complètes", "complete works", "collected works",
    "sämtliche werke", "gesammelte werke", "opere complete", "tutte le opere",
    "obras completas", "opera omnia",
];

fn alternation(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

/// Whole-word, case-insensitive match of any marker phrase.
fn marker_regex(markers: &[&str]) -> Option<Regex> {
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation(markers))).ok()
}

static NAMESPACE: Lazy<Option<Regex>> = Lazy::new(|| {
    let alternatives = alternation(NAMESPACE_PREFIXES);
    Regex::new(&format!(r"(?i)^\s*(?:{alternatives})\s*:")).ok()
});

static TALK_NAMESPACE: Lazy<Option<Regex>> = Lazy::new(|| {
    let subjects = alternation(TALK_SUBJECTS);
    let suffixes = alternation(TALK_SUFFIXES);
    let prefixes = alternation(TALK_PREFIXES);
    Regex::new(&format!(
        r"(?i)^\s*(?:(?:{subjects})[\s_]+(?:{suffixes})|(?:{prefixes})[\s_]+(?:{subjects}))\s*:"
    ))
    .ok()
});

static LIST: Lazy<Option<Regex>> = Lazy::new(|| marker_regex(LIST_MARKERS));
static STUDY: Lazy<Option<Regex>> = Lazy::new(|| marker_regex(STUDY_MARKERS));
static COMPLETE_WORKS: Lazy<Option<Regex>> = Lazy::new(|| marker_regex(COMPLETE_WORKS_MARKERS));

/// Why a title was screened out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleVerdict {
    Content,
    Length,
    Namespace,
    List,
    Study,
    CompleteWorks,
}

pub fn classify_title(title: &str) -> TitleVerdict {
    let title = title.trim();

    let matches = |re: &Lazy<Option<Regex>>| re.as_ref().is_some_and(|re| re.is_match(title));
    if matches(&NAMESPACE) || matches(&TALK_NAMESPACE) {
        return TitleVerdict::Namespace;
    }

    if matches(&LIST) {
        return TitleVerdict::List;
    }
    if matches(&STUDY) {
        return TitleVerdict::Study;
    }
    if !title.contains('/') && matches(&COMPLETE_WORKS) {
        return TitleVerdict::CompleteWorks;
    }

    let len = title.chars().count();
    if !(MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&len) {
        return TitleVerdict::Length;
    }

    TitleVerdict::Content
}

/// True when the title plausibly names a literary text worth fetching.
pub fn is_content_title(title: &str) -> bool {
    classify_title(title) == TitleVerdict::Content
}
