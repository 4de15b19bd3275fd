use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;

use crate::extractor::excerpt::paragraphs;
use crate::extractor::{Discard, Rejection, extract_excerpt, extract_text, looks_like_summary};
use crate::fetcher::{PageLink, ParsedPage};
use crate::sources::SourceSite;

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

fn parsed(title: &str, html: String, links: &[(i64, &str)]) -> ParsedPage {
    ParsedPage {
        title: title.to_string(),
        display_title: title.to_string(),
        html,
        links: links
            .iter()
            .map(|(ns, title)| PageLink {
                ns: *ns,
                title: title.to_string(),
                exists: true,
            })
            .collect(),
    }
}

fn french_site() -> SourceSite {
    SourceSite::new("fr", "https://fr.wikisource.org", &["poème"], 1)
}

#[test]
fn test_extract_poem() {
    let html = fixture("poem.html");
    let text = extract_text(&html);

    assert!(text.starts_with("Ainsi, toujours poussés vers de nouveaux rivages,\n"));
    assert!(text.contains("Jeter l’ancre un seul jour ?\n\nÔ lac !"));
    assert!(text.ends_with("Tes flots harmonieux."));
    assert!(!text.contains('<'));
    assert!(!text.contains("&#160;"));
    assert!(!text.contains("Lamartine"));
    assert!(!text.contains("modifier"));
    assert!(!text.contains("Catégorie"));
    assert!(!text.contains("Récupérée"));
    assert_eq!(paragraphs(&text).len(), 4);
}

#[test]
fn test_poem_excerpt_is_a_stanza() {
    let page = parsed(
        "Le Lac",
        fixture("poem.html"),
        &[
            (102, "Auteur:Alphonse de Lamartine"),
            (0, "Méditations poétiques"),
            (0, "Méditations poétiques/L’Isolement"),
            (0, "Méditations poétiques/L’Homme"),
            (14, "Catégorie:Poèmes"),
        ],
    );
    let text = extract_text(&page.html);
    let mut rng = StdRng::seed_from_u64(11);

    let excerpt = extract_excerpt(&french_site(), &page, &text, &mut rng).unwrap();

    assert!(paragraphs(&text).contains(&excerpt.text.as_str()));
    assert_eq!(excerpt.author.as_deref(), Some("Alphonse de Lamartine"));
    assert_eq!(excerpt.title, "Le Lac");
    assert_eq!(excerpt.lang, "fr");
    assert_eq!(excerpt.source_url.as_str(), "https://fr.wikisource.org/wiki/Le_Lac");
}

#[test]
fn test_poem_author_from_header_markup() {
    let page = parsed("Le Lac", fixture("poem.html"), &[]);
    let text = extract_text(&page.html);
    let mut rng = StdRng::seed_from_u64(3);

    let excerpt = extract_excerpt(&french_site(), &page, &text, &mut rng).unwrap();
    assert_eq!(excerpt.author.as_deref(), Some("Alphonse de Lamartine"));
}

#[test]
fn test_extract_prose() {
    let page = parsed(
        "Le Horla",
        fixture("prose.html"),
        &[(102, "Auteur:Guy de Maupassant"), (0, "Le Horla")],
    );
    let text = extract_text(&page.html);

    assert!(text.starts_with("Quelle journée admirable ! J’ai passé"));
    assert!(text.contains("mes racines, ces profondes"));
    assert!(!text.contains("Texte établi"));
    assert!(!text.contains("(Fragment)"));
    assert!(!text.contains("[1]"));
    assert!(!text.contains("12Quelle"));
    assert!(!text.contains("normand"));

    let mut rng = StdRng::seed_from_u64(5);
    let excerpt = extract_excerpt(&french_site(), &page, &text, &mut rng).unwrap();
    assert!(excerpt.text.starts_with("Quelle journée admirable !"));
    assert!(excerpt.text.ends_with("ses aïeux."));
    assert_eq!(excerpt.author.as_deref(), Some("Guy de Maupassant"));
}

#[test]
fn test_summary_page_is_detected() {
    let page = parsed(
        "Les Contemplations",
        fixture("index.html"),
        &[
            (102, "Auteur:Victor Hugo"),
            (0, "Les Contemplations/Préface"),
            (0, "Les Contemplations/Aujourd’hui"),
            (0, "Les Contemplations/Autrefois"),
            (0, "Les Contemplations/Aux Feuillantines"),
            (0, "Les Contemplations/Demain, dès l’aube…"),
        ],
    );
    let text = extract_text(&page.html);

    assert!(looks_like_summary(&page, &text));
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        extract_excerpt(&french_site(), &page, &text, &mut rng),
        Err(Discard::Quality(Rejection::TooShort { .. }))
    ));
}

#[test]
fn test_long_page_with_subpages_is_not_a_summary() {
    let page = parsed(
        "Le Horla",
        fixture("prose.html"),
        &[
            (0, "Le Horla/I"),
            (0, "Le Horla/II"),
            (0, "Le Horla/III"),
        ],
    );
    let text = extract_text(&page.html);
    assert!(!looks_like_summary(&page, &text));
}

#[test]
fn test_short_page_is_discarded() {
    let page = parsed(
        "Court",
        "<div class='mw-parser-output'><p>Court texte.</p></div>".to_string(),
        &[],
    );
    let text = extract_text(&page.html);
    assert_eq!(text, "Court texte.");

    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        extract_excerpt(&french_site(), &page, &text, &mut rng),
        Err(Discard::Quality(Rejection::TooShort { chars: 12 }))
    ));
}

#[test]
fn test_extraction_is_idempotent() {
    for name in ["poem.html", "prose.html", "index.html"] {
        let once = extract_text(&fixture(name));
        assert_eq!(extract_text(&once), once, "{name}");
    }
}

#[test]
fn test_extraction_is_idempotent_on_short_lines() {
    let cases = [
        "I\n\nLe soleil se couche,\nLa mer est calme.\n\nII\n\nLe vent se tait.",
        "(fragment)\nIV\nSommaire\nUn vers.\n(bis)\nV\nUn autre vers.",
        "Le Lac\n\nI\n\nAinsi, toujours poussés vers de nouveaux rivages,\nDans la nuit éternelle emportés sans retour,",
        "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl\nm\nn\no\np\nq\nFin du poème.",
        "(extrait)\n\n(suite)\n\nNotice\n\nTexte établi par l’auteur\n\nIci commence le texte.",
        "Ô\nmer\nÔ\nciel\nI\nII\nIII",
    ];
    for raw in cases {
        let once = extract_text(raw);
        assert_eq!(extract_text(&once), once, "{raw:?}");
    }
}

#[test]
fn test_malformed_html() {
    let html = "<div class=\"mw-parser-output\"><p>Vers sans fin<br>encore<div>Plus loin";
    let text = extract_text(html);
    assert!(text.contains("Vers sans fin\nencore"));
    assert!(text.contains("Plus loin"));
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use crate::extractor::select_excerpt;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let text = extract_text(&html);
            let _ = extract_text(&text);
        }

        #[test]
        fn test_short_line_extraction_is_idempotent(text in "(?:[A-Za-z ,()]{0,30}\n){0,30}") {
            let once = extract_text(&text);
            prop_assert_eq!(extract_text(&once), once);
        }

        #[test]
        fn test_excerpt_length_law(text in "[a-z .\n]{0,2000}", seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Some(excerpt) = select_excerpt(&text, &mut rng) {
                let len = excerpt.chars().count();
                prop_assert!((60..=500).contains(&len));
            }
        }
    }
}
