use scraper::{ElementRef, Html, Selector};

/// Content containers in priority order: proofread (paginated) output, verse,
/// then the generic parser output.
const CONTENT_SELECTORS: [&str; 3] = [".prp-pages-output", ".poem", ".mw-parser-output"];

/// Elements holding the primary content of a parsed page.
///
/// The first selector with any match wins; nested matches of the same selector
/// are folded into their outermost ancestor so nothing is rendered twice.
/// Falls back to the whole document.
pub fn content_roots(document: &Html) -> Vec<ElementRef<'_>> {
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        let matches: Vec<ElementRef> = document.select(&selector).collect();
        if matches.is_empty() {
            continue;
        }

        let ids: Vec<_> = matches.iter().map(|m| m.id()).collect();
        return matches
            .into_iter()
            .filter(|m| !m.ancestors().any(|a| ids.contains(&a.id())))
            .collect();
    }

    vec![document.root_element()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_texts(html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        content_roots(&document)
            .into_iter()
            .map(|e| e.text().collect::<String>())
            .collect()
    }

    #[test]
    fn prefers_paginated_output() {
        let html = r#"<div class="mw-parser-output"><div class="ws-header">Head</div>
            <div class="prp-pages-output">Pages</div></div>"#;
        assert_eq!(root_texts(html), vec!["Pages"]);
    }

    #[test]
    fn verse_container_beats_parser_output() {
        let html = r#"<div class="mw-parser-output"><p>Intro</p><div class="poem"><p>Vers</p></div></div>"#;
        assert_eq!(root_texts(html), vec!["Vers"]);
    }

    #[test]
    fn nested_matches_collapse_to_outermost() {
        let html = r#"<div class="poem">A<div class="poem">B</div></div><div class="poem">C</div>"#;
        assert_eq!(root_texts(html), vec!["AB", "C"]);
    }

    #[test]
    fn falls_back_to_document() {
        let roots = root_texts("<p>Bare paragraph</p>");
        assert_eq!(roots.len(), 1);
        assert!(roots[0].contains("Bare paragraph"));
    }
}
