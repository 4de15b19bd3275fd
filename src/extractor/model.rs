use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::Url;

/// Characters escaped in a `/wiki/<title>` path. `/` stays literal so
/// sub-pages keep their readable form.
const TITLE_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Selected excerpt, ready for formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Excerpt {
    pub text: String,
    pub author: Option<String>,
    pub title: String,
    pub lang: String,
    pub source_url: Url,
    pub fetched_at: DateTime<Utc>,
}

/// Public URL of a page: `<base>/wiki/<Title_With_Underscores>`.
pub fn page_url(base_url: &str, title: &str) -> Result<Url, url::ParseError> {
    let path = utf8_percent_encode(&title.trim().replace(' ', "_"), TITLE_PATH).to_string();
    Url::parse(&format!("{}/wiki/{}", base_url.trim_end_matches('/'), path))
}

/// Collapse horizontal whitespace inside each line and trim line ends.
pub fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(|line| {
            line.split(|c: char| c == ' ' || c == '\t' || c == '\u{a0}' || c == '\u{202f}')
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_keeps_subpage_slash() {
        let url = page_url("https://fr.wikisource.org/", "Les Fleurs du mal/L’Albatros").unwrap();
        assert_eq!(
            url.as_str(),
            "https://fr.wikisource.org/wiki/Les_Fleurs_du_mal/L%E2%80%99Albatros"
        );
    }

    #[test]
    fn page_url_escapes_query_characters() {
        let url = page_url("https://en.wikisource.org", "What? A #1 Story").unwrap();
        assert_eq!(url.as_str(), "https://en.wikisource.org/wiki/What%3F_A_%231_Story");
    }

    #[test]
    fn excerpt_record_carries_fetch_time() {
        let fetched_at = DateTime::parse_from_rfc3339("2026-03-21T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let excerpt = Excerpt {
            text: "Ô temps, suspends ton vol !".to_string(),
            author: None,
            title: "Le Lac".to_string(),
            lang: "fr".to_string(),
            source_url: page_url("https://fr.wikisource.org", "Le Lac").unwrap(),
            fetched_at,
        };

        let json = serde_json::to_value(&excerpt).unwrap();
        assert_eq!(json["fetched_at"], "2026-03-21T08:00:00Z");
        assert_eq!(json["source_url"], "https://fr.wikisource.org/wiki/Le_Lac");
    }

    #[test]
    fn test_normalize_lines() {
        let text = "  Hello \u{a0}  world  \n\n\tTest  ";
        assert_eq!(normalize_lines(text), "Hello world\n\nTest");
    }
}
