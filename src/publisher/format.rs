//! Post assembly under the platform's character budget.
//!
//! A post is `{excerpt}\n\n— {author}\n{profile link}\n{hashtags}`. Only the
//! excerpt is shortened to fit; the attribution suffix is shortened only when
//! it alone would leave no room for text.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::config::Config;
use crate::extractor::Excerpt;

/// Hard limit of the publishing platform, in characters.
pub const POST_BUDGET: usize = 280;
/// Room always left for the excerpt itself.
const MIN_BODY_CHARS: usize = 40;
const ELLIPSIS: char = '…';

/// Characters left unescaped by JavaScript's `encodeURIComponent`; the web
/// app decodes profile links the same way.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Site-wide settings applied to every post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFormat {
    pub site_url: String,
    pub hashtags: String,
}

impl PostFormat {
    pub fn new(site_url: &str, hashtags: &str) -> Self {
        Self {
            site_url: site_url.trim_end_matches('/').to_string(),
            hashtags: hashtags.trim().to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.site_url(), config.hashtags())
    }

    /// Author profile page in the web app.
    pub fn author_link(&self, author: &str) -> String {
        format!(
            "{}/#/author/{}",
            self.site_url,
            utf8_percent_encode(author, URI_COMPONENT)
        )
    }
}

/// Assemble the post text for `excerpt`. The result never exceeds
/// [`POST_BUDGET`] characters.
pub fn format_post(excerpt: &Excerpt, format: &PostFormat) -> String {
    let suffix = attribution(excerpt, format);
    let room = POST_BUDGET - char_len(&suffix);
    let body = fit_body(excerpt.text.trim(), room);
    format!("{body}{suffix}")
}

fn attribution(excerpt: &Excerpt, format: &PostFormat) -> String {
    let max_suffix = POST_BUDGET - MIN_BODY_CHARS;
    let hashtags = (!format.hashtags.is_empty()).then(|| format!("\n{}", format.hashtags));

    // Without a resolved author the work title is credited, with no profile link.
    let (name, link) = match excerpt.author.as_deref().map(str::trim) {
        Some(author) if !author.is_empty() => {
            (author, Some(format!("\n{}", format.author_link(author))))
        }
        _ => (excerpt.title.trim(), None),
    };

    let candidates = [
        (link.as_deref(), hashtags.as_deref()),
        (None, hashtags.as_deref()),
        (None, None),
    ];
    for (link, hashtags) in candidates {
        let suffix = format!(
            "\n\n— {name}{}{}",
            link.unwrap_or_default(),
            hashtags.unwrap_or_default()
        );
        if char_len(&suffix) <= max_suffix {
            return suffix;
        }
    }

    let prefix_len = char_len("\n\n— ");
    let name = shorten(name, max_suffix - prefix_len);
    format!("\n\n— {name}")
}

/// Fit the excerpt into `room` characters, cutting at a word boundary.
fn fit_body(text: &str, room: usize) -> String {
    if char_len(text) <= room {
        return text.to_string();
    }
    shorten(text, room)
}

/// At most `max` characters, ending with an ellipsis after the last whole word.
fn shorten(text: &str, max: usize) -> String {
    if char_len(text) <= max {
        return text.to_string();
    }
    let head: Vec<char> = text.chars().take(max.saturating_sub(1)).collect();
    let mut cut: String = match head.iter().rposition(|c| c.is_whitespace()) {
        Some(space) if space > 0 => head[..space].iter().collect(),
        _ => head.iter().collect(),
    };
    cut.truncate(cut.trim_end().len());
    cut.push(ELLIPSIS);
    cut
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
