use serde::{Deserialize, Serialize};

/// Main (article) namespace.
pub const MAIN_NAMESPACE: i64 = 0;

/// A title proposed by a listing call, not yet fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePage {
    pub title: String,
    pub ns: i64,
}

/// One outbound wiki link of a parsed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub ns: i64,
    /// Target title as displayed by the API, namespace prefix included
    /// (e.g. `Auteur:Victor Hugo`).
    pub title: String,
    pub exists: bool,
}

/// Rendered page as returned by `action=parse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPage {
    pub title: String,
    /// May contain inline markup (`<span class="mw-page-title-main">`).
    pub display_title: String,
    pub html: String,
    pub links: Vec<PageLink>,
}

impl ParsedPage {
    /// Main-namespace links pointing below this page (`<title>/...`).
    pub fn subpage_links(&self) -> impl Iterator<Item = &PageLink> {
        let base = self.title.split('/').next().unwrap_or(&self.title);
        let prefix = format!("{base}/");
        self.links
            .iter()
            .filter(move |l| l.ns == MAIN_NAMESPACE && l.title.starts_with(&prefix))
    }
}

// Wire format of the MediaWiki API (formatversion=1).

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub query: Option<QueryBody>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueryBody {
    #[serde(default)]
    pub random: Vec<TitleEntry>,
    #[serde(default)]
    pub search: Vec<TitleEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TitleEntry {
    pub title: String,
    #[serde(default)]
    pub ns: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParseResponse {
    pub parse: Option<ParseBody>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParseBody {
    pub title: String,
    pub displaytitle: Option<String>,
    pub text: Option<StarContent>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StarContent {
    #[serde(rename = "*")]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LinkEntry {
    #[serde(default)]
    pub ns: i64,
    #[serde(rename = "*")]
    pub title: String,
    pub exists: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

impl From<TitleEntry> for CandidatePage {
    fn from(entry: TitleEntry) -> Self {
        Self {
            title: entry.title,
            ns: entry.ns,
        }
    }
}

impl From<LinkEntry> for PageLink {
    fn from(entry: LinkEntry) -> Self {
        Self {
            ns: entry.ns,
            title: entry.title,
            exists: entry.exists.is_some(),
        }
    }
}
