use crate::fetcher::{
    errors::FetchError,
    types::{CandidatePage, PageLink, ParseResponse, ParsedPage, QueryResponse},
};
use crate::sources::{QueryStrategy, SourceSite};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT: &str = "PalimpsesteBot/0.1 (+https://palimpseste.vercel.app)";
const LIST_LIMIT: &str = "20";

/// Content API consumed by the discovery loop.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Candidate titles for one attempt. An empty list is a valid answer.
    async fn list(
        &self,
        site: &SourceSite,
        strategy: &QueryStrategy,
    ) -> Result<Vec<CandidatePage>, FetchError>;

    /// Rendered HTML, links and display title of one page.
    async fn parse(&self, site: &SourceSite, title: &str) -> Result<ParsedPage, FetchError>;
}

/// MediaWiki API client. Every call is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct WikiClient {
    http: Client,
}

impl WikiClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = ClientBuilder::new()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .default_headers(headers)
            .build()
            .map_err(FetchError::from_reqwest_error)?;

        Ok(Self { http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        site: &SourceSite,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = url::Url::parse(&site.api_url())?;

        let response = self
            .http
            .get(url)
            .query(&[("format", "json"), ("formatversion", "1")])
            .query(params)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status));
        }

        let body = response
            .text()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PageSource for WikiClient {
    #[instrument(skip_all, fields(lang = %site.lang))]
    async fn list(
        &self,
        site: &SourceSite,
        strategy: &QueryStrategy,
    ) -> Result<Vec<CandidatePage>, FetchError> {
        let response: QueryResponse = match strategy {
            QueryStrategy::Random => {
                self.get_json(
                    site,
                    &[
                        ("action", "query"),
                        ("list", "random"),
                        ("rnnamespace", "0"),
                        ("rnlimit", LIST_LIMIT),
                    ],
                )
                .await?
            }
            QueryStrategy::Search { term, offset } => {
                let offset = offset.to_string();
                self.get_json(
                    site,
                    &[
                        ("action", "query"),
                        ("list", "search"),
                        ("srsearch", term.as_str()),
                        ("srnamespace", "0"),
                        ("srlimit", LIST_LIMIT),
                        ("sroffset", offset.as_str()),
                    ],
                )
                .await?
            }
        };

        if let Some(error) = response.error {
            return Err(FetchError::Api {
                code: error.code,
                info: error.info,
            });
        }

        let query = response.query.unwrap_or_default();
        let entries = match strategy {
            QueryStrategy::Random => query.random,
            QueryStrategy::Search { .. } => query.search,
        };
        debug!("listed {} candidate titles via {:?}", entries.len(), strategy);

        Ok(entries.into_iter().map(CandidatePage::from).collect())
    }

    #[instrument(skip_all, fields(lang = %site.lang, title = %title))]
    async fn parse(&self, site: &SourceSite, title: &str) -> Result<ParsedPage, FetchError> {
        let response: ParseResponse = self
            .get_json(
                site,
                &[
                    ("action", "parse"),
                    ("page", title),
                    ("prop", "text|links|displaytitle"),
                    ("redirects", "1"),
                    ("disableeditsection", "1"),
                ],
            )
            .await?;

        if let Some(error) = response.error {
            return Err(FetchError::Api {
                code: error.code,
                info: error.info,
            });
        }

        let body = response.parse.ok_or(FetchError::MissingField("parse"))?;
        let html = body
            .text
            .map(|t| t.body)
            .filter(|h| !h.trim().is_empty())
            .ok_or(FetchError::MissingField("parse.text"))?;

        Ok(ParsedPage {
            display_title: body.displaytitle.unwrap_or_else(|| body.title.clone()),
            title: body.title,
            html,
            links: body.links.into_iter().map(PageLink::from).collect(),
        })
    }
}
