use std::future::Future;

use axum::body::Bytes;
use reqwest::Url;
use serde::de::IgnoredAny;

use crate::config::Credentials;
use crate::error::{FETCH_FALLBACK_MESSAGE, ProxyError};

pub const PROJECT_HEADER: &str = "x-appwrite-project";
pub const FALLBACK_COOKIES_HEADER: &str = "x-fallback-cookies";

/// One validated search, ready to be sent upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub query: String,
    pub tld: Option<String>,
}

impl UpstreamRequest {
    pub fn new(query: impl Into<String>, tld: Option<String>) -> Self {
        Self {
            query: query.into(),
            tld: tld.filter(|t| !t.is_empty()),
        }
    }

    pub fn url(&self, base_url: &str) -> Result<Url, ProxyError> {
        let mut url = Url::parse(base_url)
            .map_err(|e| ProxyError::Upstream(format!("Invalid upstream URL: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", &self.query);
            pairs.append_pair("filterType", "suggestion");
            if let Some(tld) = &self.tld {
                pairs.append_pair("tlds[]", tld);
            }
        }
        Ok(url)
    }
}

/// The third-party suggestion service. Returns the raw JSON body on success.
pub trait SuggestionUpstream: Send + Sync + 'static {
    fn fetch(
        &self,
        request: &UpstreamRequest,
        credentials: Credentials<'_>,
    ) -> impl Future<Output = Result<Bytes, ProxyError>> + Send;
}

pub struct HttpUpstream {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUpstream {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SuggestionUpstream for HttpUpstream {
    async fn fetch(
        &self,
        request: &UpstreamRequest,
        credentials: Credentials<'_>,
    ) -> Result<Bytes, ProxyError> {
        let url = request.url(&self.base_url)?;

        log::info!(
            "Fetching domains with project ID: {}",
            credentials.project_id
        );

        let res = self
            .client
            .get(url)
            .header(PROJECT_HEADER, credentials.project_id)
            .header(FALLBACK_COOKIES_HEADER, credentials.fallback_cookie)
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if !status.is_success() {
            // best effort, the status alone is still worth reporting
            let body = res.text().await.unwrap_or_default();
            log::error!("upstream API error: {} {}", status.as_u16(), body);
            return Err(ProxyError::Upstream(format!(
                "API error: {} - {}",
                status.as_u16(),
                body
            )));
        }

        let body = res.bytes().await.map_err(transport_error)?;
        if let Err(e) = serde_json::from_slice::<IgnoredAny>(&body) {
            log::error!("upstream returned a non-JSON body: {:#}", e);
            return Err(ProxyError::Upstream(format!(
                "Invalid upstream response: {e}"
            )));
        }

        Ok(body)
    }
}

fn transport_error(e: reqwest::Error) -> ProxyError {
    log::error!("domain search error: {:#}", e);
    let message = e.to_string();
    if message.is_empty() {
        ProxyError::Upstream(FETCH_FALLBACK_MESSAGE.to_string())
    } else {
        ProxyError::Upstream(message)
    }
}

#[test]
fn test_upstream_url_without_tld() {
    let req = UpstreamRequest::new("chiragaggarwal", Some(String::new()));
    let url = req
        .url("https://cloud.appwrite.io/v1/domains/suggestions")
        .unwrap();
    assert_eq!(url.path(), "/v1/domains/suggestions");
    assert_eq!(url.query(), Some("query=chiragaggarwal&filterType=suggestion"));
}

#[test]
fn test_upstream_url_with_tld() {
    let req = UpstreamRequest::new("my site", Some("io".to_string()));
    let url = req.url("http://localhost:9999/suggest").unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("query".to_string(), "my site".to_string()),
            ("filterType".to_string(), "suggestion".to_string()),
            ("tlds[]".to_string(), "io".to_string()),
        ]
    );
}

#[test]
fn test_upstream_url_rejects_bad_base() {
    let req = UpstreamRequest::new("abc", None);
    assert!(matches!(
        req.url("not a url"),
        Err(ProxyError::Upstream(_))
    ));
}
