use std::future::Future;

use reqwest::Url;

use crate::error::{ClientFetchError, FETCH_FALLBACK_MESSAGE};
use crate::models::{ErrorBody, SearchResult};

/// Something that answers a search, normally the proxy over HTTP.
pub trait SuggestionSource: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
        tld: Option<&str>,
    ) -> impl Future<Output = Result<SearchResult, ClientFetchError>> + Send;
}

/// Talks to `GET /api/domains` on a running proxy.
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn domains_url(&self, query: &str, tld: Option<&str>) -> Result<Url, ClientFetchError> {
        let endpoint = format!("{}/api/domains", self.base_url.trim_end_matches('/'));
        let mut url =
            Url::parse(&endpoint).map_err(|e| ClientFetchError::Transport(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            if let Some(tld) = tld.filter(|t| !t.is_empty()) {
                pairs.append_pair("tld", tld);
            }
        }
        Ok(url)
    }
}

impl SuggestionSource for ProxyClient {
    async fn search(
        &self,
        query: &str,
        tld: Option<&str>,
    ) -> Result<SearchResult, ClientFetchError> {
        let url = self.domains_url(query, tld)?;
        let res = self.client.get(url).send().await.map_err(|e| {
            let message = e.to_string();
            if message.is_empty() {
                ClientFetchError::Transport(FETCH_FALLBACK_MESSAGE.to_string())
            } else {
                ClientFetchError::Transport(message)
            }
        })?;

        let status = res.status();
        if !status.is_success() {
            let message = res
                .json::<ErrorBody>()
                .await
                .ok()
                .map(|body| body.error)
                .filter(|error| !error.is_empty())
                .unwrap_or_else(|| format!("API error: {}", status.as_u16()));
            return Err(ClientFetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        res.json::<SearchResult>()
            .await
            .map_err(|e| ClientFetchError::Malformed(format!("Malformed response: {e}")))
    }
}
