use axum::{
    extract::{RawQuery, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::error::ProxyError;
use crate::upstream::{SuggestionUpstream, UpstreamRequest};

use super::ProxyState;
use super::models::DomainsParams;

pub const MISSING_QUERY_MESSAGE: &str = "Query parameter is required";

/// Forwards one search to the upstream service with the server-held
/// credentials attached, relaying the upstream JSON untouched.
pub async fn domains_handler<U: SuggestionUpstream>(
    State(state): State<Arc<ProxyState<U>>>,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse, ProxyError> {
    let params = DomainsParams::from_query(raw.as_deref());
    let query = match params.query {
        Some(q) if !q.is_empty() => q,
        _ => return Err(ProxyError::InvalidRequest(MISSING_QUERY_MESSAGE.to_string())),
    };

    // must fail before anything goes out
    let credentials = state.config.credentials()?;

    let request = UpstreamRequest::new(query, params.tld);
    let body = state.upstream.fetch(&request, credentials).await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

pub async fn health_handler() -> &'static str {
    "ok"
}
