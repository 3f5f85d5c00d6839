// Remote lookup: build the request URL from a template, fetch it, and map the
// endpoint's `{ items: [{ login, id }] }` body into results.

use crate::{
    search::{ResultValue, SearchResult},
    utils::{FmtError, starts_with_ignore_case},
};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Token in the URL template that is replaced by the query.
pub const QUERY_PLACEHOLDER: &str = "${query}";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<RemoteItem>,
}

#[derive(Debug, Deserialize)]
struct RemoteItem {
    login: String,
    id: Value,
}

/// The URL to request for `query`, or None when the query is empty (no
/// request is made for it). Only the first placeholder is substituted and the
/// query is inserted as-is, without percent-encoding.
pub fn request_url(template: &str, query: &str) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    Some(template.replacen(QUERY_PLACEHOLDER, query, 1))
}

/// Parse a response body and keep the items whose login starts with `query`
/// (ignoring case).
pub fn parse_response(body: &str, query: &str) -> Result<Vec<SearchResult>> {
    let response: SearchResponse =
        serde_json::from_str(body).context("unexpected response shape")?;
    Ok(response
        .items
        .into_iter()
        .map(|item| SearchResult {
            text: item.login,
            value: ResultValue::Remote(item.id),
        })
        .filter(|result| starts_with_ignore_case(&result.text, query))
        .collect())
}

/// Resolve `query` against the endpoint described by `template`.
pub async fn fetch_results(template: &str, query: &str) -> Result<Vec<SearchResult>> {
    let Some(url) = request_url(template, query) else {
        return Ok(Vec::new());
    };

    let window = web_sys::window().context("no window")?;
    let response = JsFuture::from(window.fetch_with_str(&url))
        .await
        .fmt_err()?
        .dyn_into::<web_sys::Response>()
        .fmt_err()?;
    if !response.ok() {
        bail!("GET {url} failed with status {}", response.status());
    }

    let body = JsFuture::from(response.text().fmt_err()?)
        .await
        .fmt_err()?
        .as_string()
        .context("response body is not text")?;

    parse_response(&body, query)
}
