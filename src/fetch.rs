//! Page fetcher: one request, full body as text
//!
//! Each call builds its own client and drops it before returning, so no
//! connection pool outlives the request on either the success or error path.

use crate::error::{LinktreeError, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

/// Issue a single request and read the whole response body.
///
/// `body`, when present, is sent as JSON. Non-success statuses are failures.
/// No retries.
pub async fn fetch(
    url: &str,
    method: Method,
    headers: &[(&str, &str)],
    body: Option<&Value>,
) -> Result<String> {
    let fetch_err = |source: reqwest::Error| LinktreeError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder().build().map_err(fetch_err)?;

    let mut request = client.request(method.clone(), url);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    if let Some(body) = body {
        request = request.json(body);
    }

    debug!(%method, url, "sending request");
    let response = request.send().await.map_err(fetch_err)?;
    let status = response.status();
    let response = response.error_for_status().map_err(fetch_err)?;
    let text = response.text().await.map_err(fetch_err)?;
    debug!(%status, len = text.len(), url, "response received");

    Ok(text)
}

/// GET a page with no extra headers
pub async fn get_text(url: &str) -> Result<String> {
    fetch(url, Method::GET, &[], None).await
}
