//! Request plumbing shared by the provider adapters.

use super::{CancelToken, FetchError, ProviderKind};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

/// Send a `GET` request asking for JSON, racing it against cancellation.
///
/// Only transport failures are reported here; HTTP status classification is up
/// to the caller since each provider treats statuses differently.
pub(super) async fn send(client: &Client, url: &str, provider: ProviderKind, cancel: &CancelToken) -> Result<Response, FetchError> {
    // the upstream services answer browser-like requests with HTML
    let request = client.get(url).header(ACCEPT, "application/json");

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(FetchError::Cancelled { provider }),
        result = request.send() => result.map_err(|e| FetchError::transport(provider, &e.without_url())),
    }
}

/// Read and parse the body of a successful response.
pub(super) async fn read_json(response: Response, provider: ProviderKind, cancel: &CancelToken) -> Result<Value, FetchError> {
    let text = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(FetchError::Cancelled { provider }),
        result = response.text() => result.map_err(|e| FetchError::transport(provider, &e.without_url()))?,
    };

    serde_json::from_str(&text).map_err(|e| FetchError::schema(provider, format!("body is not valid JSON: {e}")))
}

/// The reason phrase for a status, for error messages.
pub(super) fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown Status").to_string()
}

/// The generic classification of an unsuccessful status.
pub(super) fn upstream_error(provider: ProviderKind, status: StatusCode) -> FetchError {
    FetchError::Upstream {
        provider,
        status: status.as_u16(),
        status_text: status_text(status),
    }
}
