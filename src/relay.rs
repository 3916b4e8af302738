//! Metrics Relay
//!
//! Forwards `/v1/metrics` to the configured upstream with the configured
//! `Authorization` header and streams the upstream response back unchanged.

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{AUTHORIZATION, TRANSFER_ENCODING},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use futures::TryStreamExt;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

use crate::server::AppState;

/// Path served by the relay and requested from the upstream.
pub const METRICS_PATH: &str = "/v1/metrics";

/// Normalize a configured upstream address into the metrics endpoint URL.
///
/// Addresses that already end in `/v1/metrics` are returned unchanged, so
/// normalizing twice is a no-op.
pub fn metrics_url(address: &str) -> String {
    if address.ends_with(METRICS_PATH) {
        address.to_string()
    } else if address.ends_with('/') {
        format!("{}{}", address, METRICS_PATH.trim_start_matches('/'))
    } else {
        format!("{}{}", address, METRICS_PATH)
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Error creating request: {0}")]
    BuildRequest(String),

    #[error("Error fetching metrics: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Relay handler for `/v1/metrics`. The inbound method, query and body are
/// ignored; every call is a fresh upstream `GET`.
pub async fn relay_metrics(State(state): State<AppState>) -> Result<Response, RelayError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("relay", %request_id);
    relay(&state, request_id).instrument(span).await
}

async fn relay(state: &AppState, request_id: Uuid) -> Result<Response, RelayError> {
    let target = metrics_url(&state.config.api_address);

    let url = Url::parse(&target).map_err(|e| {
        error!(target_url = %target, error = %e, "Invalid upstream address");
        RelayError::BuildRequest(e.to_string())
    })?;
    let token = HeaderValue::from_str(&state.config.api_token).map_err(|e| {
        error!(error = %e, "Upstream token is not a valid header value");
        RelayError::BuildRequest(e.to_string())
    })?;

    info!(target_url = %url, "Relaying metrics request");

    let upstream = state
        .http_client
        .get(url)
        .header(AUTHORIZATION, token)
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, "Error fetching metrics");
            RelayError::Upstream(e)
        })?;

    let status = upstream.status();
    debug!(status = %status, "Upstream responded");

    let mut headers = HeaderMap::with_capacity(upstream.headers().len());
    for (name, value) in upstream.headers() {
        // Body is re-framed on the way out.
        if name == TRANSFER_ENCODING {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    // The upstream response is owned by the body stream and dropped when the
    // stream ends or the caller goes away. Once the head is sent a failure
    // can only abort the connection.
    let body = upstream.bytes_stream().inspect_err(move |e| {
        warn!(%request_id, error = %e, "Error copying response body");
    });

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;

    Ok(response)
}
