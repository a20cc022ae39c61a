use reqwest::StatusCode;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ProbeRequest;
use crate::error::ProbeFailure;

pub mod http;

/// What the transport hands back once response headers have arrived.
///
/// Headers are raw: in arrival order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResponse {
    pub url: Url,
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Dns,
    Timeout,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The client refused an HTTP error status. The response, when present,
    /// is still a valid probe outcome.
    #[error("{message}")]
    Status {
        status: u16,
        description: String,
        message: String,
        response: Option<HeadResponse>,
    },

    /// Nothing came back from the server.
    #[error("{message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },
}

/// Sends one HEAD request for a probe.
pub trait Transport {
    fn head(
        &self,
        request: &ProbeRequest,
    ) -> impl Future<Output = Result<HeadResponse, TransportError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub original_url: Url,
    pub response_url: Url,
    pub status: u16,
    /// Names keep the position of their first occurrence and the value of the last.
    pub headers: Vec<(String, String)>,
    /// `None` when the server sent no usable `Content-Length`.
    pub content_length: Option<u64>,
    pub server: Option<String>,
    pub elapsed_ms: u64,
    pub from_cache: bool,
}

impl ProbeResult {
    pub fn from_response(original_url: Url, response: HeadResponse, elapsed_ms: u64) -> Self {
        let headers = collapse_headers(response.headers);
        let content_length =
            header_value(&headers, "content-length").and_then(|v| v.trim().parse::<u64>().ok());
        let server = header_value(&headers, "server").map(str::to_string);

        ProbeResult {
            original_url,
            response_url: response.url,
            status: response.status,
            headers,
            content_length,
            server,
            elapsed_ms,
            from_cache: false,
        }
    }

    /// Canonical reason phrase for the status code, empty when there is none.
    pub fn status_text(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
    }
}

fn collapse_headers(raw: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::with_capacity(raw.len());
    for (name, value) in raw {
        match headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => headers.push((name, value)),
        }
    }
    headers
}

fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Runs a single probe. HTTP error statuses come back as results; only
/// transport problems become failures.
pub async fn run<T: Transport>(
    transport: &T,
    request: &ProbeRequest,
) -> Result<ProbeResult, ProbeFailure> {
    let url = request.url().clone();
    debug!("HEAD {url} (timeout {}s)", request.timeout_secs());

    let start = Instant::now();
    let outcome = transport.head(request).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(response) => {
            info!("{url} answered {} in {elapsed_ms}ms", response.status);
            Ok(ProbeResult::from_response(url, response, elapsed_ms))
        }
        Err(TransportError::Status {
            response: Some(response),
            ..
        }) => {
            info!("{url} answered error status {} in {elapsed_ms}ms", response.status);
            Ok(ProbeResult::from_response(url, response, elapsed_ms))
        }
        Err(TransportError::Status {
            status,
            description,
            message,
            response: None,
        }) => {
            warn!("{url} reported status {status} without a response");
            Err(ProbeFailure::UnexpectedHttpFailure {
                status,
                description,
                message,
            })
        }
        Err(TransportError::Network { kind, message }) => {
            warn!("{url} failed after {elapsed_ms}ms: {message}");
            Err(match kind {
                NetworkErrorKind::Dns => ProbeFailure::DnsResolutionFailure(url.to_string()),
                NetworkErrorKind::Timeout => ProbeFailure::Timeout,
                NetworkErrorKind::Other => ProbeFailure::NetworkError(message),
            })
        }
    }
}
