use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use reqwest::{Client, ClientBuilder, Response, redirect};
use tracing::debug;
use url::Host;

use super::{HeadResponse, NetworkErrorKind, Transport, TransportError};
use crate::config::{ProbeRequest, USER_AGENT};
use crate::util::{error_chain, title_case_header};

/// Turns a host name into socket addresses before any timeout starts.
pub trait HostResolver {
    fn lookup(
        &self,
        host: &str,
        port: u16,
    ) -> impl Future<Output = io::Result<Vec<SocketAddr>>> + Send;
}

/// The platform resolver, through tokio's blocking `getaddrinfo` pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    async fn lookup(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        Ok(tokio::net::lookup_host((host, port)).await?.collect())
    }
}

/// HEAD requests over reqwest: no redirects, no pooling, no caching.
///
/// The host is resolved up front and pinned into the client, so `timeout`
/// only bounds the TCP connect and each read while waiting for the response.
pub struct ReqwestTransport<R = SystemResolver> {
    timeout: Duration,
    resolver: R,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        Self::with_resolver(timeout, SystemResolver)
    }

    pub fn for_request(request: &ProbeRequest) -> Self {
        Self::new(request.timeout())
    }
}

impl<R: HostResolver> ReqwestTransport<R> {
    pub fn with_resolver(timeout: Duration, resolver: R) -> Self {
        ReqwestTransport { timeout, resolver }
    }

    fn client_builder(&self) -> ClientBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .connect_timeout(self.timeout)
            .read_timeout(self.timeout)
            .pool_max_idle_per_host(0)
    }

    async fn build_client(&self, request: &ProbeRequest) -> Result<Client, TransportError> {
        let url = request.url();

        // IP literals need no lookup.
        let pinned = match url.host() {
            Some(Host::Domain(domain)) => {
                let port = url.port_or_known_default().unwrap_or(80);
                let addrs = self
                    .resolver
                    .lookup(domain, port)
                    .await
                    .map_err(|e| TransportError::Network {
                        kind: NetworkErrorKind::Dns,
                        message: error_chain(&e),
                    })?;
                if addrs.is_empty() {
                    return Err(TransportError::Network {
                        kind: NetworkErrorKind::Dns,
                        message: format!("no addresses found for {domain}"),
                    });
                }
                debug!("{domain} resolved to {addrs:?}");
                Some((domain, addrs))
            }
            _ => None,
        };

        let mut builder = self.client_builder();
        if let Some((domain, addrs)) = pinned {
            builder = builder.resolve_to_addrs(domain, &addrs);
        }
        builder.build().map_err(|e| TransportError::Network {
            kind: NetworkErrorKind::Other,
            message: error_chain(&e),
        })
    }
}

impl<R: HostResolver + Sync> Transport for ReqwestTransport<R> {
    async fn head(&self, request: &ProbeRequest) -> Result<HeadResponse, TransportError> {
        let client = self.build_client(request).await?;
        let resp = client
            .head(request.url().clone())
            .send()
            .await
            .map_err(classify)?;

        let head = to_head_response(&resp);
        debug!("received {} headers from {}", head.headers.len(), head.url);

        match resp.error_for_status_ref() {
            Ok(_) => Ok(head),
            Err(e) => Err(TransportError::Status {
                status: head.status,
                description: resp.status().canonical_reason().unwrap_or("").to_string(),
                message: e.to_string(),
                response: Some(head),
            }),
        }
    }
}

fn to_head_response(resp: &Response) -> HeadResponse {
    let headers = resp
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                title_case_header(name.as_str()),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    HeadResponse {
        url: resp.url().clone(),
        status: resp.status().as_u16(),
        headers,
    }
}

/// Name resolution already happened, so a failed send is either a timeout
/// or some other connection problem.
fn classify(err: reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        NetworkErrorKind::Timeout
    } else {
        NetworkErrorKind::Other
    };
    debug!("request failed ({kind:?}): {err:?}");

    TransportError::Network {
        kind,
        message: error_chain(&err),
    }
}
