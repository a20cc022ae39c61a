use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::error::ProbeFailure;
use crate::util::has_known_scheme;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const USER_AGENT: &str = concat!("urlchecker/", env!("CARGO_PKG_VERSION"));

/// Schemes that are left alone when deciding whether to prepend `http://`.
pub const KNOWN_SCHEMES: &[&str] = &[
    "http", "https", "ftp", "file", "gopher", "nntp", "news", "mailto", "uuid", "telnet", "ldap",
    "net.tcp", "net.pipe", "vsmacros",
];

pub const USAGE: &str = "urlchecker is a command-line utility that checks if a url is valid and what HTTP headers it returns.
Usage: urlchecker <AbsoluteUrl> [Timeout]
\t- <AbsoluteUrl> - required - the url to be checked
\t- [Timeout] - optional - the amount of time (in seconds) to wait for the request to complete (not including DNS resolution)";

/// A validated probe target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    url: Url,
    timeout_secs: u64,
}

impl ProbeRequest {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No arguments were given.
    ShowUsage,
    Probe(ProbeRequest),
}

/// Turns raw positional arguments into a probe request.
///
/// Only the first two arguments are looked at. A bad timeout never fails
/// resolution; it just leaves the default in place.
pub fn resolve(args: &[String]) -> Result<Resolution, ProbeFailure> {
    let Some(raw_url) = args.first() else {
        return Ok(Resolution::ShowUsage);
    };

    let candidate = if has_known_scheme(raw_url) {
        raw_url.clone()
    } else {
        format!("http://{raw_url}")
    };

    let url = Url::parse(&candidate).map_err(|e| {
        debug!("failed to parse {candidate}: {e}");
        ProbeFailure::MalformedUrl(candidate.clone())
    })?;

    if url.scheme() != "http" {
        return Err(ProbeFailure::UnsupportedScheme(url.scheme().to_string()));
    }

    let timeout_secs = args
        .get(1)
        .map(|raw| parse_timeout(raw))
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    debug!("resolved {url} with timeout {timeout_secs}s");
    Ok(Resolution::Probe(ProbeRequest { url, timeout_secs }))
}

fn parse_timeout(raw: &str) -> u64 {
    match raw.trim().parse::<i64>() {
        Ok(secs) if secs > 0 => secs as u64,
        Ok(secs) => {
            warn!("timeout of {secs}s is not positive, using {DEFAULT_TIMEOUT_SECS}s");
            DEFAULT_TIMEOUT_SECS
        }
        // Not a number at all: fall back without complaint.
        Err(e) => {
            debug!("ignoring timeout {raw:?} ({e}), using {DEFAULT_TIMEOUT_SECS}s");
            DEFAULT_TIMEOUT_SECS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn probe(list: &[&str]) -> ProbeRequest {
        match resolve(&args(list)) {
            Ok(Resolution::Probe(req)) => req,
            other => panic!("expected a probe request, got {other:?}"),
        }
    }

    #[test]
    fn test_no_arguments_shows_usage() {
        assert_eq!(resolve(&[]), Ok(Resolution::ShowUsage));
    }

    #[test]
    fn test_missing_scheme_gets_http_prefix() {
        let req = probe(&["example.com/status?x=1"]);
        assert_eq!(req.url().scheme(), "http");
        assert_eq!(req.url().as_str(), "http://example.com/status?x=1");
    }

    #[test]
    fn test_bare_host_gets_root_path() {
        let req = probe(&["example.com"]);
        assert_eq!(req.url().as_str(), "http://example.com/");
    }

    #[test]
    fn test_uppercase_http_scheme_is_accepted() {
        let req = probe(&["HTTP://Example.com/a"]);
        assert_eq!(req.url().scheme(), "http");
        assert_eq!(req.url().host_str(), Some("example.com"));
    }

    #[test]
    fn test_https_is_rejected() {
        assert_eq!(
            resolve(&args(&["https://example.com"])),
            Err(ProbeFailure::UnsupportedScheme("https".into()))
        );
    }

    #[test]
    fn test_other_known_schemes_are_rejected() {
        for (input, scheme) in [
            ("ftp://files.example.com/a.txt", "ftp"),
            ("FILE:///etc/hosts", "file"),
            ("ldap://directory.example.com", "ldap"),
            ("net.tcp://host:808/service", "net.tcp"),
        ] {
            assert_eq!(
                resolve(&args(&[input])),
                Err(ProbeFailure::UnsupportedScheme(scheme.into())),
                "input {input}"
            );
        }
    }

    #[test]
    fn test_malformed_url() {
        assert_eq!(
            resolve(&args(&["http://"])),
            Err(ProbeFailure::MalformedUrl("http://".into()))
        );
        assert_eq!(
            resolve(&args(&["exa mple.com"])),
            Err(ProbeFailure::MalformedUrl("http://exa mple.com".into()))
        );
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(probe(&["example.com"]).timeout_secs(), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_explicit_timeout() {
        let req = probe(&["example.com", "3"]);
        assert_eq!(req.timeout_secs(), 3);
        assert_eq!(req.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_unparseable_timeout_falls_back_to_default() {
        for raw in ["abc", "", "1.5", "99999999999999999999"] {
            assert_eq!(
                probe(&["example.com", raw]).timeout_secs(),
                DEFAULT_TIMEOUT_SECS,
                "timeout argument {raw:?}"
            );
        }
    }

    #[test]
    fn test_non_positive_timeout_falls_back_to_default() {
        assert_eq!(parse_timeout("0"), DEFAULT_TIMEOUT_SECS);
        assert_eq!(parse_timeout("-4"), DEFAULT_TIMEOUT_SECS);
        assert_eq!(parse_timeout(" 7 "), 7);
        assert_eq!(probe(&["example.com", "-4"]).timeout_secs(), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let req = probe(&["example.com", "5", "whatever"]);
        assert_eq!(req.timeout_secs(), 5);
    }

    #[test]
    fn test_usage_mentions_both_arguments() {
        assert!(USAGE.contains("<AbsoluteUrl>"));
        assert!(USAGE.contains("[Timeout]"));
    }
}
