use thiserror::Error;

/// Every way a single probe can end without a report.
///
/// The `Display` text of each variant is exactly what the reporter prints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    #[error("Url is not well formed: {0}")]
    MalformedUrl(String),

    #[error("Url scheme '{0}' is not supported")]
    UnsupportedScheme(String),

    #[error("DNS failed to resolve the url: {0}")]
    DnsResolutionFailure(String),

    #[error("Timeout")]
    Timeout,

    #[error("{0}")]
    NetworkError(String),

    #[error("{status} :: {description} :: {message}")]
    UnexpectedHttpFailure {
        status: u16,
        description: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            ProbeFailure::DnsResolutionFailure("http://nope.invalid/".into()).to_string(),
            "DNS failed to resolve the url: http://nope.invalid/"
        );
        assert_eq!(ProbeFailure::Timeout.to_string(), "Timeout");
        assert_eq!(
            ProbeFailure::UnsupportedScheme("https".into()).to_string(),
            "Url scheme 'https' is not supported"
        );
        assert_eq!(
            ProbeFailure::UnexpectedHttpFailure {
                status: 502,
                description: "Bad Gateway".into(),
                message: "upstream closed".into(),
            }
            .to_string(),
            "502 :: Bad Gateway :: upstream closed"
        );
    }
}
