// Small string helpers shared by the resolver, the transport and the reporter.

use std::error::Error;
use std::fmt::Write;

use crate::config::KNOWN_SCHEMES;

/// True when `s` starts with `<scheme>://` for one of the known schemes, ignoring case.
pub fn has_known_scheme(s: &str) -> bool {
    KNOWN_SCHEMES.iter().any(|scheme| {
        let name_matches = s
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme));
        name_matches && s.get(scheme.len()..scheme.len() + 3) == Some("://")
    })
}

/// Header name segments whose registered spelling is not plain title case.
const IRREGULAR_SEGMENTS: &[&str] = &[
    "ETag", "WWW", "XSS", "MD5", "DNT", "TE", "UA", "ID", "HTTP2", "IM", "CH", "DNS",
];

/// `content-length` -> `Content-Length`, `etag` -> `ETag`.
///
/// The HTTP stack hands header names back lowercased, so the original casing
/// is gone. Each `-` separated segment is title cased unless it has a known
/// irregular spelling.
pub fn title_case_header(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            if let Some(known) = IRREGULAR_SEGMENTS
                .iter()
                .find(|known| known.eq_ignore_ascii_case(segment))
            {
                return known.to_string();
            }
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Renders an error together with its whole `source()` chain.
pub fn error_chain(mut err: &(dyn Error + 'static)) -> String {
    let mut s = err.to_string();
    while let Some(src) = err.source() {
        let _ = write!(s, "\n\nCaused by: {}", src);
        err = src;
    }
    s
}
