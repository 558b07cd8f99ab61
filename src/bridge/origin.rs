//! Origin guard - rejects cross-document messages from any origin other than
//! the host's own.
//!
//! Comparison is on the `(scheme, host, port)` tuple from [`url::Url::origin`],
//! so `https://example.com:443` and `https://example.com` are the same origin.

use url::{Origin, Url};

/// Tuple origin of an absolute URL. Paths are ignored; opaque origins
/// (`null`, `data:`, ..) and URLs carrying credentials never match.
pub fn parse_origin(input: &str) -> Option<Origin> {
    let url = Url::parse(input.trim()).ok()?;
    if !url.username().is_empty() || url.password().is_some() {
        return None;
    }
    let origin = url.origin();
    origin.is_tuple().then_some(origin)
}

/// Predicate applied by every message handler before decoding
#[derive(Debug, Clone)]
pub struct OriginGuard {
    expected: Option<Origin>,
}

impl OriginGuard {
    /// Guard for the given host origin. An unparseable origin rejects everything.
    pub fn new(host_origin: &str) -> Self {
        let expected = parse_origin(host_origin);
        if expected.is_none() {
            tracing::warn!(
                target: "bridge",
                "Host origin {:?} is not a valid origin; all bridge messages will be dropped",
                host_origin
            );
        }
        Self { expected }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match (&self.expected, parse_origin(origin)) {
            (Some(expected), Some(actual)) => *expected == actual,
            _ => false,
        }
    }

    /// The exact origin outbound messages must target
    pub fn target_origin(&self) -> Option<String> {
        self.expected.as_ref().map(Origin::ascii_serialization)
    }
}
