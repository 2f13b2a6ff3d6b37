//! Request targets and percent-encoding helpers.

use serde::Serialize;

use crate::query::{self, QueryMap};

/// Percent-encode a single component (everything but `A-Z a-z 0-9 - _ . ~`).
pub fn encode_component(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Form-decode a single component to raw bytes.
///
/// `+` becomes a space. Escapes that are not two hex digits are kept
/// literally, so decoding never fails.
pub fn decode_component_bytes(s: &str) -> Vec<u8> {
    let spaced = s.replace('+', " ");
    urlencoding::decode_binary(spaced.as_bytes()).into_owned()
}

/// Form-decode a single component, replacing invalid UTF-8.
pub fn decode_component(s: &str) -> String {
    String::from_utf8_lossy(&decode_component_bytes(s)).into_owned()
}

/// A request URL or origin-form path split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    pub path: String,
    /// Raw query, without the leading `?`
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl RequestTarget {
    /// Split `http://host:1080/users?id=1#top` or `/users?id=1`.
    pub fn parse(target: &str) -> Self {
        let target = target.trim();

        let (scheme, rest) = match target.find("://") {
            Some(pos) => (Some(target[..pos].to_string()), &target[pos + 3..]),
            None => (None, target),
        };

        let (rest, fragment) = match rest.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (rest, None),
        };

        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query.to_string())),
            None => (rest, None),
        };

        let (authority, path) = if scheme.is_some() {
            match rest.find('/') {
                Some(pos) => (Some(rest[..pos].to_string()), &rest[pos..]),
                None => (Some(rest.to_string()), ""),
            }
        } else {
            (None, rest)
        };

        let path = if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        };

        RequestTarget {
            scheme,
            authority,
            path,
            query,
            fragment,
        }
    }

    /// Query parameters with key names kept verbatim.
    pub fn query_params(&self) -> QueryMap {
        self.query.as_deref().map(query::parse).unwrap_or_default()
    }
}
