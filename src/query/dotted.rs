//! Query-string parsing that keeps key names verbatim.
//!
//! The standard decoder in [`super::form`] renames `.` and spaces in key
//! names to `_`, which breaks request matchers for parameters such as
//! `user.id`. Parsing here runs in three passes:
//!
//! 1. **protect** - every key name (the text before `=`, `&` or the first
//!    `[`) is percent-decoded and replaced by its hex encoding,
//! 2. **delegate** - the protected string goes through the standard decoder,
//!    which builds nested structures from any bracket suffixes and leaves the
//!    hex names alone,
//! 3. **restore** - the top-level hex names are decoded back.
//!
//! Hex encoding is injective, so two different keys can never collide after
//! protection.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::form;
use super::value::QueryMap;
use crate::url::{decode_component, decode_component_bytes};

lazy_static! {
    /// Separator, key name, and the bracket suffix up to `=` or `&`.
    static ref KEY_SEGMENT: Regex = Regex::new(r"(^|&)([^=&\[]*)(\[[^=&]*)?").unwrap();
}

/// Parse a query string, keeping key names exactly as sent.
///
/// ```
/// use mockbridge::query::{parse, QueryValue};
///
/// let params = parse("user.id=5&tags[]=a&tags[]=b");
/// assert_eq!(params["user.id"], QueryValue::Text("5".to_string()));
/// assert_eq!(params["tags"].as_list().map(|t| t.len()), Some(2));
/// ```
pub fn parse(query: &str) -> QueryMap {
    let protected = protect(query);
    tracing::trace!(query, protected = %protected, "protected query keys");

    form::parse(&protected)
        .into_iter()
        .map(|(key, value)| (restore(&key), value))
        .collect()
}

fn protect(query: &str) -> String {
    KEY_SEGMENT
        .replace_all(query, |caps: &Captures| {
            let separator = &caps[1];
            let name = caps.get(2).map_or("", |m| m.as_str());
            match caps.get(3).map(|m| m.as_str()) {
                // Bracket notation: only the name is protected. The closing
                // bracket may arrive encoded, as the delegate decodes first.
                Some(suffix) if decode_component(suffix).contains(']') => {
                    format!("{}{}{}", separator, encode_key(name), suffix)
                }
                // A bracket that never closes is part of the name
                Some(suffix) => format!("{}{}", separator, encode_key(&format!("{name}{suffix}"))),
                None => format!("{}{}", separator, encode_key(name)),
            }
        })
        .into_owned()
}

fn encode_key(raw: &str) -> String {
    hex::encode(decode_component_bytes(raw))
}

fn restore(key: &str) -> String {
    match hex::decode(key) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::debug!(key, error = %e, "query key was not protected, keeping it as decoded");
            key.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryValue;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse_json(query: &str) -> serde_json::Value {
        serde_json::to_value(parse(query)).unwrap()
    }

    #[test]
    fn test_protect_plain_keys() {
        assert_eq!(protect("a=1&b.c=2"), "61=1&622e63=2");
    }

    #[test]
    fn test_protect_keeps_bracket_suffix() {
        assert_eq!(protect("a.b[0]=x"), "612e62[0]=x");
    }

    #[test]
    fn test_protect_decodes_before_encoding() {
        assert_eq!(protect("a%2Eb=1"), protect("a.b=1"));
        assert_eq!(protect("a+b=1"), protect("a b=1"));
    }

    #[test]
    fn test_protect_unclosed_bracket_whole_name() {
        assert_eq!(protect("a[b=1"), format!("{}=1", hex::encode("a[b")));
    }

    #[test]
    fn test_protect_leaves_values_alone() {
        assert_eq!(protect("a=x.y&b"), "61=x.y&62");
    }

    #[test]
    fn test_dotted_key_preserved() {
        assert_eq!(parse_json("user.id=5"), json!({"user.id": "5"}));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_flag_without_value() {
        assert_eq!(parse_json("flag"), json!({"flag": ""}));
    }

    #[test]
    fn test_multiple_dotted_keys() {
        assert_eq!(parse_json("a.b=1&c.d=2"), json!({"a.b": "1", "c.d": "2"}));
    }

    #[test]
    fn test_percent_encoded_dot() {
        assert_eq!(parse_json("user%2Eid=5"), json!({"user.id": "5"}));
    }

    #[test]
    fn test_dotted_key_with_list() {
        assert_eq!(parse_json("a.b[0]=x&a.b[1]=y"), json!({"a.b": ["x", "y"]}));
    }

    #[test]
    fn test_spaces_and_leading_space_kept() {
        assert_eq!(
            parse_json("first+name=x&%20lead=y"),
            json!({"first name": "x", " lead": "y"})
        );
    }

    #[test]
    fn test_encoded_reserved_characters_in_key() {
        assert_eq!(
            parse_json("a%26b=1&c%3Dd=2&e%5B0%5D=3"),
            json!({"a&b": "1", "c=d": "2", "e[0]": "3"})
        );
    }

    #[test]
    fn test_unclosed_bracket_key_kept() {
        assert_eq!(parse_json("a[b.c=1"), json!({"a[b.c": "1"}));
    }

    #[test]
    fn test_encoded_closing_bracket_still_nests() {
        assert_eq!(protect("a.b[c%5D=1"), "612e62[c%5D=1");
        assert_eq!(parse_json("a.b[c%5D=1"), json!({"a.b": {"c": "1"}}));
        assert_eq!(
            serde_json::to_value(form::parse("ab[c%5D=1")).unwrap(),
            json!({"ab": {"c": "1"}})
        );
    }

    #[test]
    fn test_values_decoded_like_standard() {
        let query = "a=x+y%2Fz&b=%zz&c=%E2%9C%93";
        let dotted = parse(query);
        let standard = form::parse(query);
        assert_eq!(dotted, standard);
        assert_eq!(dotted["c"], QueryValue::Text("✓".to_string()));
    }

    #[test]
    fn test_duplicates_follow_standard_rules() {
        assert_eq!(parse_json("a.b=1&a.b=2"), json!({"a.b": "2"}));
        assert_eq!(parse_json("a.b[]=1&a.b[]=2"), json!({"a.b": ["1", "2"]}));
    }

    #[test]
    fn test_nested_map_under_dotted_key() {
        assert_eq!(
            parse_json("filter.by[name]=x&filter.by[age][min]=3"),
            json!({"filter.by": {"name": "x", "age": {"min": "3"}}})
        );
    }

    #[test]
    fn test_empty_names_dropped() {
        assert_eq!(parse_json("=1&[0]=2&&ok=3"), json!({"ok": "3"}));
    }

    #[test]
    fn test_non_utf8_key_is_lossy() {
        let map = parse("%FF=1");
        assert_eq!(map.keys().next().map(String::as_str), Some("\u{FFFD}"));
    }

    #[test]
    fn test_restore_falls_back_for_non_hex() {
        assert_eq!(restore("6162"), "ab");
        assert_eq!(restore("not-hex"), "not-hex");
    }
}
