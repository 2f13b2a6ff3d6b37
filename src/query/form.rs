//! Standard form decoding.
//!
//! This is the classic `application/x-www-form-urlencoded` decoder with the
//! legacy variable-naming rules: spaces and dots in a key name become `_`,
//! and bracket suffixes (`a[b]`, `a[]`) build nested structures. The dotted
//! parser in [`super::dotted`] reuses it for the grouping and shields keys
//! from the renaming.

use super::value::{QueryMap, QueryValue};
use crate::url::decode_component;

/// Keys nested deeper than this are dropped entirely.
pub const MAX_NESTING: usize = 64;

/// Parse a query string with the standard form-decoding rules.
///
/// Never fails: empty segments are skipped, segments without `=` get an
/// empty value and invalid percent escapes stay literal.
pub fn parse(query: &str) -> QueryMap {
    let mut root = QueryMap::new();

    for segment in query.split('&') {
        if segment.is_empty() {
            continue;
        }

        let (raw_key, raw_value) = segment.split_once('=').unwrap_or((segment, ""));
        let key = decode_component(raw_key);
        let value = decode_component(raw_value);

        match split_key(&key) {
            Some((name, indices)) => insert_path(&mut root, name, &indices, value),
            None => tracing::trace!(key = %key, "dropping query segment with unusable key"),
        }
    }

    root.into_iter().map(|(k, v)| (k, into_lists(v))).collect()
}

/// Split a decoded key into its sanitized name and bracket indices.
///
/// `None` in the index list stands for `[]` (append). Returns `None` when
/// the segment must be dropped.
fn split_key(key: &str) -> Option<(String, Vec<Option<String>>)> {
    let key = key.trim_start_matches(' ');

    let mut name = String::new();
    let mut bracket_at = None;
    for (i, c) in key.char_indices() {
        match c {
            ' ' | '.' => name.push('_'),
            '[' => {
                bracket_at = Some(i);
                break;
            }
            _ => name.push(c),
        }
    }

    if name.is_empty() {
        return None;
    }

    let mut indices = Vec::new();
    let Some(start) = bracket_at else {
        return Some((name, indices));
    };

    // Invariant: `rest` starts with '['
    let mut rest = &key[start..];
    loop {
        let inner = &rest[1..];
        match inner.find(']') {
            Some(close) => {
                let index = &inner[..close];
                indices.push(if index.is_empty() {
                    None
                } else {
                    Some(index.to_string())
                });
                rest = &inner[close + 1..];
                if !rest.starts_with('[') {
                    break;
                }
            }
            None => {
                if indices.is_empty() {
                    // Not an index: only the bracket itself is renamed
                    name.push('_');
                    name.push_str(inner);
                }
                break;
            }
        }
    }

    if indices.len() > MAX_NESTING {
        return None;
    }

    Some((name, indices))
}

fn insert_path(target: &mut QueryMap, key: String, indices: &[Option<String>], value: String) {
    match indices.split_first() {
        None => {
            target.insert(key, QueryValue::Text(value));
        }
        Some((next, rest)) => {
            let slot = target
                .entry(key)
                .or_insert_with(|| QueryValue::Map(QueryMap::new()));
            if !matches!(slot, QueryValue::Map(_)) {
                *slot = QueryValue::Map(QueryMap::new());
            }
            if let QueryValue::Map(child) = slot {
                let child_key = match next {
                    Some(index) => index.clone(),
                    None => next_index(child).to_string(),
                };
                insert_path(child, child_key, rest, value);
            }
        }
    }
}

/// One past the greatest integer key, never below zero.
///
/// Negative keys do not move the start: `a[-5]=x&a[]=y` appends at `0`, the
/// classic rule, not at `-4` as newer decoders do.
fn next_index(map: &QueryMap) -> i64 {
    map.keys()
        .filter_map(|k| integer_key(k))
        .map(|k| k.saturating_add(1))
        .max()
        .unwrap_or(0)
        .max(0)
}

/// Canonical decimal integers only: `"0"`, `"12"`, `"-3"`; not `"01"` or `"+1"`.
fn integer_key(key: &str) -> Option<i64> {
    let digits = key.strip_prefix('-').unwrap_or(key);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if key == "-0" {
        return None;
    }
    key.parse().ok()
}

/// Present nested maps keyed exactly `"0".."n-1"` as lists.
fn into_lists(value: QueryValue) -> QueryValue {
    match value {
        QueryValue::Map(map) => {
            let sequential = map.keys().enumerate().all(|(i, k)| *k == i.to_string());
            if sequential {
                QueryValue::List(map.into_values().map(into_lists).collect())
            } else {
                QueryValue::Map(map.into_iter().map(|(k, v)| (k, into_lists(v))).collect())
            }
        }
        other => other,
    }
}
