//! Query-string parsing for request matchers.
//!
//! [`parse`] is the entry point used when a request pattern carries query
//! parameters. It groups bracket notation like any form decoder but keeps key
//! names verbatim, so `user.id=5` stays `user.id`. [`parse_standard`] exposes
//! the plain decoder with its legacy key renaming.

pub mod dotted;
pub mod form;
pub mod value;

pub use dotted::parse;
pub use form::parse as parse_standard;
pub use value::{to_query_string, QueryMap, QueryValue};
