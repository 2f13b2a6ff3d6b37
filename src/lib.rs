//! mockbridge
//!
//! Support code for behavior-driven tests that drive an external mock HTTP
//! server: query-string parsing that keeps dotted parameter names intact,
//! fixture bodies for canned responses, and per-scenario reset state.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod query;
pub mod scenario;
pub mod url;

pub use error::{BridgeError, Result};
pub use fixtures::FixtureLoader;
pub use query::{parse as parse_query, QueryMap, QueryValue};
pub use scenario::ScenarioState;
pub use url::RequestTarget;
