//! db-relay - a single-shot database connector.
//!
//! Opens a fresh driver connection per query, backtick-quotes bare
//! identifiers in the caller's SQL, normalizes oversized integers in the
//! result set, and guarantees the connection is torn down on every exit
//! path.

pub mod config;
pub mod connector;
pub mod driver;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod rewrite;

pub use config::{Config, ConnectionProfile};
pub use connector::{Connector, QueryResult};
pub use driver::{Driver, DriverHandle, DriverRow, MySqlDriver};
pub use error::{RelayError, Result};
