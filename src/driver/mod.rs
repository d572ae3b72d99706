//! Driver abstraction layer for db-relay.
//!
//! Provides a trait-based interface over driver-manager style backends,
//! allowing different drivers to be used interchangeably. The relay treats
//! a driver as an opaque capability: open a connection from a descriptor,
//! run a query against the handle, close the handle.

mod mock;
mod mysql;

pub use mock::{FailingDriver, MockDriver};
pub use mysql::MySqlDriver;

use crate::error::Result;
use async_trait::async_trait;

/// A single row as returned by a driver: column name to JSON value,
/// in result-set column order.
pub type DriverRow = serde_json::Map<String, serde_json::Value>;

/// Trait for driver managers that can open connections from a descriptor.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Opens a new connection using the given `Key=Value;` descriptor.
    async fn open(&self, descriptor: &str) -> Result<Box<dyn DriverHandle>>;

    /// Returns the driver name for logging.
    fn name(&self) -> &'static str;
}

/// Trait for live driver connections.
///
/// Handles are single-owner: the relay opens one per query attempt and
/// closes it unconditionally afterwards.
#[async_trait]
pub trait DriverHandle: Send + Sync {
    /// Executes a query and returns all result rows.
    async fn query(&self, sql: &str) -> Result<Vec<DriverRow>>;

    /// Closes the connection and releases resources.
    ///
    /// Some backends reject close after certain failures (e.g. drivers that
    /// cannot end a transaction cleanly); callers must treat errors from
    /// this method as non-fatal.
    async fn close(&self) -> Result<()>;
}
