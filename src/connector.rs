//! Single-shot connection lifecycle and query orchestration.
//!
//! A `Connector` owns one descriptor and runs one query at a time against a
//! fresh driver connection: open on demand, execute, close unconditionally.
//! Reusing connections is traded away for robustness against drivers with
//! inconsistent transactional close behavior.

use crate::config::ConnectionProfile;
use crate::driver::{Driver, DriverHandle, DriverRow};
use crate::error::Result;
use crate::normalize::normalize_rows;
use crate::rewrite::rewrite;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, error, warn};

static DATABASE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Database=([^;]+)").expect("valid database regex"));

/// The outcome of a query attempt.
///
/// `run_query` never fails; all errors are carried here as data so callers
/// treat every invocation uniformly. `error` set implies `rows` empty and
/// `count` zero; `count` always equals `rows.len()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Result rows, in driver order.
    pub rows: Vec<DriverRow>,

    /// Number of rows returned.
    pub count: usize,

    /// Error message from the driver, if the attempt failed.
    pub error: Option<String>,
}

/// A single-connection database adapter.
///
/// Not safe for concurrent `run_query` calls on one instance; callers either
/// serialize per instance or construct one connector per in-flight query.
pub struct Connector {
    driver: Box<dyn Driver>,
    descriptor: String,
    database_id: Option<String>,
    connected: bool,
    active: Option<Box<dyn DriverHandle>>,
}

impl Connector {
    /// Creates a connector from a driver and a `Key=Value;` descriptor.
    ///
    /// The default schema is extracted from the first `Database=` entry at
    /// construction time and never recomputed.
    pub fn new(driver: Box<dyn Driver>, descriptor: impl Into<String>) -> Self {
        let descriptor = descriptor.into();
        let database_id = DATABASE_KEY
            .captures(&descriptor)
            .map(|cap| cap[1].to_string());

        Self {
            driver,
            descriptor,
            database_id,
            connected: false,
            active: None,
        }
    }

    /// Creates a connector from a connection profile.
    pub fn from_profile(driver: Box<dyn Driver>, profile: &ConnectionProfile) -> Self {
        Self::new(driver, profile.to_descriptor())
    }

    /// Returns the default schema name derived from the descriptor.
    pub fn database_id(&self) -> Option<&str> {
        self.database_id.as_deref()
    }

    /// Returns whether a connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Opens a new driver connection using the stored descriptor.
    ///
    /// On failure the error propagates and the connector stays disconnected.
    pub async fn connect(&mut self) -> Result<()> {
        let handle = self.driver.open(&self.descriptor).await?;
        self.active = Some(handle);
        self.connected = true;
        Ok(())
    }

    /// Releases the active handle.
    ///
    /// Close errors are logged and swallowed: some drivers reject close when
    /// the backend cannot end a transaction cleanly, and a failed teardown
    /// must never mask a prior query error. The connected flag always resets.
    pub async fn close(&mut self) {
        if let Some(handle) = self.active.take() {
            if let Err(e) = handle.close().await {
                warn!(driver = self.driver.name(), "Error closing connection: {e}");
            }
        }
        self.connected = false;
    }

    /// Runs one query through the full lifecycle and returns the outcome.
    ///
    /// Connects if needed, rewrites the query, executes it, normalizes the
    /// rows, and unconditionally closes the connection. Never fails: every
    /// error lands in `QueryResult::error`.
    pub async fn run_query(&mut self, query: &str) -> QueryResult {
        let mut result = QueryResult::default();

        let connected = if self.connected {
            Ok(())
        } else {
            self.connect().await
        };

        match connected {
            Ok(()) => {
                let sql = rewrite(query);
                debug!(driver = self.driver.name(), "Executing query: {sql}");

                // connect() just succeeded or connected was already true, so
                // a handle is present.
                match self.active.as_ref() {
                    Some(handle) => match handle.query(&sql).await {
                        Ok(mut rows) => {
                            normalize_rows(&mut rows);
                            result.count = rows.len();
                            result.rows = rows;
                        }
                        Err(e) => {
                            error!(driver = self.driver.name(), "Query failed: {e}");
                            result.error = Some(e.to_string());
                        }
                    },
                    None => {
                        result.error = Some("No active connection handle".to_string());
                    }
                }
            }
            Err(e) => {
                error!(driver = self.driver.name(), "Connection failed: {e}");
                result.error = Some(e.to_string());
            }
        }

        self.close().await;
        result
    }

    /// Builds the query listing all tables in the default schema.
    pub fn list_tables_sql(&self) -> String {
        format!(
            "SELECT table_name FROM information_schema.tables WHERE table_schema = '{}'",
            self.database_id.as_deref().unwrap_or_default()
        )
    }

    /// Builds the describe-columns query for a table in the default schema.
    ///
    /// The table name is identifier-quoted; an empty name is passed through
    /// as a literal empty string.
    pub fn table_schema_sql(&self, table_name: &str) -> String {
        format!(
            "SHOW COLUMNS FROM {}.`{table_name}`;",
            self.database_id.as_deref().unwrap_or_default()
        )
    }
}
