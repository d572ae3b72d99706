//! Mock drivers for testing.
//!
//! Provides in-memory driver implementations that return predefined results
//! or fail at configurable points in the connection lifecycle.

use super::{Driver, DriverHandle, DriverRow};
use crate::error::{RelayError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// A mock driver that hands out handles returning predefined rows.
///
/// Failure points are configurable so tests can exercise each branch of the
/// query lifecycle: query errors, close errors, or both.
#[derive(Default)]
pub struct MockDriver {
    rows: Vec<DriverRow>,
    query_error: Option<String>,
    close_error: Option<String>,
    seen_queries: Arc<Mutex<Vec<String>>>,
}

impl MockDriver {
    /// Creates a new mock driver that returns no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rows every handle will return.
    pub fn with_rows(mut self, rows: Vec<DriverRow>) -> Self {
        self.rows = rows;
        self
    }

    /// Makes every query fail with the given message.
    pub fn with_query_error(mut self, msg: impl Into<String>) -> Self {
        self.query_error = Some(msg.into());
        self
    }

    /// Makes every close fail with the given message.
    pub fn with_close_error(mut self, msg: impl Into<String>) -> Self {
        self.close_error = Some(msg.into());
        self
    }

    /// Returns the queries that reached handles opened by this driver.
    pub fn seen_queries(&self) -> Vec<String> {
        self.seen_queries.lock().expect("seen_queries poisoned").clone()
    }

    /// Returns a shared handle to the seen-query log, for asserting on
    /// queries after the driver has been boxed away.
    pub fn seen_queries_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.seen_queries)
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn open(&self, _descriptor: &str) -> Result<Box<dyn DriverHandle>> {
        Ok(Box::new(MockHandle {
            rows: self.rows.clone(),
            query_error: self.query_error.clone(),
            close_error: self.close_error.clone(),
            seen_queries: Arc::clone(&self.seen_queries),
        }))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

struct MockHandle {
    rows: Vec<DriverRow>,
    query_error: Option<String>,
    close_error: Option<String>,
    seen_queries: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl DriverHandle for MockHandle {
    async fn query(&self, sql: &str) -> Result<Vec<DriverRow>> {
        self.seen_queries
            .lock()
            .expect("seen_queries poisoned")
            .push(sql.to_string());

        match &self.query_error {
            Some(msg) => Err(RelayError::query(msg.clone())),
            None => Ok(self.rows.clone()),
        }
    }

    async fn close(&self) -> Result<()> {
        match &self.close_error {
            Some(msg) => Err(RelayError::cleanup(msg.clone())),
            None => Ok(()),
        }
    }
}

/// A driver whose `open` always fails, for connection-error paths.
pub struct FailingDriver {
    message: String,
}

impl FailingDriver {
    /// Creates a failing driver with the given open-failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingDriver {
    fn default() -> Self {
        Self::new("Data source name not found and no default driver specified")
    }
}

#[async_trait]
impl Driver for FailingDriver {
    async fn open(&self, _descriptor: &str) -> Result<Box<dyn DriverHandle>> {
        Err(RelayError::connection(self.message.clone()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
