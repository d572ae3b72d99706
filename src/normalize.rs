//! Result normalization.
//!
//! Drivers surface unsigned 64-bit integers for columns whose values exceed
//! the signed range (e.g. MySQL `BIGINT UNSIGNED`). Downstream consumers
//! expect plain doubles for anything past `i64::MAX`, so the normalizer
//! walks every row and converts oversized integers to their f64
//! approximation, in place. Idempotent by construction: f64 values are never
//! touched again.

use crate::driver::DriverRow;
use serde_json::Value;

/// Normalizes every row in a result set, in place.
pub fn normalize_rows(rows: &mut [DriverRow]) {
    for row in rows.iter_mut() {
        for value in row.values_mut() {
            normalize_value(value);
        }
    }
}

/// Recursively normalizes a single value.
///
/// Objects and arrays are walked; scalars other than oversized integers are
/// left untouched.
pub fn normalize_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for nested in map.values_mut() {
                normalize_value(nested);
            }
        }
        Value::Array(items) => {
            for nested in items.iter_mut() {
                normalize_value(nested);
            }
        }
        Value::Number(n) => {
            // A number that only decodes as u64 is past i64::MAX; anything
            // smaller round-trips as i64 and stays exact.
            let oversized = n.as_u64().filter(|_| n.as_i64().is_none());
            if let Some(big) = oversized {
                if let Some(approx) = serde_json::Number::from_f64(big as f64) {
                    *value = Value::Number(approx);
                }
            }
        }
        _ => {}
    }
}
