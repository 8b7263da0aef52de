//! Successful operation results.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::calculator::{Operands, Operation};

/// A computed result, ready to be sent to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Computation {
    pub operation: Operation,
    pub operands: Operands,
    pub result: f64,
    pub timestamp: DateTime<Utc>,
}

impl Computation {
    /// Stamp a result with the current time.
    pub fn new(operation: Operation, operands: Operands, result: f64) -> Self {
        Self {
            operation,
            operands,
            result,
            timestamp: Utc::now(),
        }
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Serialize for Computation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.operation.operand_fields();
        let values = self.operands.values();

        let mut map = serializer.serialize_map(Some(fields.len() + 3))?;
        map.serialize_entry("operation", self.operation.name())?;
        for (field, value) in fields.iter().zip(values) {
            map.serialize_entry(field, &value)?;
        }
        map.serialize_entry("result", &self.result)?;
        map.serialize_entry("timestamp", &format_timestamp(&self.timestamp))?;
        map.end()
    }
}
