//! Raw rows and parsed records

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::types::Vendor;

/// One physical CSV line, exactly as read
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Source line number (header is line 1)
    pub line: usize,
    /// (original header, raw text) in file order
    pub cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<(String, String)>) -> Self {
        Self { line, cells }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.trim().is_empty())
    }
}

/// Typed canonical value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(n) => Some(*n),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

/// Canonical record produced for one accepted row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRecord {
    pub row_number: usize,
    pub vendor: Vendor,
    pub parsed_at: DateTime<Utc>,
    pub fields: BTreeMap<String, FieldValue>,
    /// Fields computed by the deriver rather than read from the file
    pub derived: BTreeSet<String>,
    /// Audit copy of the source line
    pub raw: Vec<(String, String)>,
}

impl ParsedRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(FieldValue::as_f64)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(FieldValue::as_str)
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.fields
            .get(super::fields::TIMESTAMP)
            .and_then(FieldValue::as_timestamp)
    }

    pub fn is_derived(&self, field: &str) -> bool {
        self.derived.contains(field)
    }
}
