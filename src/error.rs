//! Error types for Perf Ingest
//!
//! Two layers: [`IngestError`] for problems that abort a whole file (or a
//! configuration step), and [`RowRejection`] for problems local to one row.

use thiserror::Error;

use crate::types::{IngestIssue, IssueKind, Severity};

/// Errors that abort an entire import or configuration step
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unable to decode file with any supported encoding")]
    Decoding,

    #[error("File contains no header row")]
    NoHeaders,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Mapping references unknown canonical field '{field}' (from column '{column}')")]
    UnknownCanonicalField { column: String, field: String },

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl IngestError {
    pub fn kind(&self) -> IssueKind {
        match self {
            IngestError::Decoding => IssueKind::Decoding,
            IngestError::NoHeaders => IssueKind::NoHeaders,
            _ => IssueKind::Unexpected,
        }
    }

    /// Whole-file issue; row 0 means "not tied to a data row".
    pub fn to_issue(&self) -> IngestIssue {
        IngestIssue {
            row: 0,
            column: None,
            message: self.to_string(),
            severity: Severity::Error,
            kind: self.kind(),
        }
    }
}

/// A non-blank cell that is not a number in any supported convention
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Cannot read '{0}' as a number")]
pub struct UnparseableNumber(pub String);

/// Reason a single row was excluded from the valid records
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowRejection {
    #[error("Missing required field '{field}'")]
    RequiredField { field: String },

    #[error("Row has none of the primary metrics: {}", .fields.join(", "))]
    MissingPrimaryMetric { fields: Vec<String> },

    #[error("Unknown athlete identifier '{athlete_id}'")]
    UnknownSubject { athlete_id: String },

    #[error("{message}")]
    BusinessRule { field: String, message: String },

    #[error("Value {value} for '{field}' is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unrecognised timestamp '{value}'")]
    BadTimestamp { field: String, value: String },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl RowRejection {
    pub fn kind(&self) -> IssueKind {
        match self {
            RowRejection::RequiredField { .. } => IssueKind::RequiredField,
            RowRejection::MissingPrimaryMetric { .. } => IssueKind::MissingPrimaryMetric,
            RowRejection::UnknownSubject { .. } => IssueKind::UnknownSubject,
            RowRejection::BusinessRule { .. } => IssueKind::BusinessRule,
            RowRejection::OutOfRange { .. } => IssueKind::OutOfRange,
            RowRejection::BadTimestamp { .. } => IssueKind::BadTimestamp,
            RowRejection::Unexpected(_) => IssueKind::Unexpected,
        }
    }

    /// Offending column, when the rejection is tied to one
    pub fn column(&self) -> Option<&str> {
        match self {
            RowRejection::RequiredField { field }
            | RowRejection::BusinessRule { field, .. }
            | RowRejection::OutOfRange { field, .. }
            | RowRejection::BadTimestamp { field, .. } => Some(field),
            RowRejection::UnknownSubject { .. } => Some("athlete_id"),
            RowRejection::MissingPrimaryMetric { .. } | RowRejection::Unexpected(_) => None,
        }
    }

    pub fn to_issue(&self, row: usize) -> IngestIssue {
        IngestIssue {
            row,
            column: self.column().map(str::to_string),
            message: self.to_string(),
            severity: Severity::Error,
            kind: self.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_names_limits() {
        let rejection = RowRejection::OutOfRange {
            field: "flight_time".to_string(),
            value: 3.5,
            min: 0.0,
            max: 2.0,
        };
        let issue = rejection.to_issue(7);

        assert_eq!(issue.row, 7);
        assert_eq!(issue.column.as_deref(), Some("flight_time"));
        assert_eq!(issue.kind, IssueKind::OutOfRange);
        assert!(issue.message.contains("flight_time"));
        assert!(issue.message.contains("3.5"));
        assert!(issue.message.contains("[0, 2]"));
    }

    #[test]
    fn test_fatal_errors_map_to_row_zero() {
        let issue = IngestError::NoHeaders.to_issue();
        assert_eq!(issue.row, 0);
        assert_eq!(issue.kind, IssueKind::NoHeaders);
        assert_eq!(issue.severity, Severity::Error);
    }
}
