//! Core types for the Perf Ingest pipeline
//!
//! Vendor tags, activity classifications, the issue accumulator that is
//! threaded through every stage, and the result object handed back to callers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::error::{IngestError, RowRejection};
use crate::schema::ParsedRecord;

/// Vendor identifier used to select a column mapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Generic,
    Catapult,
    StatSports,
    Chronojump,
    Optojump,
    Custom,
}

impl Vendor {
    /// Vendors that take part in header scoring, in tie-break order
    pub const DETECTABLE: [Vendor; 4] = [
        Vendor::Catapult,
        Vendor::StatSports,
        Vendor::Chronojump,
        Vendor::Optojump,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Generic => "generic",
            Vendor::Catapult => "catapult",
            Vendor::StatSports => "statsports",
            Vendor::Chronojump => "chronojump",
            Vendor::Optojump => "optojump",
            Vendor::Custom => "custom",
        }
    }

    /// Kind of export the vendor produces; `None` when it has to be inferred
    pub fn data_kind(&self) -> Option<DataKind> {
        match self {
            Vendor::Catapult | Vendor::StatSports => Some(DataKind::Gps),
            Vendor::Chronojump | Vendor::Optojump => Some(DataKind::Jump),
            Vendor::Generic | Vendor::Custom => None,
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Family of measurement an export describes; selects the validation profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Jump,
    Gps,
}

/// Canonical jump classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpType {
    /// Countermovement jump
    Cmj,
    /// Squat jump
    Sj,
    /// Countermovement jump with arm swing
    Abalakov,
    DropJump,
    /// Repeated / rebound jumps
    ReactiveJump,
}

/// Whether a jump type carries a ground contact phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactTimeRule {
    Required,
    Forbidden,
}

impl JumpType {
    pub const ALL: [JumpType; 5] = [
        JumpType::Cmj,
        JumpType::Sj,
        JumpType::Abalakov,
        JumpType::DropJump,
        JumpType::ReactiveJump,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            JumpType::Cmj => "cmj",
            JumpType::Sj => "sj",
            JumpType::Abalakov => "abk",
            JumpType::DropJump => "dj",
            JumpType::ReactiveJump => "rj",
        }
    }

    pub fn from_code(code: &str) -> Option<JumpType> {
        JumpType::ALL
            .into_iter()
            .find(|jt| jt.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn contact_time_rule(&self) -> ContactTimeRule {
        match self {
            JumpType::DropJump | JumpType::ReactiveJump => ContactTimeRule::Required,
            JumpType::Cmj | JumpType::Sj | JumpType::Abalakov => ContactTimeRule::Forbidden,
        }
    }
}

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Issue taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Decoding,
    NoHeaders,
    RequiredField,
    MissingPrimaryMetric,
    UnknownSubject,
    BusinessRule,
    OutOfRange,
    BadTimestamp,
    Unexpected,
    UnparseableValue,
    ExpectedRange,
    Simulated,
    DuplicateColumn,
    DuplicateAggregate,
}

/// One error or warning tied back to a source line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestIssue {
    /// Source line number (header is line 1); 0 for whole-file issues
    pub row: usize,
    pub column: Option<String>,
    pub message: String,
    pub severity: Severity,
    pub kind: IssueKind,
}

/// Accumulator threaded through every stage of one parse invocation
#[derive(Debug, Clone, Default)]
pub struct IssueLog {
    pub errors: Vec<IngestIssue>,
    pub warnings: Vec<IngestIssue>,
    /// Athlete identifiers rejected because they are not in the known set
    pub not_found: BTreeSet<String>,
}

impl IssueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, row: usize, rejection: &RowRejection) {
        if let RowRejection::UnknownSubject { athlete_id } = rejection {
            self.not_found.insert(athlete_id.clone());
        }
        self.errors.push(rejection.to_issue(row));
    }

    pub fn fatal(&mut self, error: &IngestError) {
        self.errors.push(error.to_issue());
    }

    pub fn warn(
        &mut self,
        row: usize,
        column: Option<&str>,
        kind: IssueKind,
        message: impl Into<String>,
    ) {
        self.warnings.push(IngestIssue {
            row,
            column: column.map(str::to_string),
            message: message.into(),
            severity: Severity::Warning,
            kind,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Result of parsing one file
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    pub import_id: Uuid,
    /// Version of the library that produced the result
    pub parser_version: &'static str,
    pub success: bool,
    pub vendor: Vendor,
    /// Label of the encoding the bytes were decoded with
    pub encoding: Option<String>,
    pub delimiter: Option<char>,
    pub records: Vec<ParsedRecord>,
    pub errors: Vec<IngestIssue>,
    pub warnings: Vec<IngestIssue>,
    /// Original header -> canonical field actually used
    pub column_mapping: BTreeMap<String, String>,
    pub unmapped_headers: Vec<String>,
    pub subjects_not_found: BTreeSet<String>,
    pub total_rows: usize,
    pub valid_rows: usize,
}

impl ParseResult {
    /// Result for a file that could not be read at all
    pub fn failed(vendor: Vendor, log: IssueLog) -> Self {
        ParseResult {
            import_id: Uuid::new_v4(),
            parser_version: crate::PERF_INGEST_VERSION,
            success: false,
            vendor,
            encoding: None,
            delimiter: None,
            records: Vec::new(),
            errors: log.errors,
            warnings: log.warnings,
            column_mapping: BTreeMap::new(),
            unmapped_headers: Vec::new(),
            subjects_not_found: log.not_found,
            total_rows: 0,
            valid_rows: 0,
        }
    }

    pub fn to_json(&self) -> Result<String, IngestError> {
        Ok(serde_json::to_string(self)?)
    }
}
