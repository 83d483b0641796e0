//! Row validation
//!
//! Each row runs through an ordered rule chain and stops at the first
//! failure, which becomes the row's single error:
//!
//! 1. required fields present and non-blank
//! 2. at least one primary metric
//! 3. athlete known to the caller (when a known set is given)
//! 4. contact time required or forbidden by jump type (jump files only)
//! 5. hard ranges from the canonical schema
//! 6. timestamp matches one of the accepted patterns
//!
//! Soft-range and simulated-test warnings are only kept for rows that pass.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashSet};

use crate::adapters::transforms;
use crate::error::RowRejection;
use crate::schema::{self, fields, FieldValue, ParsedRecord, CANONICAL_FIELDS};
use crate::types::{
    ContactTimeRule, DataKind, IngestIssue, IssueKind, IssueLog, JumpType, Severity, Vendor,
};

const JUMP_REQUIRED: &[&str] = &[
    fields::ATHLETE_ID,
    fields::JUMP_TYPE,
    fields::TIMESTAMP,
    fields::SOURCE_SYSTEM,
];
const GPS_REQUIRED: &[&str] = &[fields::ATHLETE_ID, fields::TIMESTAMP, fields::SOURCE_SYSTEM];

const JUMP_PRIMARY: &[&str] = &[fields::FLIGHT_TIME, fields::JUMP_HEIGHT];
const GPS_PRIMARY: &[&str] = &[fields::TOTAL_DISTANCE, fields::DURATION];

pub fn required_fields(kind: DataKind) -> &'static [&'static str] {
    match kind {
        DataKind::Jump => JUMP_REQUIRED,
        DataKind::Gps => GPS_REQUIRED,
    }
}

/// Mutually substitutable metrics; a row needs at least one
pub fn primary_metrics(kind: DataKind) -> &'static [&'static str] {
    match kind {
        DataKind::Jump => JUMP_PRIMARY,
        DataKind::Gps => GPS_PRIMARY,
    }
}

/// Validation profile for a file. Generic and custom files are jump exports
/// when any jump metric column was mapped.
pub fn profile_for(vendor: Vendor, column_mapping: &BTreeMap<String, String>) -> DataKind {
    vendor.data_kind().unwrap_or_else(|| {
        if column_mapping.values().any(|f| schema::is_jump_metric(f)) {
            DataKind::Jump
        } else {
            DataKind::Gps
        }
    })
}

/// Parse a timestamp against `formats` in order; date-only patterns give midnight
pub fn parse_timestamp<S: AsRef<str>>(value: &str, formats: &[S]) -> Option<NaiveDateTime> {
    let value = value.trim();
    formats.iter().find_map(|format| {
        let format = format.as_ref();
        NaiveDateTime::parse_from_str(value, format).ok().or_else(|| {
            if format.contains("%H") {
                return None;
            }
            NaiveDate::parse_from_str(value, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
    })
}

fn has_value(record: &ParsedRecord, field: &str) -> bool {
    match record.get(field) {
        Some(FieldValue::Text(text)) => !text.trim().is_empty(),
        Some(_) => true,
        None => false,
    }
}

pub struct Validator<'a> {
    kind: DataKind,
    known_subjects: &'a HashSet<String>,
    timestamp_formats: &'a [String],
}

impl<'a> Validator<'a> {
    pub fn new(
        kind: DataKind,
        known_subjects: &'a HashSet<String>,
        timestamp_formats: &'a [String],
    ) -> Self {
        Validator {
            kind,
            known_subjects,
            timestamp_formats,
        }
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    /// Validate one record. On success the timestamp is stored typed and any
    /// warnings are appended to `log`; the rejection is left to the caller.
    pub fn validate(
        &self,
        mut record: ParsedRecord,
        log: &mut IssueLog,
    ) -> Result<ParsedRecord, RowRejection> {
        let mut warnings = Vec::new();

        self.check_required(&record)?;
        self.check_primary(&record)?;
        self.check_subject(&record)?;
        if self.kind == DataKind::Jump {
            check_contact_time(&record)?;
        }
        check_ranges(&record, &mut warnings)?;
        self.resolve_timestamp(&mut record)?;

        if record
            .get_str(fields::SIMULATED)
            .is_some_and(transforms::is_truthy_flag)
        {
            warnings.push(warning(
                record.row_number,
                fields::SIMULATED,
                IssueKind::Simulated,
                "Row is flagged as simulated".to_string(),
            ));
        }

        log.warnings.extend(warnings);
        Ok(record)
    }

    fn check_required(&self, record: &ParsedRecord) -> Result<(), RowRejection> {
        match required_fields(self.kind)
            .iter()
            .find(|field| !has_value(record, field))
        {
            Some(field) => Err(RowRejection::RequiredField {
                field: field.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn check_primary(&self, record: &ParsedRecord) -> Result<(), RowRejection> {
        let metrics = primary_metrics(self.kind);
        if metrics.iter().any(|field| has_value(record, field)) {
            Ok(())
        } else {
            Err(RowRejection::MissingPrimaryMetric {
                fields: metrics.iter().map(|f| f.to_string()).collect(),
            })
        }
    }

    fn check_subject(&self, record: &ParsedRecord) -> Result<(), RowRejection> {
        if self.known_subjects.is_empty() {
            return Ok(());
        }
        let athlete_id = record.get_str(fields::ATHLETE_ID).unwrap_or("").trim();
        if self.known_subjects.contains(athlete_id) {
            Ok(())
        } else {
            Err(RowRejection::UnknownSubject {
                athlete_id: athlete_id.to_string(),
            })
        }
    }

    fn resolve_timestamp(&self, record: &mut ParsedRecord) -> Result<(), RowRejection> {
        let Some(FieldValue::Text(text)) = record.get(fields::TIMESTAMP) else {
            return Ok(());
        };
        match parse_timestamp(text, self.timestamp_formats) {
            Some(ts) => {
                record
                    .fields
                    .insert(fields::TIMESTAMP.to_string(), FieldValue::Timestamp(ts));
                Ok(())
            }
            None => Err(RowRejection::BadTimestamp {
                field: fields::TIMESTAMP.to_string(),
                value: text.clone(),
            }),
        }
    }
}

/// Drop and reactive jumps need a contact phase; countermovement and squat
/// jumps must not have one. Unrecognised jump types carry no rule.
fn check_contact_time(record: &ParsedRecord) -> Result<(), RowRejection> {
    let Some(code) = record.get_str(fields::JUMP_TYPE) else {
        return Ok(());
    };
    let Some(jump_type) = JumpType::from_code(code) else {
        return Ok(());
    };
    let has_contact = has_value(record, fields::CONTACT_TIME);
    let message = match (jump_type.contact_time_rule(), has_contact) {
        (ContactTimeRule::Required, false) => {
            format!("Jump type '{}' requires contact_time", jump_type.code())
        }
        (ContactTimeRule::Forbidden, true) => {
            format!("Jump type '{}' must not carry contact_time", jump_type.code())
        }
        _ => return Ok(()),
    };
    Err(RowRejection::BusinessRule {
        field: fields::CONTACT_TIME.to_string(),
        message,
    })
}

fn check_ranges(
    record: &ParsedRecord,
    warnings: &mut Vec<IngestIssue>,
) -> Result<(), RowRejection> {
    for definition in CANONICAL_FIELDS {
        let Some(value) = record.get_f64(definition.name) else {
            continue;
        };
        if let Some((min, max)) = definition.range {
            if value < min || value > max {
                return Err(RowRejection::OutOfRange {
                    field: definition.name.to_string(),
                    value,
                    min,
                    max,
                });
            }
        }
        if let Some((lo, hi)) = definition.expected {
            if value < lo || value > hi {
                warnings.push(warning(
                    record.row_number,
                    definition.name,
                    IssueKind::ExpectedRange,
                    format!(
                        "Value {value} for '{}' is outside the expected range [{lo}, {hi}]",
                        definition.name
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn warning(row: usize, column: &str, kind: IssueKind, message: String) -> IngestIssue {
    IngestIssue {
        row,
        column: Some(column.to_string()),
        message,
        severity: Severity::Warning,
        kind,
    }
}
