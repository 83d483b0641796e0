//! Row parsing and numeric coercion
//!
//! Turns a mapped row (canonical names, text values) into a typed
//! [`ParsedRecord`]:
//! - numbers in dot-decimal, comma-decimal, US and EU grouping conventions
//! - blank stays null, "0" stays zero
//! - unit conversion into the canonical unit
//! - separate date and time columns joined into one timestamp text
//!
//! Unparseable cells become a warning and a missing value; they never abort
//! the row.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

use crate::adapters::{transforms, MappedRow};
use crate::error::UnparseableNumber;
use crate::schema::{self, fields, FieldValue, ParsedRecord, RawRow, ValueKind};
use crate::types::{IssueKind, IssueLog, Vendor};

/// Parse a numeric cell.
///
/// `Ok(None)` for blank text. When both `.` and `,` appear the later one is
/// the decimal point. A lone comma followed by exactly three digits is a
/// thousands separator, any other lone comma is a decimal point.
pub fn parse_number(raw: &str) -> Result<Option<f64>, UnparseableNumber> {
    let text = raw.trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        return Ok(None);
    }

    // Space groupings ("1 234,5") carry no meaning
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    let normalized = match (compact.rfind('.'), compact.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => compact.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => compact.replace(',', ""),
        (None, Some(comma)) => {
            let decimals = &compact[comma + 1..];
            let grouped = compact.matches(',').count() > 1
                || (decimals.len() == 3 && decimals.chars().all(|c| c.is_ascii_digit()));
            if grouped {
                compact.replace(',', "")
            } else {
                compact.replace(',', ".")
            }
        }
        (Some(_), None) if compact.matches('.').count() > 1 => compact.replace('.', ""),
        _ => compact,
    };

    let well_formed = !normalized.is_empty()
        && normalized
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && normalized.chars().any(|c| c.is_ascii_digit());

    match normalized.parse::<f64>() {
        Ok(value) if well_formed && value.is_finite() => Ok(Some(value)),
        _ => Err(UnparseableNumber(text.to_string())),
    }
}

/// Builds typed records for one file
#[derive(Debug, Clone)]
pub struct Normalizer {
    vendor: Vendor,
    /// Value written to `source_system` when the row carries none
    source_system: Option<String>,
    parsed_at: DateTime<Utc>,
}

impl Normalizer {
    /// Built-in vendors tag rows with their own name; generic and custom files
    /// fall back to `default_source_system`.
    pub fn new(vendor: Vendor, default_source_system: Option<&str>) -> Self {
        let source_system = match vendor {
            Vendor::Generic | Vendor::Custom => default_source_system.map(str::to_string),
            _ => Some(vendor.as_str().to_string()),
        };
        Normalizer {
            vendor,
            source_system,
            parsed_at: Utc::now(),
        }
    }

    /// Coerce every mapped cell to its canonical type
    pub fn normalize(&self, mapped: &MappedRow, raw: &RawRow, log: &mut IssueLog) -> ParsedRecord {
        let mut values: BTreeMap<String, FieldValue> = BTreeMap::new();

        for cell in &mapped.cells {
            let Some(text) = cell.value.as_deref() else {
                continue;
            };
            let Some(definition) = schema::canonical_field(cell.canonical) else {
                continue;
            };

            let value = match definition.kind {
                ValueKind::Text | ValueKind::Timestamp => Some(FieldValue::Text(text.to_string())),
                ValueKind::Float | ValueKind::Integer => {
                    match coerce_numeric(cell.canonical, text, cell.unit) {
                        Ok(Some(number)) if definition.kind == ValueKind::Integer => {
                            Some(FieldValue::Integer(number.round() as i64))
                        }
                        Ok(number) => number.map(FieldValue::Float),
                        Err(err) => {
                            log.warn(
                                mapped.line,
                                Some(cell.canonical),
                                IssueKind::UnparseableValue,
                                format!("{err} (column '{}')", cell.header),
                            );
                            None
                        }
                    }
                }
            };

            if let Some(value) = value {
                values.insert(cell.canonical.to_string(), value);
            }
        }

        self.fill_context(&mut values);

        ParsedRecord {
            row_number: mapped.line,
            vendor: self.vendor,
            parsed_at: self.parsed_at,
            fields: values,
            derived: BTreeSet::new(),
            raw: raw.cells.clone(),
        }
    }

    fn fill_context(&self, values: &mut BTreeMap<String, FieldValue>) {
        if !values.contains_key(fields::TIMESTAMP) {
            let date = values.get(fields::DATE).and_then(FieldValue::as_str);
            let time = values.get(fields::TIME).and_then(FieldValue::as_str);
            let joined = match (date, time) {
                (Some(date), Some(time)) => Some(format!("{date} {time}")),
                (Some(date), None) => Some(date.to_string()),
                _ => None,
            };
            if let Some(joined) = joined {
                values.insert(fields::TIMESTAMP.to_string(), FieldValue::Text(joined));
            }
        }

        if !values.contains_key(fields::ATHLETE_ID) {
            if let Some(name) = values.get(fields::ATHLETE_NAME).cloned() {
                values.insert(fields::ATHLETE_ID.to_string(), name);
            }
        }

        if !values.contains_key(fields::SOURCE_SYSTEM) {
            if let Some(source) = &self.source_system {
                values.insert(
                    fields::SOURCE_SYSTEM.to_string(),
                    FieldValue::Text(source.clone()),
                );
            }
        }
    }
}

fn coerce_numeric(
    field: &str,
    text: &str,
    unit: Option<transforms::SourceUnit>,
) -> Result<Option<f64>, UnparseableNumber> {
    if field == fields::DURATION && text.contains(':') {
        return transforms::parse_clock_minutes(text)
            .map(Some)
            .ok_or_else(|| UnparseableNumber(text.to_string()));
    }
    Ok(parse_number(text)?.map(|value| transforms::to_canonical_unit(field, value, unit)))
}
