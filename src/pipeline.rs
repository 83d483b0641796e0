//! Pipeline orchestration
//!
//! This module provides the public API for Perf Ingest. It runs one file from
//! raw bytes to validated records:
//!
//! 1. Format detection - encoding and delimiter
//! 2. Vendor detection - picks the column mapper
//! 3. Column mapping - raw headers to canonical fields
//! 4. Normalization - typed values in canonical units
//! 5. Metric derivation - jump physics back-fill
//! 6. Validation - per-row rule chain
//! 7. Consolidation - session merge (session import only)
//!
//! Every invocation owns its own [`IssueLog`]; nothing is shared between
//! files and nothing is persisted.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::adapters::{ColumnMapper, MappingTable};
use crate::config::IngestConfig;
use crate::consolidation::{self, ConsolidatedSession};
use crate::detector::{detect_vendor, normalize_header};
use crate::error::{IngestError, RowRejection};
use crate::features::MetricDeriver;
use crate::format::detect_format;
use crate::normalizer::Normalizer;
use crate::schema::RawRow;
use crate::types::{IssueKind, IssueLog, ParseResult, Vendor};
use crate::validator::{profile_for, Validator};

/// Parse one performance export with the default configuration.
///
/// # Arguments
/// * `bytes` - Raw file content
/// * `filename` - Optional file name, used as a vendor hint
/// * `known_subjects` - Athlete identifiers the caller knows; empty accepts any
///
/// # Returns
/// The parse result; file-level failures are reported in it, never raised
///
/// # Example
/// ```ignore
/// let result = parse_performance_file(&bytes, Some("chronojump_export.csv"), &known);
/// for record in &result.records {
///     println!("{:?}", record.get_f64("jump_height"));
/// }
/// ```
pub fn parse_performance_file(
    bytes: &[u8],
    filename: Option<&str>,
    known_subjects: &HashSet<String>,
) -> ParseResult {
    IngestProcessor::new().parse(bytes, filename, known_subjects)
}

/// Parse one export and merge rows describing the same session.
///
/// # Example
/// ```ignore
/// let import = import_session_file(&bytes, Some("openfield.csv"), &HashSet::new());
/// assert!(import.sessions.len() <= import.parse.valid_rows);
/// ```
pub fn import_session_file(
    bytes: &[u8],
    filename: Option<&str>,
    known_subjects: &HashSet<String>,
) -> SessionImport {
    IngestProcessor::new().import_sessions(bytes, filename, known_subjects)
}

/// Parse result plus the consolidated sessions built from its valid records
#[derive(Debug, Clone, Serialize)]
pub struct SessionImport {
    pub parse: ParseResult,
    pub sessions: Vec<ConsolidatedSession>,
    /// At least one session merged more than one row
    pub consolidated: bool,
    /// At least one session had an aggregate row
    pub has_aggregate: bool,
    /// Period rows across all sessions
    pub periods_count: usize,
}

/// Configured entry point; cheap to build and safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct IngestProcessor {
    config: IngestConfig,
    custom_mapping: Option<MappingTable>,
}

impl IngestProcessor {
    /// Create a processor with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: IngestConfig) -> Self {
        self.config = config;
        self
    }

    /// Map columns with a caller-supplied table instead of a built-in vendor
    pub fn with_custom_mapping(mut self, table: MappingTable) -> Self {
        self.custom_mapping = Some(table);
        self
    }

    /// Build a processor from a JSON configuration document
    pub fn from_config_json(json: &str) -> Result<Self, IngestError> {
        Ok(Self::new().with_config(IngestConfig::from_json(json)?))
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Run the pipeline over one file
    pub fn parse(
        &self,
        bytes: &[u8],
        filename: Option<&str>,
        known_subjects: &HashSet<String>,
    ) -> ParseResult {
        let mut log = IssueLog::new();

        let format = match detect_format(bytes, self.config.sniff_options()) {
            Ok(format) => format,
            Err(err) => {
                info!(error = %err, "File could not be decoded");
                log.fatal(&err);
                return ParseResult::failed(Vendor::Generic, log);
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(format.text.as_bytes());

        let headers: Vec<String> = match reader.headers() {
            Ok(record) => record
                .iter()
                .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
                .collect(),
            Err(err) => {
                log.fatal(&IngestError::Csv(err));
                return self.failed_after_format(log, &format);
            }
        };
        if headers.iter().all(|h| h.is_empty()) {
            log.fatal(&IngestError::NoHeaders);
            return self.failed_after_format(log, &format);
        }

        let mapper = self.select_mapper(&headers, filename);
        let vendor = mapper.vendor();
        let header_map = mapper.map_headers(&headers);
        for (header, canonical) in &header_map.duplicates {
            log.warn(
                1,
                Some(header.as_str()),
                IssueKind::DuplicateColumn,
                format!("Column '{header}' also maps to '{canonical}' and is ignored"),
            );
        }

        let kind = profile_for(vendor, &header_map.mapping);
        debug!(
            %vendor,
            ?kind,
            mapped = header_map.mapping.len(),
            unmapped = header_map.unmapped.len(),
            "Columns mapped"
        );

        let normalizer = Normalizer::new(vendor, self.config.default_source_system.as_deref());
        let validator = Validator::new(kind, known_subjects, &self.config.timestamp_formats);

        let mut records = Vec::new();
        let mut total_rows = 0;
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    let line = err.position().map_or(0, |p| p.line() as usize);
                    total_rows += 1;
                    log.reject(line, &RowRejection::Unexpected(err.to_string()));
                    continue;
                }
            };
            let line = row.position().map_or(0, |p| p.line() as usize);
            let cells = headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.clone(), row.get(i).unwrap_or("").to_string()))
                .collect();
            let raw = RawRow::new(line, cells);
            if raw.is_blank() {
                continue;
            }
            total_rows += 1;

            let mapped = mapper.map_row(&raw);
            let record = normalizer.normalize(&mapped, &raw, &mut log);
            let record = MetricDeriver::derive(record);
            match validator.validate(record, &mut log) {
                Ok(record) => records.push(record),
                Err(rejection) => log.reject(line, &rejection),
            }
        }

        let valid_rows = records.len();
        let success = !log.has_errors() || (self.config.lenient && valid_rows > 0);
        info!(
            %vendor,
            encoding = format.encoding,
            total_rows,
            valid_rows,
            errors = log.errors.len(),
            warnings = log.warnings.len(),
            "Parsed performance file"
        );

        ParseResult {
            import_id: uuid::Uuid::new_v4(),
            parser_version: crate::PERF_INGEST_VERSION,
            success,
            vendor,
            encoding: Some(format.encoding.to_string()),
            delimiter: Some(format.delimiter as char),
            records,
            errors: log.errors,
            warnings: log.warnings,
            column_mapping: header_map.mapping,
            unmapped_headers: header_map.unmapped,
            subjects_not_found: log.not_found,
            total_rows,
            valid_rows,
        }
    }

    /// Parse, then merge rows that describe the same session
    pub fn import_sessions(
        &self,
        bytes: &[u8],
        filename: Option<&str>,
        known_subjects: &HashSet<String>,
    ) -> SessionImport {
        let mut parse = self.parse(bytes, filename, known_subjects);
        let mut log = IssueLog::new();
        let sessions = consolidation::consolidate(&parse.records, &mut log);
        parse.warnings.extend(log.warnings);

        let consolidated = sessions.iter().any(|s| s.row_count() > 1);
        let has_aggregate = sessions.iter().any(|s| s.has_aggregate);
        let periods_count: usize = sessions.iter().map(|s| s.periods_count).sum();
        info!(
            sessions = sessions.len(),
            consolidated,
            has_aggregate,
            periods_count,
            "Imported sessions"
        );

        SessionImport {
            parse,
            sessions,
            consolidated,
            has_aggregate,
            periods_count,
        }
    }

    /// Mapper precedence: explicit override, custom table, then detection
    fn select_mapper(&self, headers: &[String], filename: Option<&str>) -> ColumnMapper {
        match (self.config.vendor_override, &self.custom_mapping) {
            (Some(Vendor::Custom) | None, Some(table)) => ColumnMapper::custom(table.clone()),
            (Some(vendor), _) => ColumnMapper::for_vendor(vendor),
            (None, None) => {
                let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
                let detection =
                    detect_vendor(&normalized, filename, self.config.min_signature_matches);
                info!(
                    vendor = %detection.vendor,
                    by_filename = detection.by_filename,
                    "Vendor detected"
                );
                ColumnMapper::for_vendor(detection.vendor)
            }
        }
    }

    fn failed_after_format(
        &self,
        log: IssueLog,
        format: &crate::format::DetectedFormat,
    ) -> ParseResult {
        let mut result = ParseResult::failed(Vendor::Generic, log);
        result.encoding = Some(format.encoding.to_string());
        result.delimiter = Some(format.delimiter as char);
        result
    }
}
