//! Perf Ingest - ingestion pipeline for sports performance exports
//!
//! Perf Ingest turns GPS tracking and jump-mat CSV exports from many vendors
//! into one canonical record format through a deterministic pipeline:
//! format detection → vendor detection → column mapping → normalization →
//! metric derivation → validation → session consolidation.
//!
//! ## Modules
//!
//! - **Schema**: canonical field names, units and validity ranges
//! - **Adapters**: per-vendor column tables and value transforms
//! - **Pipeline**: the public entry points returning a [`ParseResult`]
//!
//! The library never persists anything and never panics on file content:
//! problems are reported as errors and warnings inside the result.

pub mod adapters;
pub mod config;
pub mod consolidation;
pub mod detector;
pub mod error;
pub mod features;
pub mod format;
pub mod normalizer;
pub mod pipeline;
pub mod schema;
pub mod types;
pub mod validator;

pub use adapters::{ColumnMapper, MappingTable};
pub use config::IngestConfig;
pub use consolidation::{ConsolidatedSession, PeriodDetail};
pub use error::{IngestError, RowRejection};
pub use pipeline::{import_session_file, parse_performance_file, IngestProcessor, SessionImport};
pub use schema::{FieldValue, ParsedRecord};
pub use types::{IngestIssue, IssueKind, ParseResult, Severity, Vendor};

/// Crate version, recorded with every import
pub const PERF_INGEST_VERSION: &str = env!("CARGO_PKG_VERSION");
