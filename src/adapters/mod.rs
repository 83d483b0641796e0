//! Vendor column mappers
//!
//! Each vendor is a static [`VendorProfile`]: filename keywords and header
//! signature for detection, a raw-header -> canonical-field table, extra
//! sentinel markers and default source units. [`ColumnMapper`] turns a profile
//! (or a caller-supplied table for [`Vendor::Custom`]) into a lookup that maps
//! one raw row at a time.

mod catapult;
mod chronojump;
mod generic;
mod optojump;
mod statsports;
pub mod transforms;

use std::collections::{BTreeMap, HashMap};

use crate::detector::normalize_header;
use crate::error::IngestError;
use crate::schema::{self, fields, RawRow};
use crate::types::Vendor;
use transforms::SourceUnit;

/// Static description of one vendor's export format
#[derive(Debug)]
pub struct VendorProfile {
    pub vendor: Vendor,
    /// Substrings of a file name that identify the vendor outright
    pub filename_keywords: &'static [&'static str],
    /// Normalized header tokens and their weights
    pub signature: &'static [(&'static str, f64)],
    /// Lower-cased raw header -> canonical field
    pub columns: &'static [(&'static str, &'static str)],
    /// Vendor-specific missing markers, applied to numeric fields
    pub sentinels: &'static [&'static str],
    /// Units assumed for a canonical field when the header states none
    pub default_units: &'static [(&'static str, SourceUnit)],
}

impl Vendor {
    /// Static profile of a built-in vendor; `Custom` borrows the generic one
    pub fn profile(&self) -> &'static VendorProfile {
        match self {
            Vendor::Generic | Vendor::Custom => &generic::PROFILE,
            Vendor::Catapult => &catapult::PROFILE,
            Vendor::StatSports => &statsports::PROFILE,
            Vendor::Chronojump => &chronojump::PROFILE,
            Vendor::Optojump => &optojump::PROFILE,
        }
    }
}

fn table_key(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Raw header -> canonical field lookup, keyed on the trimmed lower-cased header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingTable {
    entries: HashMap<String, &'static str>,
}

impl MappingTable {
    fn from_static(columns: &[(&'static str, &'static str)]) -> Self {
        let mut table = MappingTable::default();
        for (raw, canonical) in columns {
            table.entries.insert(table_key(raw), canonical);
        }
        table
    }

    /// Build a caller-supplied table; every target must be a canonical field
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, IngestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = MappingTable::default();
        for (raw, canonical) in entries {
            let field = schema::find_canonical_ignore_case(canonical.as_ref()).ok_or_else(|| {
                IngestError::UnknownCanonicalField {
                    column: raw.as_ref().to_string(),
                    field: canonical.as_ref().to_string(),
                }
            })?;
            table.entries.insert(table_key(raw.as_ref()), field.name);
        }
        Ok(table)
    }

    /// Parse a JSON object of `{"Raw Header": "canonical_field"}`
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
        Self::from_entries(raw)
    }

    pub fn get(&self, header: &str) -> Option<&'static str> {
        self.entries.get(&table_key(header)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolution of one raw header
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub header: String,
    pub canonical: &'static str,
    pub unit: Option<SourceUnit>,
}

/// Header-level mapping decided once per file
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    /// Original header -> canonical field actually used
    pub mapping: BTreeMap<String, String>,
    pub unmapped: Vec<String>,
    /// Headers ignored because an earlier column already feeds the same field
    pub duplicates: Vec<(String, &'static str)>,
}

/// One mapped cell; `value` is `None` for blanks and sentinel markers
#[derive(Debug, Clone, PartialEq)]
pub struct MappedCell {
    pub canonical: &'static str,
    pub header: String,
    pub value: Option<String>,
    pub unit: Option<SourceUnit>,
}

/// A raw row translated to canonical names, still as text
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub line: usize,
    pub cells: Vec<MappedCell>,
    pub unmapped: Vec<String>,
}

impl MappedRow {
    pub fn get(&self, canonical: &str) -> Option<&MappedCell> {
        self.cells.iter().find(|c| c.canonical == canonical)
    }

    pub fn has_value(&self, canonical: &str) -> bool {
        self.get(canonical).is_some_and(|c| c.value.is_some())
    }
}

/// Vendor-specific translation from raw headers to canonical fields
#[derive(Debug, Clone)]
pub struct ColumnMapper {
    vendor: Vendor,
    table: MappingTable,
    profile: &'static VendorProfile,
}

impl ColumnMapper {
    /// Mapper for a built-in vendor: generic synonyms overlaid by the vendor table.
    ///
    /// `Vendor::Custom` without a table only matches canonical names.
    pub fn for_vendor(vendor: Vendor) -> Self {
        let table = match vendor {
            Vendor::Custom => MappingTable::default(),
            _ => {
                let mut table = MappingTable::from_static(generic::COLUMNS);
                let own = MappingTable::from_static(vendor.profile().columns);
                table.entries.extend(own.entries);
                table
            }
        };
        ColumnMapper {
            vendor,
            table,
            profile: vendor.profile(),
        }
    }

    /// Mapper for a caller-supplied table
    pub fn custom(table: MappingTable) -> Self {
        ColumnMapper {
            vendor: Vendor::Custom,
            table,
            profile: Vendor::Custom.profile(),
        }
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// Resolve one header: vendor table, then canonical names, then the
    /// normalized header with any unit suffix removed.
    pub fn resolve(&self, header: &str) -> Option<ResolvedColumn> {
        let normalized = normalize_header(header);
        let header_unit = transforms::detect_unit(&normalized);

        let canonical = self
            .table
            .get(header)
            .or_else(|| schema::find_canonical_ignore_case(header).map(|f| f.name))
            .or_else(|| schema::canonical_field(&normalized).map(|f| f.name))
            .or_else(|| {
                let (_, stem) = header_unit?;
                schema::canonical_field(stem)
                    .map(|f| f.name)
                    .or_else(|| self.table.get(&stem.replace('_', " ")))
            })?;

        let unit = header_unit.map(|(unit, _)| unit).or_else(|| {
            self.profile
                .default_units
                .iter()
                .find(|(field, _)| *field == canonical)
                .map(|(_, unit)| *unit)
        });

        Some(ResolvedColumn {
            header: header.to_string(),
            canonical,
            unit,
        })
    }

    /// Decide the mapping for a header row
    pub fn map_headers(&self, headers: &[String]) -> HeaderMap {
        let mut result = HeaderMap::default();
        let mut claimed: HashMap<&'static str, &str> = HashMap::new();
        for header in headers {
            match self.resolve(header) {
                Some(col) => {
                    if claimed.contains_key(col.canonical) {
                        result.duplicates.push((header.clone(), col.canonical));
                    } else {
                        claimed.insert(col.canonical, header);
                        result
                            .mapping
                            .insert(header.clone(), col.canonical.to_string());
                    }
                }
                None => result.unmapped.push(header.clone()),
            }
        }
        result
    }

    /// Translate one raw row. Unmapped columns are listed, never merged; when
    /// two columns feed the same field the first one wins, as in `map_headers`.
    pub fn map_row(&self, row: &RawRow) -> MappedRow {
        let mut cells: Vec<MappedCell> = Vec::new();
        let mut unmapped = Vec::new();

        for (header, raw) in &row.cells {
            let Some(col) = self.resolve(header) else {
                unmapped.push(header.clone());
                continue;
            };
            // Duplicates are reported by `map_headers`; the first column owns the field
            if cells.iter().any(|c| c.canonical == col.canonical) {
                continue;
            }
            cells.push(MappedCell {
                canonical: col.canonical,
                value: self.clean_value(col.canonical, raw),
                header: col.header,
                unit: col.unit,
            });
        }

        MappedRow {
            line: row.line,
            cells,
            unmapped,
        }
    }

    /// Per-field value transform: sentinels to null, categorical aliases to
    /// canonical codes. Unit conversion waits until the value is numeric.
    fn clean_value(&self, canonical: &str, raw: &str) -> Option<String> {
        let numeric = schema::canonical_field(canonical).is_some_and(|f| f.kind.is_numeric());
        let text = raw.trim_start_matches('\u{feff}').trim();
        if transforms::is_sentinel(text, numeric, self.profile.sentinels) {
            return None;
        }
        match canonical {
            fields::JUMP_TYPE => Some(transforms::normalize_jump_type(text)),
            _ => Some(text.to_string()),
        }
    }
}
