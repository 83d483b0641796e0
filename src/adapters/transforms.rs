//! Per-field value transforms
//!
//! Sentinel markers collapse to null, jump-type aliases collapse to the
//! canonical codes, and numeric values move into canonical units either from an
//! explicit header suffix or from magnitude heuristics.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::schema::fields;
use crate::types::JumpType;

/// Markers every vendor uses for "no value"
pub const COMMON_SENTINELS: &[&str] = &[
    "", "-", "--", "---", "n/a", "na", "null", "none", "nan", "#n/a", "#value!", "#div/0!",
];

/// Unit stated by a source column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Millimeters,
    Centimeters,
    Meters,
    Kilometers,
    CentimetersPerSecond,
    MetersPerSecond,
    KilometersPerHour,
}

/// Suffixes on a normalized header, longest first so `_m_s` wins over `_s`
const UNIT_SUFFIXES: &[(&str, SourceUnit)] = &[
    ("_cm_s", SourceUnit::CentimetersPerSecond),
    ("_m_s", SourceUnit::MetersPerSecond),
    ("_mps", SourceUnit::MetersPerSecond),
    ("_km_h", SourceUnit::KilometersPerHour),
    ("_kmh", SourceUnit::KilometersPerHour),
    ("_kph", SourceUnit::KilometersPerHour),
    ("_min", SourceUnit::Minutes),
    ("_ms", SourceUnit::Milliseconds),
    ("_mm", SourceUnit::Millimeters),
    ("_cm", SourceUnit::Centimeters),
    ("_km", SourceUnit::Kilometers),
    ("_s", SourceUnit::Seconds),
    ("_m", SourceUnit::Meters),
];

/// Unit hinted by a normalized header, with the header stem it was attached to
pub fn detect_unit(normalized_header: &str) -> Option<(SourceUnit, &str)> {
    UNIT_SUFFIXES.iter().find_map(|(suffix, unit)| {
        normalized_header
            .strip_suffix(suffix)
            .filter(|stem| !stem.is_empty())
            .map(|stem| (*unit, stem))
    })
}

/// Convert `value` into the canonical unit of `field`.
///
/// An explicit source unit always wins; without one, values implausible for
/// the canonical unit are rescaled.
pub fn to_canonical_unit(field: &str, value: f64, unit: Option<SourceUnit>) -> f64 {
    match unit {
        Some(unit) => convert_explicit(field, value, unit),
        None => apply_magnitude_heuristic(field, value),
    }
}

fn convert_explicit(field: &str, value: f64, unit: SourceUnit) -> f64 {
    use SourceUnit::*;
    let canonical_unit = crate::schema::canonical_field(field)
        .map(|f| f.unit)
        .unwrap_or("");
    match (canonical_unit, unit) {
        ("cm", Meters) => value * 100.0,
        ("cm", Millimeters) => value / 10.0,
        ("s", Milliseconds) => value / 1000.0,
        ("s", Minutes) => value * 60.0,
        ("m", Kilometers) => value * 1000.0,
        ("m", Centimeters) => value / 100.0,
        ("m/s", CentimetersPerSecond) => value / 100.0,
        ("m/s", KilometersPerHour) => value / 3.6,
        ("km/h", MetersPerSecond) => value * 3.6,
        ("km/h", CentimetersPerSecond) => value * 0.036,
        ("min", Seconds) => value / 60.0,
        ("min", Milliseconds) => value / 60_000.0,
        _ => value,
    }
}

fn apply_magnitude_heuristic(field: &str, value: f64) -> f64 {
    match field {
        // Under 2 cm is not a jump; it is metres
        fields::JUMP_HEIGHT | fields::DROP_HEIGHT if value > 0.0 && value < 2.0 => value * 100.0,
        // No flight or contact phase lasts 10 s; these are milliseconds
        fields::FLIGHT_TIME | fields::CONTACT_TIME if value >= 10.0 => value / 1000.0,
        fields::TAKEOFF_VELOCITY if value > 20.0 => value / 100.0,
        _ => value,
    }
}

/// Lowercase, strip accents, collapse punctuation and whitespace runs to one space
pub fn fold_text(value: &str) -> String {
    let stripped: String = value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    stripped
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `true` when the text is a "no value" marker for this field
pub fn is_sentinel(value: &str, numeric: bool, vendor_sentinels: &[&str]) -> bool {
    let trimmed = value.trim();
    COMMON_SENTINELS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(trimmed))
        || (numeric && vendor_sentinels.iter().any(|s| *s == trimmed))
}

static JUMP_ALIASES: &[(&str, JumpType)] = &[
    ("countermovement", JumpType::Cmj),
    ("countermovement jump", JumpType::Cmj),
    ("counter movement jump", JumpType::Cmj),
    ("counter movement", JumpType::Cmj),
    ("salto con contramovimiento", JumpType::Cmj),
    ("salto en contramovimiento", JumpType::Cmj),
    ("contramovimiento", JumpType::Cmj),
    ("salto com contramovimento", JumpType::Cmj),
    ("salto con contromovimento", JumpType::Cmj),
    ("saut avec contre mouvement", JumpType::Cmj),
    ("squat jump", JumpType::Sj),
    ("squat", JumpType::Sj),
    ("static jump", JumpType::Sj),
    ("salto sin contramovimiento", JumpType::Sj),
    ("salto desde sentadilla", JumpType::Sj),
    ("salto squat", JumpType::Sj),
    ("salto agachado", JumpType::Sj),
    ("saut sans contre mouvement", JumpType::Sj),
    ("abalakov", JumpType::Abalakov),
    ("salto abalakov", JumpType::Abalakov),
    ("cmj with arms", JumpType::Abalakov),
    ("cmj arms", JumpType::Abalakov),
    ("cmj con brazos", JumpType::Abalakov),
    ("cmj brazos", JumpType::Abalakov),
    ("drop jump", JumpType::DropJump),
    ("depth jump", JumpType::DropJump),
    ("drop", JumpType::DropJump),
    ("salto en caida", JumpType::DropJump),
    ("salto de caida", JumpType::DropJump),
    ("caida", JumpType::DropJump),
    ("salto em queda", JumpType::DropJump),
    ("salto in caduta", JumpType::DropJump),
    ("saut en contrebas", JumpType::DropJump),
    ("niedersprung", JumpType::DropJump),
    ("reactive jump", JumpType::ReactiveJump),
    ("reactive jumps", JumpType::ReactiveJump),
    ("repeated jump", JumpType::ReactiveJump),
    ("repeated jumps", JumpType::ReactiveJump),
    ("rebound jump", JumpType::ReactiveJump),
    ("hopping", JumpType::ReactiveJump),
    ("saltos reactivos", JumpType::ReactiveJump),
    ("saltos repetidos", JumpType::ReactiveJump),
    ("salti ripetuti", JumpType::ReactiveJump),
    ("reaktivsprung", JumpType::ReactiveJump),
];

static DROP_WITH_HEIGHT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: dj 40, drop jump 30 cm, salto en caida 45cm
    Regex::new(r"^(?:dj|drop jump|drop|salto en caida|salto de caida)\s*\d+(?:\s*cm)?$").ok()
});

/// Collapse a jump-type label to its canonical code.
///
/// Unknown labels come back folded but otherwise untouched so the validator
/// can still report them.
pub fn normalize_jump_type(value: &str) -> String {
    classify_jump_type(value)
        .map(|jt| jt.code().to_string())
        .unwrap_or_else(|| fold_text(value))
}

pub fn classify_jump_type(value: &str) -> Option<JumpType> {
    let folded = fold_text(value);
    if folded.is_empty() {
        return None;
    }
    if let Some(jt) = JumpType::from_code(&folded) {
        return Some(jt);
    }
    if let Some((_, jt)) = JUMP_ALIASES.iter().find(|(alias, _)| *alias == folded) {
        return Some(*jt);
    }
    if DROP_WITH_HEIGHT
        .as_ref()
        .is_some_and(|re| re.is_match(&folded))
    {
        return Some(JumpType::DropJump);
    }
    // Variant codes such as "DJa", "DJna", "SJl", "CMJl" keep their base type
    let first = folded.split(' ').next().unwrap_or("");
    JumpType::ALL.into_iter().find(|jt| {
        let code = jt.code();
        first.starts_with(code)
            && first.len() <= code.len() + 2
            && first[code.len()..].chars().all(|c| c.is_ascii_alphabetic())
    })
}

/// Parse `hh:mm:ss`, `mm:ss` or `hh:mm:ss.fff` clock text into minutes
pub fn parse_clock_minutes(value: &str) -> Option<f64> {
    let parts: Vec<&str> = value.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }
    let numbers: Option<Vec<f64>> = parts
        .iter()
        .map(|p| {
            let p = p.trim();
            if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit() || c == '.') {
                None
            } else {
                p.parse::<f64>().ok()
            }
        })
        .collect();
    let numbers = numbers?;
    let seconds = match numbers.as_slice() {
        [m, s] => m * 60.0 + s,
        [h, m, s] => h * 3600.0 + m * 60.0 + s,
        _ => return None,
    };
    Some(seconds / 60.0)
}

/// Truthiness of a "simulated" marker column
pub fn is_truthy_flag(value: &str) -> bool {
    matches!(
        fold_text(value).as_str(),
        "true" | "1" | "yes" | "y" | "si" | "sim" | "simulated" | "simulado"
    ) || value.trim() == "-1"
}
