//! Canonical metric definitions
//!
//! Every mapper targets names from this table and the validator takes its
//! bounds from here. The table is immutable and built once per process.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical field names
pub mod fields {
    pub const ATHLETE_ID: &str = "athlete_id";
    pub const ATHLETE_NAME: &str = "athlete_name";
    pub const JUMP_TYPE: &str = "jump_type";
    pub const TIMESTAMP: &str = "timestamp";
    pub const DATE: &str = "date";
    pub const TIME: &str = "time";
    pub const SOURCE_SYSTEM: &str = "source_system";
    pub const SESSION_ID: &str = "session_id";
    pub const SESSION_NAME: &str = "session_name";
    pub const PERIOD_NAME: &str = "period_name";
    pub const NOTES: &str = "notes";
    pub const SIMULATED: &str = "simulated";
    pub const ATTEMPT: &str = "attempt";

    pub const FLIGHT_TIME: &str = "flight_time";
    pub const JUMP_HEIGHT: &str = "jump_height";
    pub const CONTACT_TIME: &str = "contact_time";
    pub const RSI: &str = "rsi";
    pub const TAKEOFF_VELOCITY: &str = "takeoff_velocity";
    pub const PEAK_POWER: &str = "peak_power";
    pub const BODY_MASS: &str = "body_mass";
    pub const DROP_HEIGHT: &str = "drop_height";

    pub const TOTAL_DISTANCE: &str = "total_distance";
    pub const HIGH_SPEED_DISTANCE: &str = "high_speed_distance";
    pub const SPRINT_DISTANCE: &str = "sprint_distance";
    pub const SPRINT_COUNT: &str = "sprint_count";
    pub const MAX_SPEED: &str = "max_speed";
    pub const AVG_SPEED: &str = "avg_speed";
    pub const ACCELERATIONS: &str = "accelerations";
    pub const DECELERATIONS: &str = "decelerations";
    pub const PLAYER_LOAD: &str = "player_load";
    pub const DURATION: &str = "duration";
    pub const MAX_HEART_RATE: &str = "max_heart_rate";
    pub const AVG_HEART_RATE: &str = "avg_heart_rate";
}

/// Storage type of a canonical value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Float,
    Integer,
    Text,
    Timestamp,
}

impl ValueKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Float | ValueKind::Integer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Identity,
    Context,
    Jump,
    Gps,
    Physiology,
}

/// How a metric combines when several rows describe one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Consolidation {
    None,
    Cumulative,
    Maximum,
    Count,
    Average,
}

/// One canonical metric definition
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CanonicalField {
    pub name: &'static str,
    pub unit: &'static str,
    pub kind: ValueKind,
    /// Hard bounds; values outside reject the row
    pub range: Option<(f64, f64)>,
    /// Soft bounds; values outside only warn
    pub expected: Option<(f64, f64)>,
    pub required: bool,
    pub category: Category,
    pub consolidation: Consolidation,
}

const fn meta(name: &'static str, kind: ValueKind, required: bool) -> CanonicalField {
    CanonicalField {
        name,
        unit: "",
        kind,
        range: None,
        expected: None,
        required,
        category: Category::Identity,
        consolidation: Consolidation::None,
    }
}

const fn context(name: &'static str, kind: ValueKind) -> CanonicalField {
    CanonicalField {
        category: Category::Context,
        ..meta(name, kind, false)
    }
}

const fn metric(
    name: &'static str,
    unit: &'static str,
    kind: ValueKind,
    category: Category,
    range: (f64, f64),
    expected: Option<(f64, f64)>,
    consolidation: Consolidation,
) -> CanonicalField {
    CanonicalField {
        name,
        unit,
        kind,
        range: Some(range),
        expected,
        required: false,
        category,
        consolidation,
    }
}

use fields::*;
use Category::{Gps, Jump, Physiology};
use Consolidation::{Average, Count, Cumulative, Maximum};
use ValueKind::{Float, Integer, Text, Timestamp};

/// The canonical schema, in validation order
pub static CANONICAL_FIELDS: &[CanonicalField] = &[
    meta(ATHLETE_ID, Text, true),
    meta(ATHLETE_NAME, Text, false),
    meta(JUMP_TYPE, Text, true),
    meta(TIMESTAMP, Timestamp, true),
    meta(SOURCE_SYSTEM, Text, true),
    context(DATE, Text),
    context(TIME, Text),
    context(SESSION_ID, Text),
    context(SESSION_NAME, Text),
    context(PERIOD_NAME, Text),
    context(NOTES, Text),
    context(SIMULATED, Text),
    metric(ATTEMPT, "", Integer, Category::Context, (1.0, 1000.0), None, Consolidation::None),
    metric(FLIGHT_TIME, "s", Float, Jump, (0.0, 2.0), Some((0.05, 1.2)), Maximum),
    metric(JUMP_HEIGHT, "cm", Float, Jump, (0.0, 150.0), Some((2.0, 90.0)), Maximum),
    metric(CONTACT_TIME, "s", Float, Jump, (0.0, 3.0), Some((0.08, 1.0)), Consolidation::None),
    metric(RSI, "cm/s", Float, Jump, (0.0, 1000.0), Some((10.0, 400.0)), Maximum),
    metric(TAKEOFF_VELOCITY, "m/s", Float, Jump, (0.0, 10.0), Some((0.5, 5.0)), Maximum),
    metric(PEAK_POWER, "W", Float, Jump, (0.0, 15000.0), Some((500.0, 8000.0)), Maximum),
    metric(
        BODY_MASS,
        "kg",
        Float,
        Physiology,
        (20.0, 250.0),
        Some((35.0, 150.0)),
        Consolidation::None,
    ),
    metric(DROP_HEIGHT, "cm", Float, Jump, (0.0, 150.0), None, Consolidation::None),
    metric(TOTAL_DISTANCE, "m", Float, Gps, (0.0, 50000.0), Some((0.0, 16000.0)), Cumulative),
    metric(HIGH_SPEED_DISTANCE, "m", Float, Gps, (0.0, 20000.0), None, Cumulative),
    metric(SPRINT_DISTANCE, "m", Float, Gps, (0.0, 10000.0), None, Cumulative),
    metric(SPRINT_COUNT, "", Integer, Gps, (0.0, 500.0), None, Count),
    metric(MAX_SPEED, "km/h", Float, Gps, (0.0, 50.0), Some((5.0, 40.0)), Maximum),
    metric(AVG_SPEED, "km/h", Float, Gps, (0.0, 40.0), None, Average),
    metric(ACCELERATIONS, "", Integer, Gps, (0.0, 2000.0), None, Cumulative),
    metric(DECELERATIONS, "", Integer, Gps, (0.0, 2000.0), None, Cumulative),
    metric(PLAYER_LOAD, "au", Float, Gps, (0.0, 5000.0), None, Cumulative),
    metric(DURATION, "min", Float, Gps, (0.0, 600.0), Some((1.0, 240.0)), Cumulative),
    metric(MAX_HEART_RATE, "bpm", Float, Physiology, (30.0, 250.0), Some((100.0, 220.0)), Maximum),
    metric(AVG_HEART_RATE, "bpm", Float, Physiology, (30.0, 250.0), None, Average),
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static CanonicalField>> =
    LazyLock::new(|| CANONICAL_FIELDS.iter().map(|f| (f.name, f)).collect());

/// Look up a canonical definition by exact name
pub fn canonical_field(name: &str) -> Option<&'static CanonicalField> {
    BY_NAME.get(name).copied()
}

/// Case-insensitive lookup against canonical names
pub fn find_canonical_ignore_case(name: &str) -> Option<&'static CanonicalField> {
    let needle = name.trim();
    CANONICAL_FIELDS
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(needle))
}

pub fn is_canonical(name: &str) -> bool {
    BY_NAME.contains_key(name)
}

/// Measured jump-mat timings and heights; their presence marks a file as a
/// jump export. Power, mass and attempt numbers also appear in GPS exports.
pub const JUMP_SIGNAL_METRICS: &[&str] = &[FLIGHT_TIME, JUMP_HEIGHT, CONTACT_TIME, RSI];

pub fn is_jump_metric(name: &str) -> bool {
    JUMP_SIGNAL_METRICS.contains(&name)
}
