//! Derived jump metrics
//!
//! Back-fills metrics the file does not supply from jump physics:
//! - jump height from flight time, and flight time from jump height
//! - reactive strength index from height and contact time
//! - takeoff velocity from height
//! - peak power from height and body mass (Sayers)
//!
//! A value already present in the record is never overwritten, and every
//! filled field is recorded in [`ParsedRecord::derived`].

use crate::schema::{fields, FieldValue, ParsedRecord};

/// Standard gravity in m/s²
pub const GRAVITY: f64 = 9.81;

/// Jump height in cm from flight time in s: h = g·t²/8
pub fn calculate_jump_height(flight_time_s: f64) -> f64 {
    GRAVITY * flight_time_s * flight_time_s / 8.0 * 100.0
}

/// Flight time in s from jump height in cm; inverse of [`calculate_jump_height`]
pub fn calculate_flight_time(jump_height_cm: f64) -> f64 {
    if jump_height_cm <= 0.0 {
        return 0.0;
    }
    (8.0 * (jump_height_cm / 100.0) / GRAVITY).sqrt()
}

/// Reactive strength index as height (cm) over contact time (s).
///
/// A non-positive contact time yields 0.
pub fn calculate_rsi(jump_height_cm: f64, contact_time_s: f64) -> f64 {
    if contact_time_s <= 0.0 {
        return 0.0;
    }
    jump_height_cm / contact_time_s
}

/// Takeoff velocity in m/s: v = √(2·g·h)
pub fn calculate_takeoff_velocity(jump_height_cm: f64) -> f64 {
    if jump_height_cm <= 0.0 {
        return 0.0;
    }
    (2.0 * GRAVITY * jump_height_cm / 100.0).sqrt()
}

/// Sayers peak power in W, floored at zero
pub fn calculate_peak_power(jump_height_cm: f64, body_mass_kg: f64) -> f64 {
    (60.7 * jump_height_cm + 45.3 * body_mass_kg - 2055.0).max(0.0)
}

/// Fills missing jump metrics on a parsed record
pub struct MetricDeriver;

impl MetricDeriver {
    /// Run the rule chain in order; each step needs its inputs and an empty target
    pub fn derive(mut record: ParsedRecord) -> ParsedRecord {
        if let Some(t) = record.get_f64(fields::FLIGHT_TIME) {
            fill(&mut record, fields::JUMP_HEIGHT, calculate_jump_height(t));
        }
        if let Some(h) = record.get_f64(fields::JUMP_HEIGHT) {
            fill(&mut record, fields::FLIGHT_TIME, calculate_flight_time(h));
        }

        let height = record.get_f64(fields::JUMP_HEIGHT);
        if let (Some(h), Some(ct)) = (height, record.get_f64(fields::CONTACT_TIME)) {
            fill(&mut record, fields::RSI, calculate_rsi(h, ct));
        }
        if let Some(h) = height {
            fill(&mut record, fields::TAKEOFF_VELOCITY, calculate_takeoff_velocity(h));
        }
        if let (Some(h), Some(mass)) = (height, record.get_f64(fields::BODY_MASS)) {
            fill(&mut record, fields::PEAK_POWER, calculate_peak_power(h, mass));
        }

        record
    }
}

fn fill(record: &mut ParsedRecord, field: &str, value: f64) {
    if record.fields.contains_key(field) || !value.is_finite() {
        return;
    }
    record
        .fields
        .insert(field.to_string(), FieldValue::Float(value));
    record.derived.insert(field.to_string());
}
