//! STATSports Apex / Sonra exports
//!
//! Drill rows plus an optional "Session Total" row; speeds are in m/s.

use super::{transforms::SourceUnit, VendorProfile};
use crate::schema::fields::*;
use crate::types::Vendor;

pub static PROFILE: VendorProfile = VendorProfile {
    vendor: Vendor::StatSports,
    filename_keywords: &["statsports", "apex", "sonra"],
    signature: &[
        ("player_display_name", 3.0),
        ("drill_title", 3.0),
        ("session_title", 1.5),
        ("hsr_distance", 1.5),
        ("high_speed_running", 1.5),
        ("sprint_distance", 1.0),
        ("max_speed", 1.0),
        ("dynamic_stress_load", 3.0),
        ("hml_distance", 2.5),
        ("step_balance", 2.0),
        ("accelerations", 0.5),
        ("decelerations", 0.5),
    ],
    columns: &[
        ("player display name", ATHLETE_NAME),
        ("player id", ATHLETE_ID),
        ("session id", SESSION_ID),
        ("session title", SESSION_NAME),
        ("drill title", PERIOD_NAME),
        ("session date", DATE),
        ("drill date", DATE),
        ("drill start time", TIME),
        ("total distance", TOTAL_DISTANCE),
        ("hsr distance", HIGH_SPEED_DISTANCE),
        ("high speed running (absolute)", HIGH_SPEED_DISTANCE),
        ("sprint distance", SPRINT_DISTANCE),
        ("sprints", SPRINT_COUNT),
        ("number of sprints", SPRINT_COUNT),
        ("max speed", MAX_SPEED),
        ("accelerations", ACCELERATIONS),
        ("decelerations", DECELERATIONS),
        ("drill duration", DURATION),
        ("total time", DURATION),
        ("heart rate max", MAX_HEART_RATE),
        ("heart rate average", AVG_HEART_RATE),
        ("average speed", AVG_SPEED),
    ],
    sentinels: &[],
    default_units: &[
        (MAX_SPEED, SourceUnit::MetersPerSecond),
        (AVG_SPEED, SourceUnit::MetersPerSecond),
    ],
};
