//! Catapult OpenField exports
//!
//! One row per athlete per period, usually with a whole-session row whose
//! period name reads "Session" or "Session Total".

use super::VendorProfile;
use crate::schema::fields::*;
use crate::types::Vendor;

pub static PROFILE: VendorProfile = VendorProfile {
    vendor: Vendor::Catapult,
    filename_keywords: &["catapult", "openfield"],
    signature: &[
        ("player_name", 1.0),
        ("period_name", 2.0),
        ("period_number", 1.5),
        ("total_distance", 1.0),
        ("maximum_velocity", 2.0),
        ("total_player_load", 3.0),
        ("player_load", 2.0),
        ("velocity_band", 2.0),
        ("activity_name", 1.5),
        ("position_name", 1.0),
        ("ima_accel", 2.0),
    ],
    columns: &[
        ("player name", ATHLETE_NAME),
        ("player id", ATHLETE_ID),
        ("activity id", SESSION_ID),
        ("activity name", SESSION_NAME),
        ("period name", PERIOD_NAME),
        ("start time", TIME),
        ("total distance", TOTAL_DISTANCE),
        ("total distance (m)", TOTAL_DISTANCE),
        ("maximum velocity", MAX_SPEED),
        ("maximum velocity (km/h)", MAX_SPEED),
        ("max vel (m/s)", MAX_SPEED),
        ("total player load", PLAYER_LOAD),
        ("player load", PLAYER_LOAD),
        ("velocity band 5 total distance", HIGH_SPEED_DISTANCE),
        ("velocity band 6 total distance", SPRINT_DISTANCE),
        ("velocity band 6 total effort count", SPRINT_COUNT),
        ("sprint efforts", SPRINT_COUNT),
        ("ima accel high", ACCELERATIONS),
        ("acceleration efforts", ACCELERATIONS),
        ("ima decel high", DECELERATIONS),
        ("deceleration efforts", DECELERATIONS),
        ("total duration", DURATION),
        ("field time", DURATION),
        ("maximum heart rate", MAX_HEART_RATE),
        ("average heart rate", AVG_HEART_RATE),
        ("average velocity", AVG_SPEED),
    ],
    sentinels: &[],
    default_units: &[],
};
