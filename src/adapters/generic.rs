//! Generic column synonyms
//!
//! Shared by every built-in vendor; vendor tables are layered on top.

use super::VendorProfile;
use crate::schema::fields::*;
use crate::types::Vendor;

pub static PROFILE: VendorProfile = VendorProfile {
    vendor: Vendor::Generic,
    filename_keywords: &[],
    signature: &[],
    columns: COLUMNS,
    sentinels: &[],
    default_units: &[],
};

pub(super) static COLUMNS: &[(&str, &str)] = &[
    // identity
    ("athlete id", ATHLETE_ID),
    ("athleteid", ATHLETE_ID),
    ("player id", ATHLETE_ID),
    ("subject id", ATHLETE_ID),
    ("subject", ATHLETE_ID),
    ("id", ATHLETE_ID),
    ("athlete code", ATHLETE_ID),
    ("athlete", ATHLETE_NAME),
    ("athlete name", ATHLETE_NAME),
    ("name", ATHLETE_NAME),
    ("player", ATHLETE_NAME),
    ("player name", ATHLETE_NAME),
    ("full name", ATHLETE_NAME),
    ("atleta", ATHLETE_NAME),
    ("nombre", ATHLETE_NAME),
    // time
    ("timestamp", TIMESTAMP),
    ("datetime", TIMESTAMP),
    ("date time", TIMESTAMP),
    ("date/time", TIMESTAMP),
    ("fecha y hora", TIMESTAMP),
    ("date", DATE),
    ("session date", DATE),
    ("fecha", DATE),
    ("data", DATE),
    ("datum", DATE),
    ("time", TIME),
    ("start time", TIME),
    ("hora", TIME),
    ("ora", TIME),
    // context
    ("source", SOURCE_SYSTEM),
    ("source system", SOURCE_SYSTEM),
    ("system", SOURCE_SYSTEM),
    ("device", SOURCE_SYSTEM),
    ("session id", SESSION_ID),
    ("session", SESSION_ID),
    ("session name", SESSION_NAME),
    ("session title", SESSION_NAME),
    ("activity", SESSION_NAME),
    ("activity name", SESSION_NAME),
    ("period", PERIOD_NAME),
    ("period name", PERIOD_NAME),
    ("split", PERIOD_NAME),
    ("split name", PERIOD_NAME),
    ("drill", PERIOD_NAME),
    ("segment", PERIOD_NAME),
    ("label", PERIOD_NAME),
    ("notes", NOTES),
    ("note", NOTES),
    ("comment", NOTES),
    ("comments", NOTES),
    ("description", NOTES),
    ("observaciones", NOTES),
    ("simulated", SIMULATED),
    ("attempt", ATTEMPT),
    ("trial", ATTEMPT),
    ("rep", ATTEMPT),
    ("repetition", ATTEMPT),
    ("intento", ATTEMPT),
    // jump
    ("jump type", JUMP_TYPE),
    ("test", JUMP_TYPE),
    ("test type", JUMP_TYPE),
    ("type", JUMP_TYPE),
    ("tipo", JUMP_TYPE),
    ("tipo de salto", JUMP_TYPE),
    ("flight time", FLIGHT_TIME),
    ("flight time (s)", FLIGHT_TIME),
    ("flight time (ms)", FLIGHT_TIME),
    ("tiempo de vuelo", FLIGHT_TIME),
    ("jump height", JUMP_HEIGHT),
    ("jump height (cm)", JUMP_HEIGHT),
    ("jump height (m)", JUMP_HEIGHT),
    ("height", JUMP_HEIGHT),
    ("height (cm)", JUMP_HEIGHT),
    ("height (m)", JUMP_HEIGHT),
    ("altura", JUMP_HEIGHT),
    ("contact time", CONTACT_TIME),
    ("contact time (s)", CONTACT_TIME),
    ("contact time (ms)", CONTACT_TIME),
    ("ground contact time", CONTACT_TIME),
    ("gct", CONTACT_TIME),
    ("tiempo de contacto", CONTACT_TIME),
    ("reactive strength index", RSI),
    ("takeoff velocity", TAKEOFF_VELOCITY),
    ("take-off velocity", TAKEOFF_VELOCITY),
    ("takeoff velocity (m/s)", TAKEOFF_VELOCITY),
    ("peak power", PEAK_POWER),
    ("peak power (w)", PEAK_POWER),
    ("power", PEAK_POWER),
    ("body mass", BODY_MASS),
    ("body weight", BODY_MASS),
    ("weight", BODY_MASS),
    ("weight (kg)", BODY_MASS),
    ("mass", BODY_MASS),
    ("drop height", DROP_HEIGHT),
    ("drop height (cm)", DROP_HEIGHT),
    ("box height", DROP_HEIGHT),
    // gps
    ("total distance", TOTAL_DISTANCE),
    ("total distance (m)", TOTAL_DISTANCE),
    ("distance", TOTAL_DISTANCE),
    ("distance (m)", TOTAL_DISTANCE),
    ("distance (km)", TOTAL_DISTANCE),
    ("high speed distance", HIGH_SPEED_DISTANCE),
    ("high speed running", HIGH_SPEED_DISTANCE),
    ("hsr", HIGH_SPEED_DISTANCE),
    ("hsr distance", HIGH_SPEED_DISTANCE),
    ("sprint distance", SPRINT_DISTANCE),
    ("sprints", SPRINT_COUNT),
    ("sprint count", SPRINT_COUNT),
    ("number of sprints", SPRINT_COUNT),
    ("max speed", MAX_SPEED),
    ("max speed (km/h)", MAX_SPEED),
    ("max speed (m/s)", MAX_SPEED),
    ("top speed", MAX_SPEED),
    ("max velocity", MAX_SPEED),
    ("maximum velocity", MAX_SPEED),
    ("vmax", MAX_SPEED),
    ("avg speed", AVG_SPEED),
    ("average speed", AVG_SPEED),
    ("mean speed", AVG_SPEED),
    ("accelerations", ACCELERATIONS),
    ("accels", ACCELERATIONS),
    ("decelerations", DECELERATIONS),
    ("decels", DECELERATIONS),
    ("player load", PLAYER_LOAD),
    ("playerload", PLAYER_LOAD),
    ("duration", DURATION),
    ("duration (min)", DURATION),
    ("total duration", DURATION),
    ("minutes", DURATION),
    ("max hr", MAX_HEART_RATE),
    ("max heart rate", MAX_HEART_RATE),
    ("hr max", MAX_HEART_RATE),
    ("avg hr", AVG_HEART_RATE),
    ("average heart rate", AVG_HEART_RATE),
    ("hr avg", AVG_HEART_RATE),
];
