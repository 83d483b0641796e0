//! Chronojump jump-mat exports
//!
//! Headers come in Spanish or English, "-1" marks a missing measurement and
//! the "Simulated" column flags tests recorded without a real contact mat.

use super::VendorProfile;
use crate::schema::fields::*;
use crate::types::Vendor;

pub static PROFILE: VendorProfile = VendorProfile {
    vendor: Vendor::Chronojump,
    filename_keywords: &["chronojump"],
    signature: &[
        ("jumper", 2.0),
        ("person", 1.0),
        ("tv", 1.5),
        ("tc", 1.5),
        ("fall", 2.0),
        ("simulated", 2.5),
        ("simulado", 2.5),
        ("uniqueid", 2.0),
        ("saltador", 2.0),
        ("caida", 1.5),
        ("tiempo_de_vuelo", 1.5),
        ("description", 0.5),
    ],
    columns: &[
        ("person", ATHLETE_NAME),
        ("jumper", ATHLETE_NAME),
        ("persona", ATHLETE_NAME),
        ("saltador", ATHLETE_NAME),
        ("person id", ATHLETE_ID),
        ("personid", ATHLETE_ID),
        ("type", JUMP_TYPE),
        ("tipo", JUMP_TYPE),
        ("tv", FLIGHT_TIME),
        ("tv (s)", FLIGHT_TIME),
        ("tc", CONTACT_TIME),
        ("tc (s)", CONTACT_TIME),
        ("fall", DROP_HEIGHT),
        ("caida", DROP_HEIGHT),
        ("caída", DROP_HEIGHT),
        ("weight", BODY_MASS),
        ("peso", BODY_MASS),
        ("height", JUMP_HEIGHT),
        ("altura", JUMP_HEIGHT),
        ("session", SESSION_ID),
        ("sesion", SESSION_ID),
        ("sesión", SESSION_ID),
        ("description", NOTES),
        ("descripcion", NOTES),
        ("descripción", NOTES),
        ("simulated", SIMULATED),
        ("simulado", SIMULATED),
        ("power", PEAK_POWER),
        ("potencia", PEAK_POWER),
    ],
    sentinels: &["-1", "-1.0", "-1,0"],
    default_units: &[],
};
