//! Microgate Optojump exports
//!
//! Italian or English headers. Older firmware writes flight and contact times
//! in milliseconds without saying so; the magnitude heuristics pick that up.

use super::VendorProfile;
use crate::schema::fields::*;
use crate::types::Vendor;

pub static PROFILE: VendorProfile = VendorProfile {
    vendor: Vendor::Optojump,
    filename_keywords: &["optojump", "microgate"],
    signature: &[
        ("tempo_di_volo", 3.0),
        ("tempo_di_contatto", 3.0),
        ("altezza", 2.0),
        ("potenza", 1.5),
        ("optojump", 3.0),
        ("tv", 1.0),
        ("tc", 1.0),
        ("ritmo", 2.0),
        ("atleta", 1.0),
        ("test", 0.5),
    ],
    columns: &[
        ("atleta", ATHLETE_NAME),
        ("athlete", ATHLETE_NAME),
        ("id atleta", ATHLETE_ID),
        ("athlete id", ATHLETE_ID),
        ("test", JUMP_TYPE),
        ("tipo test", JUMP_TYPE),
        ("tv", FLIGHT_TIME),
        ("tempo di volo", FLIGHT_TIME),
        ("tc", CONTACT_TIME),
        ("tempo di contatto", CONTACT_TIME),
        ("altezza", JUMP_HEIGHT),
        ("altezza [cm]", JUMP_HEIGHT),
        ("height [cm]", JUMP_HEIGHT),
        ("potenza", PEAK_POWER),
        ("peso", BODY_MASS),
        ("weight [kg]", BODY_MASS),
        ("data", DATE),
        ("ora", TIME),
        ("note", NOTES),
    ],
    sentinels: &["-1"],
    default_units: &[],
};
