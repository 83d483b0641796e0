//! Canonical record schema
//!
//! The fixed set of metric definitions every vendor export is mapped into,
//! plus the typed record produced for each accepted row.

mod canonical;
mod record;

pub use canonical::*;
pub use record::*;
