// src/schema/mod.rs
pub mod arrow;
pub mod types;

pub use types::{AthleteRecord, NormalizedRecord, NormalizedTable, TARGET_COLUMNS};
