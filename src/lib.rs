// src/lib.rs
//! Reshape a timing-system race-results export into the flat table the
//! results-management system imports.
pub mod config;
pub mod error;
pub mod process;
pub mod schema;
pub mod table;

pub use config::{ConvertConfig, OutputFormat};
pub use error::{ConvertError, Result};
pub use process::{convert, convert_with, inspect, ConversionSummary, Inspection};
