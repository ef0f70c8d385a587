// src/table/mod.rs
//! The tabular file collaborators: reading the timing-system export and
//! writing the normalized table.
pub mod read;
pub mod write;

pub use read::read_table;
pub use write::write_table;
