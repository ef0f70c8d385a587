// src/process/load.rs
use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument, warn};

use super::raw_table::{columns, CleanedTable, RawRow};
use crate::error::{ConvertError, Result};

/// Which timing-system layout produced the export. Decided once per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutMode {
    Gated,
    NonGated,
}

impl LayoutMode {
    /// Classify from the probe cell: any "N" means non-gated.
    pub fn from_probe(probe: Option<&str>) -> Self {
        match probe {
            Some(p) if p.contains('N') => LayoutMode::NonGated,
            _ => LayoutMode::Gated,
        }
    }

    /// Column-0 token that terminates an event block in this layout.
    pub fn marker(self) -> &'static str {
        match self {
            LayoutMode::Gated => "TSGR",
            LayoutMode::NonGated => "TSNGR",
        }
    }

    pub fn reg_no_column(self) -> usize {
        match self {
            LayoutMode::Gated => columns::GATED_REG_NO,
            LayoutMode::NonGated => columns::NON_GATED_REG_NO,
        }
    }

    pub fn placing_column(self) -> usize {
        match self {
            LayoutMode::Gated => columns::GATED_PLACING,
            LayoutMode::NonGated => columns::KIND,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::Gated => f.write_str("gated"),
            LayoutMode::NonGated => f.write_str("non-gated"),
        }
    }
}

/// Drop rows with nothing in column 0, keep the first `columns::WIDTH`
/// columns, and detect the layout from the probe cell.
#[instrument(level = "debug", skip(rows), fields(input_rows = rows.len()))]
pub fn load_rows(rows: Vec<RawRow>) -> Result<(CleanedTable, LayoutMode)> {
    let total = rows.len();
    let mut kept = Vec::with_capacity(total);

    for mut row in rows {
        if row.get(columns::KIND).is_none() {
            continue;
        }
        if row.len() < columns::WIDTH {
            return Err(ConvertError::MalformedInput(format!(
                "row {} has {} columns, need at least {}",
                kept.len(),
                row.len(),
                columns::WIDTH
            )));
        }
        row.truncate(columns::WIDTH);
        kept.push(row);
    }
    debug!(kept = kept.len(), dropped = total - kept.len(), "cleaned rows");

    if kept.len() <= columns::PROBE_ROW {
        return Err(ConvertError::MalformedInput(format!(
            "only {} usable rows; the layout probe needs at least {}",
            kept.len(),
            columns::PROBE_ROW + 1
        )));
    }

    let probe = kept[columns::PROBE_ROW].get(columns::PROBE_COLUMN);
    if probe.is_none() {
        warn!("layout probe cell is empty; assuming gated layout");
    }
    let layout = LayoutMode::from_probe(probe);
    debug!(%layout, marker = layout.marker(), "detected layout");

    Ok((CleanedTable::from_rows(kept), layout))
}
