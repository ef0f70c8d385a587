// src/process/raw_table.rs

/// Positional column contract for the timing-system export.
///
/// Header names in the export are not trusted; every field is addressed by
/// index. If the export format drifts these constants are the single place to
/// update, and the loader rejects rows that are too short to honour them.
pub mod columns {
    /// Number of leading columns the pipeline reads. Anything wider is dropped.
    pub const WIDTH: usize = 11;

    /// Row-type cell: "Age" on header rows, the marker token on terminators,
    /// the placing on non-gated body rows.
    pub const KIND: usize = 0;
    /// Raw `H:M:S[.fraction]` performance on body rows; layout probe on row 1.
    pub const PERFORMANCE: usize = 1;
    /// Placing (gated) or registration number (non-gated).
    pub const GATED_PLACING: usize = 2;
    pub const NON_GATED_REG_NO: usize = 2;
    /// Registration number (gated).
    pub const GATED_REG_NO: usize = 3;
    /// Athlete name on body rows, event title on header rows.
    pub const NAME: usize = 5;
    pub const EVENT_TITLE: usize = 5;
    pub const AGE_ID: usize = 6;
    pub const GENDER_ID: usize = 7;
    pub const CENTRE: usize = 10;

    /// Probe cell used to tell gated from non-gated exports.
    pub const PROBE_ROW: usize = 1;
    pub const PROBE_COLUMN: usize = PERFORMANCE;

    /// Cell value in `KIND` marking an event header row.
    pub const HEADER_TOKEN: &str = "Age";
    /// Body rows start this many rows after the header.
    pub const BODY_OFFSET: usize = 3;
}

/// One row of the export, addressed positionally. `None` is a missing cell,
/// which is distinct from a cell that holds text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    cells: Vec<Option<String>>,
}

impl RawRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Text of column `idx`, or `None` when the cell is missing or out of range.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).and_then(|c| c.as_deref())
    }

    pub(crate) fn truncate(&mut self, width: usize) {
        self.cells.truncate(width);
    }
}

/// Rows that survived cleaning, re-indexed contiguously from 0 in source order.
#[derive(Debug, Clone, Default)]
pub struct CleanedTable {
    rows: Vec<RawRow>,
}

impl CleanedTable {
    pub(crate) fn from_rows(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<&RawRow> {
        self.rows.get(idx)
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }
}
