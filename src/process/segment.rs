// src/process/segment.rs
use serde::Serialize;
use tracing::{debug, instrument, trace};

use super::load::LayoutMode;
use super::raw_table::{columns, CleanedTable, RawRow};
use super::utils::title_case;
use crate::error::{ConvertError, Result};
use crate::schema::AthleteRecord;

/// One event's slice of the cleaned table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventBlock {
    pub title: String,
    /// Index of the "Age" header row.
    pub header_row: usize,
    /// First body row (header + 3).
    pub body_start: usize,
    /// One past the last body row: the terminator's index, or the table length.
    pub body_end: usize,
}

impl EventBlock {
    pub fn body_len(&self) -> usize {
        self.body_end.saturating_sub(self.body_start)
    }
}

/// Row indices of every event header, ascending.
pub fn find_event_headers(table: &CleanedTable) -> Vec<usize> {
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get(columns::KIND) == Some(columns::HEADER_TOKEN))
        .map(|(idx, _)| idx)
        .collect()
}

/// Split the table into event blocks, in header order.
///
/// A block's body runs from three rows past its header up to the first row
/// whose column 0 equals `marker`. Nothing else is checked: a later "Age"
/// header before the marker is absorbed as a body row (while still opening a
/// block of its own, so the rows after it belong to both), and a body cell that
/// happens to read the marker text ends the block early. A block with no
/// terminator runs to the end of the table.
#[instrument(level = "debug", skip(table), fields(rows = table.len()))]
pub fn segment_events(table: &CleanedTable, marker: &str) -> Result<Vec<EventBlock>> {
    let n = table.len();
    let mut blocks = Vec::new();

    for header_row in find_event_headers(table) {
        let title = table
            .row(header_row)
            .and_then(|r| r.get(columns::EVENT_TITLE))
            .ok_or(ConvertError::MissingField {
                row: header_row,
                column: columns::EVENT_TITLE,
                field: "EventTitle",
            })?
            .to_string();

        let body_start = header_row + columns::BODY_OFFSET;
        let mut body_end = n;
        for idx in body_start..n {
            if table.row(idx).and_then(|r| r.get(columns::KIND)) == Some(marker) {
                body_end = idx;
                break;
            }
        }

        trace!(%title, header_row, body_start, body_end, "event block");
        blocks.push(EventBlock {
            title,
            header_row,
            body_start,
            body_end,
        });
    }

    debug!(events = blocks.len(), "segmented table");
    Ok(blocks)
}

/// Build the record for one body row.
pub fn extract_record(
    row: &RawRow,
    source_row: usize,
    event_title: &str,
    layout: LayoutMode,
) -> Result<AthleteRecord> {
    let owned = |col: usize| row.get(col).map(str::to_string);

    let name = row.get(columns::NAME).ok_or(ConvertError::InvalidName {
        row: source_row,
        column: columns::NAME,
    })?;
    let performance = row
        .get(columns::PERFORMANCE)
        .ok_or(ConvertError::MissingField {
            row: source_row,
            column: columns::PERFORMANCE,
            field: "Performance",
        })?;

    Ok(AthleteRecord {
        reg_no: owned(layout.reg_no_column()),
        preferred_name: title_case(name),
        age_id: owned(columns::AGE_ID),
        gender_id: owned(columns::GENDER_ID),
        event_title: event_title.to_string(),
        performance: performance.to_string(),
        competed: 0,
        placing: owned(layout.placing_column()),
        centre: owned(columns::CENTRE),
        source_row,
    })
}

/// Segment the table and emit one record per body row, in table order.
pub fn extract_records(table: &CleanedTable, layout: LayoutMode) -> Result<Vec<AthleteRecord>> {
    let blocks = segment_events(table, layout.marker())?;
    extract_block_records(table, &blocks, layout)
}

/// Emit one record per body row of already segmented `blocks`. Blocks may
/// overlap, in which case the shared rows are emitted once per block.
#[instrument(level = "debug", skip_all, fields(blocks = blocks.len()))]
pub fn extract_block_records(
    table: &CleanedTable,
    blocks: &[EventBlock],
    layout: LayoutMode,
) -> Result<Vec<AthleteRecord>> {
    let mut records = Vec::new();

    for block in blocks {
        for idx in block.body_start..block.body_end {
            let row = table.row(idx).ok_or_else(|| {
                ConvertError::MalformedInput(format!("row {idx} vanished during extraction"))
            })?;
            records.push(extract_record(row, idx, &block.title, layout)?);
        }
        debug!(event = %block.title, athletes = block.body_len(), "extracted event");
    }

    Ok(records)
}
