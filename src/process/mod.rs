// src/process/mod.rs
//! Loader → segmenter/extractor → normalizer, run once per export.
pub mod convert;
pub mod load;
pub mod normalize;
pub mod raw_table;
pub mod segment;
pub mod utils;

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

use crate::config::ConvertConfig;
use crate::error::Result;
use crate::schema::NormalizedTable;
use crate::table::{read_table, write_table};
use load::{load_rows, LayoutMode};
use normalize::{normalize, EventVocabulary};
use raw_table::RawRow;
use segment::{extract_block_records, segment_events, EventBlock};

/// What a finished conversion produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub layout: LayoutMode,
    pub events: usize,
    pub records: usize,
    pub output: PathBuf,
}

/// Loader and segmenter view of an export, without extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub layout: LayoutMode,
    pub rows: usize,
    pub blocks: Vec<EventBlock>,
}

/// Run the in-memory pipeline over raw rows.
#[instrument(level = "info", skip_all, fields(input_rows = rows.len()))]
pub fn run_pipeline(
    rows: Vec<RawRow>,
    vocab: &EventVocabulary,
) -> Result<(LayoutMode, usize, NormalizedTable)> {
    let (table, layout) = load_rows(rows)?;
    let blocks = segment_events(&table, layout.marker())?;
    let events = blocks.len();
    let records = extract_block_records(&table, &blocks, layout)?;
    let normalized = normalize(records, vocab)?;
    info!(%layout, events, records = normalized.len(), "pipeline complete");
    Ok((layout, events, normalized))
}

/// Convert the export at `input` into the target schema at `output` with the
/// default configuration.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ConversionSummary> {
    convert_with(input, output, &ConvertConfig::default())
}

/// Convert with an explicit configuration. Nothing is written unless the
/// whole export converts.
#[instrument(level = "info", skip_all, fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
pub fn convert_with<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &ConvertConfig,
) -> Result<ConversionSummary> {
    let start = Instant::now();
    let output = output.as_ref();

    config.validate()?;
    let format = config.output_format(output)?;
    let vocab = config.vocabulary()?;

    let rows = read_table(input)?;
    let (layout, events, table) = run_pipeline(rows, &vocab)?;
    write_table(&table, output, &config.sheet_name, format)?;

    info!(records = table.len(), elapsed = ?start.elapsed(), "conversion done");
    Ok(ConversionSummary {
        layout,
        events,
        records: table.len(),
        output: output.to_path_buf(),
    })
}

/// Load and segment `input` without extracting or writing anything.
pub fn inspect<P: AsRef<Path>>(input: P) -> Result<Inspection> {
    let rows = read_table(input)?;
    let (table, layout) = load_rows(rows)?;
    let blocks = segment_events(&table, layout.marker())?;
    Ok(Inspection {
        layout,
        rows: table.len(),
        blocks,
    })
}
