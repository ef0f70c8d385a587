// src/table/read.rs
use csv::ReaderBuilder;
use std::{
    fs::{self, File},
    io::{Cursor, Read},
    path::Path,
};
use tracing::{debug, instrument, trace};
use zip::ZipArchive;

use crate::error::{ConvertError, Result};
use crate::process::{raw_table::RawRow, utils::cell_value};

/// Read the export at `source` into positional rows.
///
/// `.zip` archives are opened and their first `.csv` entry is read; anything
/// else is treated as CSV. No header row is assumed.
#[instrument(level = "info", skip(source), fields(path = %source.as_ref().display()))]
pub fn read_table<P: AsRef<Path>>(source: P) -> Result<Vec<RawRow>> {
    let source = source.as_ref();
    let is_zip = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"));

    let data = if is_zip {
        read_first_csv_entry(source)?
    } else {
        fs::read(source)?
    };
    parse_csv_bytes(&data)
}

fn read_first_csv_entry(zip_path: &Path) -> Result<Vec<u8>> {
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        if entry.is_file() && name.to_lowercase().ends_with(".csv") {
            debug!(entry = %name, "reading CSV from archive");
            let mut buf = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut buf)?;
            return Ok(buf);
        }
    }

    Err(ConvertError::MalformedInput(format!(
        "no .csv entry in {}",
        zip_path.display()
    )))
}

/// Parse CSV bytes into rows, padding short records with missing cells so
/// every row is as wide as the widest one. An empty field is missing; any
/// other field, whitespace-only included, is kept as written.
pub fn parse_csv_bytes(data: &[u8]) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(data));

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    let mut width = 0;
    for result in rdr.byte_records() {
        let record = result?;
        let cells: Vec<Option<String>> = record
            .iter()
            .map(|field| cell_value(&String::from_utf8_lossy(field)))
            .collect();
        width = width.max(cells.len());
        rows.push(cells);
    }
    trace!(rows = rows.len(), width, "parsed CSV");

    Ok(rows
        .into_iter()
        .map(|mut cells| {
            cells.resize(width, None);
            RawRow::new(cells)
        })
        .collect())
}
