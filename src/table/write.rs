// src/table/write.rs
use arrow::csv::WriterBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

use crate::config::OutputFormat;
use crate::error::Result;
use crate::schema::{arrow::to_record_batch, NormalizedTable};

/// Parquet key-value metadata entry carrying the sheet name.
pub const SHEET_NAME_KEY: &str = "sheet_name";

/// Write `table` to `destination` in `format`.
///
/// The file is written next to the destination under a temporary name and
/// renamed into place once complete, so a failure never leaves a partial
/// output behind. CSV and JSON have no notion of sheets; the sheet name is
/// only recorded in Parquet metadata.
#[instrument(level = "info", skip(table, destination), fields(rows = table.len(), dest = %destination.as_ref().display()))]
pub fn write_table<P: AsRef<Path>>(
    table: &NormalizedTable,
    destination: P,
    sheet_name: &str,
    format: OutputFormat,
) -> Result<()> {
    let destination = destination.as_ref();
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(destination);
    let written = match format {
        OutputFormat::Csv => write_csv(table, &temp_path),
        OutputFormat::Parquet => write_parquet(table, &temp_path, sheet_name),
        OutputFormat::Json => write_json(table, &temp_path),
    };

    if let Err(e) = written {
        if let Err(rm) = fs::remove_file(&temp_path) {
            warn!(temp_path = %temp_path.display(), "failed to remove partial output: {}", rm);
        }
        return Err(e);
    }

    fs::rename(&temp_path, destination)?;
    info!(%format, "wrote output");
    Ok(())
}

fn temp_path_for(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    destination.with_file_name(format!(".{}.tmp", name))
}

fn write_csv(table: &NormalizedTable, path: &Path) -> Result<()> {
    let batch = to_record_batch(table)?;
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(&batch)?;
    debug!(rows = batch.num_rows(), "wrote CSV batch");
    Ok(())
}

fn write_parquet(table: &NormalizedTable, path: &Path, sheet_name: &str) -> Result<()> {
    let batch = to_record_batch(table)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_key_value_metadata(Some(vec![KeyValue::new(
            SHEET_NAME_KEY.to_string(),
            Some(sheet_name.to_string()),
        )]))
        .build();

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    debug!(rows = batch.num_rows(), "wrote Parquet batch");
    Ok(())
}

fn write_json(table: &NormalizedTable, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, table)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NormalizedRecord;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use tempfile::tempdir;

    fn sample() -> NormalizedTable {
        NormalizedTable {
            records: vec![
                NormalizedRecord {
                    reg_no: Some("101".into()),
                    preferred_name: "Anna Bell".into(),
                    age_id: Some("U13".into()),
                    gender_id: Some("F".into()),
                    event_title: "100 Metres".into(),
                    performance: 65.3,
                    competed: 0,
                    placing: Some("1".into()),
                    centre: Some("KLAC".into()),
                },
                NormalizedRecord {
                    reg_no: None,
                    preferred_name: "Cara Dunn".into(),
                    age_id: None,
                    gender_id: Some("F".into()),
                    event_title: "100 Metres".into(),
                    performance: 66.0,
                    competed: 0,
                    placing: Some("2".into()),
                    centre: None,
                },
            ],
        }
    }

    #[test]
    fn csv_has_target_header() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("results.csv");
        write_table(&sample(), &out, "Sheet1", OutputFormat::Csv)?;

        let text = fs::read_to_string(&out)?;
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("RegNo,Preferred Name,AgeID,GenderID,EventTitle,Performance,Competed,Placing,Centre")
        );
        assert_eq!(
            lines.next(),
            Some("101,Anna Bell,U13,F,100 Metres,65.3,0,1,KLAC")
        );
        assert_eq!(lines.count(), 1);
        Ok(())
    }

    #[test]
    fn parquet_keeps_rows_and_sheet_name() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("nested").join("results.parquet");
        write_table(&sample(), &out, "Results", OutputFormat::Parquet)?;

        let reader = SerializedFileReader::new(File::open(&out)?)?;
        let meta = reader.metadata().file_metadata();
        assert_eq!(meta.num_rows(), 2);
        let sheet = meta
            .key_value_metadata()
            .and_then(|kvs| kvs.iter().find(|kv| kv.key == SHEET_NAME_KEY))
            .and_then(|kv| kv.value.clone());
        assert_eq!(sheet.as_deref(), Some("Results"));
        Ok(())
    }

    #[test]
    fn json_uses_target_field_names() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("results.json");
        write_table(&sample(), &out, "Sheet1", OutputFormat::Json)?;

        let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out)?)?;
        let first = &v[0];
        assert_eq!(first["Preferred Name"], "Anna Bell");
        assert_eq!(first["Performance"], 65.3);
        assert_eq!(first["Competed"], 0);
        assert!(v[1]["RegNo"].is_null());
        Ok(())
    }

    #[test]
    fn no_temp_file_left_behind() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("results.csv");
        write_table(&sample(), &out, "Sheet1", OutputFormat::Csv)?;
        let names: Vec<_> = fs::read_dir(dir.path())?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["results.csv"]);
        Ok(())
    }
}
