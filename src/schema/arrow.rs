use arrow::{
    array::{ArrayRef, Float64Array, StringArray, UInt8Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use super::types::{NormalizedRecord, NormalizedTable, TARGET_COLUMNS};
use crate::error::Result;

/// Arrow schema for the target columns. Everything is text except the
/// numeric performance and the competed flag.
pub fn target_schema() -> Schema {
    let fields = TARGET_COLUMNS
        .iter()
        .map(|name| match *name {
            "Performance" => Field::new(*name, DataType::Float64, false),
            "Competed" => Field::new(*name, DataType::UInt8, false),
            "Preferred Name" | "EventTitle" => Field::new(*name, DataType::Utf8, false),
            _ => Field::new(*name, DataType::Utf8, true),
        })
        .collect::<Vec<_>>();
    Schema::new(fields)
}

/// Lay the table out as a single record batch in target column order.
pub fn to_record_batch(table: &NormalizedTable) -> Result<RecordBatch> {
    let text = |f: fn(&NormalizedRecord) -> Option<&str>| -> ArrayRef {
        Arc::new(table.iter().map(f).collect::<StringArray>()) as ArrayRef
    };

    let columns: Vec<ArrayRef> = vec![
        text(|r| r.reg_no.as_deref()),
        text(|r| Some(r.preferred_name.as_str())),
        text(|r| r.age_id.as_deref()),
        text(|r| r.gender_id.as_deref()),
        text(|r| Some(r.event_title.as_str())),
        Arc::new(Float64Array::from_iter_values(
            table.iter().map(|r| r.performance),
        )) as ArrayRef,
        Arc::new(UInt8Array::from_iter_values(table.iter().map(|r| r.competed))) as ArrayRef,
        text(|r| r.placing.as_deref()),
        text(|r| r.centre.as_deref()),
    ];

    Ok(RecordBatch::try_new(Arc::new(target_schema()), columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;

    #[test]
    fn batch_has_target_columns_in_order() -> anyhow::Result<()> {
        let table = NormalizedTable {
            records: vec![NormalizedRecord {
                reg_no: None,
                preferred_name: "Ed Moss".into(),
                age_id: Some("U15".into()),
                gender_id: Some("M".into()),
                event_title: "800 Metres".into(),
                performance: 151.4,
                competed: 0,
                placing: Some("3".into()),
                centre: Some("Ayr".into()),
            }],
        };
        let batch = to_record_batch(&table)?;
        let names: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(names, TARGET_COLUMNS);
        assert_eq!(batch.num_columns(), 9);
        assert_eq!(batch.num_rows(), 1);
        assert!(batch.column(0).is_null(0));
        let perf = batch
            .column(5)
            .as_any()
            .downcast_ref::<Float64Array>()
            .expect("performance is f64");
        assert_eq!(perf.value(0), 151.4);
        Ok(())
    }

    #[test]
    fn empty_table_is_an_empty_batch() -> anyhow::Result<()> {
        let batch = to_record_batch(&NormalizedTable::default())?;
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 9);
        Ok(())
    }
}
