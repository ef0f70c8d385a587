use serde::Serialize;

/// Column names of the downstream results system, in the order it expects.
pub const TARGET_COLUMNS: [&str; 9] = [
    "RegNo",
    "Preferred Name",
    "AgeID",
    "GenderID",
    "EventTitle",
    "Performance",
    "Competed",
    "Placing",
    "Centre",
];

/// One athlete result as lifted out of an event block, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct AthleteRecord {
    pub reg_no: Option<String>,
    pub preferred_name: String,
    pub age_id: Option<String>,
    pub gender_id: Option<String>,
    pub event_title: String,
    /// Raw `H:M:S[.fraction]` text from the export.
    pub performance: String,
    /// Always 0; nothing upstream tells us otherwise.
    pub competed: u8,
    pub placing: Option<String>,
    pub centre: Option<String>,
    /// Index into the cleaned table, kept for error reporting.
    pub source_row: usize,
}

/// A row of the target schema. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    #[serde(rename = "RegNo")]
    pub reg_no: Option<String>,
    #[serde(rename = "Preferred Name")]
    pub preferred_name: String,
    #[serde(rename = "AgeID")]
    pub age_id: Option<String>,
    #[serde(rename = "GenderID")]
    pub gender_id: Option<String>,
    #[serde(rename = "EventTitle")]
    pub event_title: String,
    /// Seconds, rounded up to the tenth.
    #[serde(rename = "Performance")]
    pub performance: f64,
    #[serde(rename = "Competed")]
    pub competed: u8,
    #[serde(rename = "Placing")]
    pub placing: Option<String>,
    #[serde(rename = "Centre")]
    pub centre: Option<String>,
}

/// The sole output artifact of a conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedTable {
    pub records: Vec<NormalizedRecord>,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedRecord> {
        self.records.iter()
    }
}
