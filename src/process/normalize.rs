// src/process/normalize.rs
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

use super::convert::time_to_seconds;
use crate::error::{ConvertError, Result};
use crate::schema::{AthleteRecord, NormalizedRecord, NormalizedTable};

/// Timing-system event names mapped to the results system's designations.
/// Entries that map to themselves are listed so the vocabulary is complete.
static EVENT_TITLES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("70m", "70 Metres"),
        ("100m", "100 Metres"),
        ("150m", "150 Metres"),
        ("200m", "200 Metres"),
        ("400m", "400 Metres"),
        ("800m", "800 Metres"),
        ("1500m", "1500 Metres"),
        ("700m Walks", "700m Walk"),
        ("1100m Walks", "1100m Walk"),
        ("1500m Walks", "1500m Walk"),
        ("60m Hurdles", "60m Hurdles"),
        ("80m Hurdles", "80m Hurdles"),
        ("90m Hurdles", "90m Hurdles"),
        ("100m Hurdles", "100m Hurdles"),
        ("200m Hurdles", "200m Hurdles"),
        ("300m Hurdles", "300m Hurdles"),
    ])
});

/// Exact-match event title substitution: the built-in table plus any extra
/// entries from configuration. Titles with no entry pass through.
#[derive(Debug, Clone, Default)]
pub struct EventVocabulary {
    extra: BTreeMap<String, String>,
}

impl EventVocabulary {
    /// Layer `extra` over the built-in table.
    ///
    /// Rejects a mapping whose replacement is itself a key that maps somewhere
    /// else; remapping must give the same answer when applied twice.
    pub fn with_extra(extra: BTreeMap<String, String>) -> Result<Self> {
        let vocab = Self { extra };
        for (from, to) in vocab.entries() {
            let again = vocab.remap(to);
            if again != to {
                return Err(ConvertError::Config(format!(
                    "event title {from:?} maps to {to:?}, which is itself remapped to {again:?}"
                )));
            }
        }
        Ok(vocab)
    }

    fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        EVENT_TITLES
            .iter()
            .filter(|(k, _)| !self.extra.contains_key(**k))
            .map(|(k, v)| (*k, *v))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn remap<'a>(&'a self, title: &'a str) -> &'a str {
        if let Some(to) = self.extra.get(title) {
            return to;
        }
        EVENT_TITLES.get(title).copied().unwrap_or(title)
    }
}

/// Convert one extracted record into a target-schema row.
pub fn normalize_record(rec: AthleteRecord, vocab: &EventVocabulary) -> Result<NormalizedRecord> {
    let performance = time_to_seconds(&rec.performance, rec.source_row)?;
    let event_title = vocab.remap(&rec.event_title).to_string();

    Ok(NormalizedRecord {
        reg_no: rec.reg_no,
        preferred_name: rec.preferred_name,
        age_id: rec.age_id,
        gender_id: rec.gender_id,
        event_title,
        performance,
        competed: rec.competed,
        placing: rec.placing,
        centre: rec.centre,
    })
}

/// Normalize every record, failing the whole table on the first bad one.
#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn normalize(records: Vec<AthleteRecord>, vocab: &EventVocabulary) -> Result<NormalizedTable> {
    let records = records
        .into_iter()
        .map(|r| normalize_record(r, vocab))
        .collect::<Result<Vec<_>>>()?;
    debug!(rows = records.len(), "normalized table");
    Ok(NormalizedTable { records })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, time: &str) -> AthleteRecord {
        AthleteRecord {
            reg_no: Some("101".into()),
            preferred_name: "Anna Bell".into(),
            age_id: Some("U13".into()),
            gender_id: Some("F".into()),
            event_title: title.into(),
            performance: time.into(),
            competed: 0,
            placing: Some("1".into()),
            centre: None,
            source_row: 9,
        }
    }

    #[test]
    fn remaps_known_titles_only() {
        let vocab = EventVocabulary::default();
        assert_eq!(vocab.remap("100m"), "100 Metres");
        assert_eq!(vocab.remap("700m Walks"), "700m Walk");
        assert_eq!(vocab.remap("60m Hurdles"), "60m Hurdles");
        assert_eq!(vocab.remap("Long Jump"), "Long Jump");
        // exact match only
        assert_eq!(vocab.remap("100m "), "100m ");
    }

    #[test]
    fn remap_is_idempotent() {
        let vocab = EventVocabulary::default();
        for (from, _) in EVENT_TITLES.iter() {
            let once = vocab.remap(from);
            assert_eq!(vocab.remap(once), once, "{from}");
        }
    }

    #[test]
    fn extra_entries_override_and_extend() -> anyhow::Result<()> {
        let vocab = EventVocabulary::with_extra(BTreeMap::from([
            ("Shot".to_string(), "Shot Put".to_string()),
            ("100m".to_string(), "100 Metre Sprint".to_string()),
        ]))?;
        assert_eq!(vocab.remap("Shot"), "Shot Put");
        assert_eq!(vocab.remap("100m"), "100 Metre Sprint");
        assert_eq!(vocab.remap("200m"), "200 Metres");
        Ok(())
    }

    #[test]
    fn chained_extra_entries_are_rejected() {
        let err = EventVocabulary::with_extra(BTreeMap::from([(
            "Dash".to_string(),
            "100m".to_string(),
        )]))
        .unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn normalize_converts_and_keeps_order() -> anyhow::Result<()> {
        let table = normalize(
            vec![record("100m", "0:1:05.23"), record("Long Jump", "0:0:1.01")],
            &EventVocabulary::default(),
        )?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].event_title, "100 Metres");
        assert_eq!(table.records[0].performance, 65.3);
        assert_eq!(table.records[1].event_title, "Long Jump");
        assert_eq!(table.records[1].performance, 1.1);
        assert_eq!(table.records[1].competed, 0);
        Ok(())
    }

    #[test]
    fn one_bad_time_fails_the_table() {
        let err = normalize(
            vec![record("100m", "0:0:10.0"), record("100m", "DNF")],
            &EventVocabulary::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::InvalidTimeFormat { row: 9, .. }
        ));
    }
}
