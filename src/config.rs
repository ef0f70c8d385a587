// src/config.rs
use serde::Deserialize;
use std::{collections::BTreeMap, fmt, fs, path::Path, str::FromStr};
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::process::normalize::EventVocabulary;

/// File formats the output writer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Parquet,
    Json,
}

impl OutputFormat {
    /// Infer the format from a destination's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ConvertError::UnsupportedFormat(path.display().to_string()))?;
        ext.parse()
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "parquet" | "pq" => Ok(OutputFormat::Parquet),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConvertError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Everything a conversion needs besides its input and output paths.
///
/// ```yaml
/// sheet_name: Results
/// format: parquet
/// event_titles:
///   Shot: Shot Put
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub sheet_name: String,
    /// Overrides the format implied by the output extension.
    pub format: Option<OutputFormat>,
    /// Extra exact-match event title substitutions.
    pub event_titles: BTreeMap<String, String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            format: None,
            event_titles: BTreeMap::new(),
        }
    }
}

impl ConvertConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: ConvertConfig = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sheet_name.trim().is_empty() {
            return Err(ConvertError::Config("sheet_name must not be empty".into()));
        }
        self.vocabulary().map(|_| ())
    }

    pub fn vocabulary(&self) -> Result<EventVocabulary> {
        EventVocabulary::with_extra(self.event_titles.clone())
    }

    /// Format for `output`: the configured override, else its extension.
    pub fn output_format(&self, output: &Path) -> Result<OutputFormat> {
        match self.format {
            Some(f) => Ok(f),
            None => OutputFormat::from_path(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults() {
        let cfg = ConvertConfig::default();
        assert_eq!(cfg.sheet_name, "Sheet1");
        assert!(cfg.format.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parses_yaml() -> anyhow::Result<()> {
        let cfg = ConvertConfig::from_yaml_str(
            "sheet_name: Results\nformat: parquet\nevent_titles:\n  Shot: Shot Put\n",
        )?;
        assert_eq!(cfg.sheet_name, "Results");
        assert_eq!(cfg.format, Some(OutputFormat::Parquet));
        assert_eq!(cfg.vocabulary()?.remap("Shot"), "Shot Put");
        Ok(())
    }

    #[test]
    fn partial_yaml_keeps_defaults() -> anyhow::Result<()> {
        let cfg = ConvertConfig::from_yaml_str("format: json\n")?;
        assert_eq!(cfg.sheet_name, "Sheet1");
        assert_eq!(cfg.format, Some(OutputFormat::Json));
        Ok(())
    }

    #[test]
    fn rejects_bad_config() {
        assert!(matches!(
            ConvertConfig::from_yaml_str("sheet_name: \"  \"\n"),
            Err(ConvertError::Config(_))
        ));
        assert!(matches!(
            ConvertConfig::from_yaml_str("event_titles:\n  Dash: 100m\n"),
            Err(ConvertError::Config(_))
        ));
        assert!(matches!(
            ConvertConfig::from_yaml_str("upload_folder: /tmp\n"),
            Err(ConvertError::Yaml(_))
        ));
    }

    #[test]
    fn format_from_extension_or_override() -> anyhow::Result<()> {
        let cfg = ConvertConfig::default();
        assert_eq!(cfg.output_format(&PathBuf::from("out.CSV"))?, OutputFormat::Csv);
        assert_eq!(
            cfg.output_format(&PathBuf::from("out.parquet"))?,
            OutputFormat::Parquet
        );
        assert!(matches!(
            cfg.output_format(&PathBuf::from("out.xls")),
            Err(ConvertError::UnsupportedFormat(_))
        ));
        assert!(cfg.output_format(&PathBuf::from("out")).is_err());

        let forced = ConvertConfig {
            format: Some(OutputFormat::Json),
            ..ConvertConfig::default()
        };
        assert_eq!(forced.output_format(&PathBuf::from("out.xls"))?, OutputFormat::Json);
        Ok(())
    }
}
