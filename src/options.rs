use std::path::PathBuf;
use std::str::FromStr;

use crate::error::LayoutError;

pub const DEFAULT_ROW_THRESHOLD_PX: f64 = 10.0;
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Largest y distance from a row's opening token that still joins the row.
    pub row_threshold_px: f64,
}

impl LayoutOptions {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.row_threshold_px.is_finite() || self.row_threshold_px < 0.0 {
            return Err(LayoutError::InvalidOption(format!(
                "row_threshold_px must be a non-negative number, got {}",
                self.row_threshold_px
            )));
        }
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            row_threshold_px: DEFAULT_ROW_THRESHOLD_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}', expected csv or json")),
        }
    }
}

/// Parses a comma separated extension list like `png,.JPG, tiff`.
pub fn parse_extensions(list: &str) -> Result<Vec<String>, String> {
    let extensions = list
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect::<Vec<_>>();

    if extensions.is_empty() {
        return Err("extension list cannot be empty".to_string());
    }
    Ok(extensions)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub layout: LayoutOptions,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub delimiter: u8,
    /// Pad short rows with empty cells up to the header width when writing CSV.
    pub pad_rows: bool,
    pub extensions: Vec<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            output_dir: PathBuf::from("extracted"),
            format: OutputFormat::Csv,
            delimiter: b',',
            pad_rows: false,
            extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{LayoutOptions, OutputFormat, parse_extensions};

    #[test]
    fn default_threshold_is_ten_pixels() {
        assert_eq!(LayoutOptions::default().row_threshold_px, 10.0);
        assert!(LayoutOptions::default().validate().is_ok());
    }

    #[test]
    fn rejects_negative_and_nan_thresholds() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let options = LayoutOptions {
                row_threshold_px: bad,
            };
            assert!(options.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn parses_output_format() {
        assert_eq!(OutputFormat::from_str("CSV"), Ok(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_str("json"), Ok(OutputFormat::Json));
        let err = OutputFormat::from_str("xlsx").expect_err("xlsx is unsupported");
        assert!(err.contains("unknown output format"));
    }

    #[test]
    fn normalizes_extension_list() {
        let extensions = parse_extensions("png, .JPG,,tiff").expect("list should parse");
        assert_eq!(extensions, vec!["png", "jpg", "tiff"]);
        assert!(parse_extensions(" , ").is_err());
    }
}
