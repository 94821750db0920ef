use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::error::{LayoutError, PageError};
use crate::ocr::OcrEngine;
use crate::options::{OutputFormat, PipelineOptions};
use crate::reconstruct_table;
use crate::sink::TableSink;
use crate::source::ImageEntry;
use crate::token::{Token, tokens_from_detections};
use crate::warning::{LayoutWarning, WarningCode};

#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub output: PathBuf,
    pub token_count: usize,
    pub row_count: usize,
    pub column_count: usize,
    pub warnings: Vec<LayoutWarning>,
}

#[derive(Debug)]
pub struct PageReport {
    pub image_id: String,
    pub image_path: PathBuf,
    pub outcome: Result<PageSummary, PageError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub pages: Vec<PageReport>,
    pub warnings: Vec<LayoutWarning>,
}

impl BatchReport {
    #[must_use]
    pub fn tables_written(&self) -> usize {
        self.pages.iter().filter(|page| page.outcome.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PageReport, &PageError)> {
        self.pages
            .iter()
            .filter_map(|page| page.outcome.as_ref().err().map(|error| (page, error)))
    }

    /// Page-level and batch-level warnings together.
    pub fn all_warnings(&self) -> impl Iterator<Item = &LayoutWarning> {
        self.pages
            .iter()
            .filter_map(|page| page.outcome.as_ref().ok())
            .flat_map(|summary| summary.warnings.iter())
            .chain(self.warnings.iter())
    }
}

fn bbox_warnings(tokens: &[Token], image_id: &str) -> Vec<LayoutWarning> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.bbox().len() != 4)
        .map(|(index, token)| {
            LayoutWarning::new(
                WarningCode::BboxNotQuadrilateral,
                format!(
                    "bbox of '{}' has {} points; only the first is used",
                    token.text(),
                    token.bbox().len()
                ),
            )
            .with_image(image_id)
            .with_token_index(index)
        })
        .collect()
}

/// Runs one image through OCR, layout reconstruction and the sink.
pub fn process_page(
    image: &ImageEntry,
    engine: &dyn OcrEngine,
    sink: &mut dyn TableSink,
    options: &PipelineOptions,
) -> Result<PageSummary, PageError> {
    let detections = engine.recognize(&image.path)?;
    let tokens = tokens_from_detections(detections)?;
    let token_count = tokens.len();
    let mut warnings = bbox_warnings(&tokens, &image.id);

    let stem = image.path.file_stem().map(|stem| stem.to_string_lossy());
    if stem.as_deref() != Some(image.id.as_str()) {
        warnings.push(
            LayoutWarning::new(
                WarningCode::OutputRenamed,
                format!(
                    "{} shares its name with another image; exported as '{}'",
                    image.path.display(),
                    image.id
                ),
            )
            .with_image(&image.id),
        );
    }

    let table = reconstruct_table(tokens, &options.layout)?;
    debug!(
        image = %image.id,
        tokens = token_count,
        rows = table.row_count(),
        columns = table.width(),
        "reconstructed table"
    );

    // Only the CSV sink pads; JSON output stays ragged.
    if options.format == OutputFormat::Csv && options.pad_rows && table.is_ragged() {
        warnings.push(
            LayoutWarning::new(
                WarningCode::RowsPadded,
                format!("short rows padded to {} columns on export", table.width()),
            )
            .with_image(&image.id),
        );
    }

    let output = sink.write_table(&image.id, &table)?;
    info!("Saved table to {}", output.display());

    Ok(PageSummary {
        output,
        token_count,
        row_count: table.row_count(),
        column_count: table.width(),
        warnings,
    })
}

/// Processes every image independently; a failed page is logged and recorded
/// but never stops the remaining pages.
///
/// Image ids name the output files, so a page whose id was already used in
/// this batch fails instead of overwriting the earlier table.
pub fn process_batch(
    images: &[ImageEntry],
    engine: &dyn OcrEngine,
    sink: &mut dyn TableSink,
    options: &PipelineOptions,
) -> Result<BatchReport, LayoutError> {
    options.layout.validate()?;

    let mut report = BatchReport::default();
    if images.is_empty() {
        report.warnings.push(LayoutWarning::new(
            WarningCode::NoImagesFound,
            "no images matched the configured extensions",
        ));
    }

    let mut used_ids = HashSet::new();
    for image in images {
        let outcome = if used_ids.insert(image.id.as_str()) {
            process_page(image, engine, sink, options)
        } else {
            Err(PageError::DuplicateImageId(image.id.clone()))
        };
        match &outcome {
            Ok(summary) => {
                for warning in &summary.warnings {
                    warn!(image = %image.id, code = ?warning.code, "{}", warning.message);
                }
            }
            Err(err) => {
                error!("Error: could not process image at {}: {err}", image.path.display());
            }
        }

        report.pages.push(PageReport {
            image_id: image.id.clone(),
            image_path: image.path.clone(),
            outcome,
        });
    }

    Ok(report)
}
