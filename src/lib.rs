mod cluster;
mod error;
mod ocr;
mod options;
mod order;
mod pipeline;
mod sink;
mod source;
mod table;
mod token;
mod warning;

use std::path::Path;

use crate::sink::sink_for;

pub use cluster::{Row, cluster_rows};
pub use error::{BatchError, LayoutError, OcrError, PageError, SinkError};
pub use ocr::{OcrEngine, PaddleJsonEngine, parse_detections};
pub use options::{
    DEFAULT_IMAGE_EXTENSIONS, DEFAULT_ROW_THRESHOLD_PX, LayoutOptions, OutputFormat,
    PipelineOptions, parse_extensions,
};
pub use order::order_rows;
pub use pipeline::{BatchReport, PageReport, PageSummary, process_batch, process_page};
pub use sink::{CsvDirSink, JsonDirSink, TableSink, write_csv, write_csv_to_string};
pub use source::{ImageEntry, scan_images};
pub use table::{Table, assemble_table};
pub use token::{Point, RawDetection, Token, tokens_from_detections};
pub use warning::{LayoutWarning, WarningCode};

/// Rebuilds the row structure of one page from its tokens.
///
/// Clusters tokens into rows by top-left y, orders each row by top-left x and
/// keeps only the text. The result depends on nothing but `tokens` and
/// `options`, so repeated calls give identical tables.
pub fn reconstruct_table(tokens: Vec<Token>, options: &LayoutOptions) -> Result<Table, LayoutError> {
    options.validate()?;
    let rows = cluster_rows(tokens, options.row_threshold_px)?;
    Ok(assemble_table(order_rows(rows)))
}

/// Converts every image in `input_dir` into one exported table per image.
pub fn extract_dir(
    input_dir: &Path,
    engine: &dyn OcrEngine,
    options: &PipelineOptions,
) -> Result<BatchReport, BatchError> {
    options.layout.validate()?;

    let images = scan_images(input_dir, &options.extensions).map_err(|source| BatchError::Scan {
        dir: input_dir.to_path_buf(),
        source,
    })?;
    let mut sink = sink_for(options)?;

    Ok(process_batch(&images, engine, sink.as_mut(), options)?)
}
