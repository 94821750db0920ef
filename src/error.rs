use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("page has no tokens to lay out")]
    EmptyInput,

    #[error(
        "malformed token{}: {reason}",
        .index.map(|index| format!(" at detection {index}")).unwrap_or_default()
    )]
    MalformedToken {
        index: Option<usize>,
        reason: String,
    },

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("could not load image at {path}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    #[error("no detections found for image (expected {expected})")]
    MissingDetections { expected: PathBuf },

    #[error("invalid detections in {path}: {source}")]
    InvalidDetections {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid utf-8 csv output: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Everything that can go wrong while turning one image into one table.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("output name '{0}' is already used by another image in this batch")]
    DuplicateImageId(String),
}

/// Failures that stop a whole batch before any page is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to list images in {dir}: {source}")]
    Scan {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to prepare output: {0}")]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[cfg(test)]
mod tests {
    use super::{LayoutError, PageError};

    #[test]
    fn page_error_keeps_layout_message() {
        let error = PageError::from(LayoutError::MalformedToken {
            index: Some(3),
            reason: "bbox has no points".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "malformed token at detection 3: bbox has no points"
        );

        let unindexed = LayoutError::MalformedToken {
            index: None,
            reason: "bbox has no points".to_string(),
        };
        assert_eq!(unindexed.to_string(), "malformed token: bbox has no points");
    }
}
