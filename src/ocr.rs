use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::OcrError;
use crate::token::RawDetection;

/// Anything that can turn an image into positioned text detections.
pub trait OcrEngine {
    fn recognize(&self, image: &Path) -> Result<Vec<RawDetection>, OcrError>;
}

impl<F> OcrEngine for F
where
    F: Fn(&Path) -> Result<Vec<RawDetection>, OcrError>,
{
    fn recognize(&self, image: &Path) -> Result<Vec<RawDetection>, OcrError> {
        self(image)
    }
}

// PaddleOCR wraps results in a per-page list and uses null for blank pages;
// plain detection lists are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetectionDocument {
    Paged(Vec<Option<Vec<RawDetection>>>),
    Flat(Vec<RawDetection>),
}

/// Parses PaddleOCR result JSON into one flat list of detections.
pub fn parse_detections(json: &str) -> Result<Vec<RawDetection>, serde_json::Error> {
    let document: DetectionDocument = serde_json::from_str(json)?;
    Ok(match document {
        DetectionDocument::Paged(pages) => pages.into_iter().flatten().flatten().collect(),
        DetectionDocument::Flat(detections) => detections,
    })
}

/// Reads detections that PaddleOCR already produced, stored as `<stem>.json`.
///
/// The sidecar is looked up in `detections_dir` when set, otherwise next to the
/// image. The image itself must exist and be non-empty, but it is never
/// decoded: a non-empty file that is not a valid image still passes, and its
/// table comes entirely from the sidecar.
#[derive(Debug, Clone, Default)]
pub struct PaddleJsonEngine {
    detections_dir: Option<PathBuf>,
}

impl PaddleJsonEngine {
    #[must_use]
    pub fn new(detections_dir: Option<PathBuf>) -> Self {
        Self { detections_dir }
    }

    #[must_use]
    pub fn sidecar_path(&self, image: &Path) -> PathBuf {
        let stem = image.file_stem().unwrap_or(image.as_os_str());
        let mut name = stem.to_os_string();
        name.push(".json");

        match &self.detections_dir {
            Some(dir) => dir.join(name),
            None => image.with_file_name(name),
        }
    }
}

fn check_image(image: &Path) -> Result<(), OcrError> {
    let load_error = |reason: String| OcrError::ImageLoad {
        path: image.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(image).map_err(|error| load_error(error.to_string()))?;
    if !metadata.is_file() {
        return Err(load_error("not a regular file".to_string()));
    }
    if metadata.len() == 0 {
        return Err(load_error("file is empty".to_string()));
    }
    Ok(())
}

impl OcrEngine for PaddleJsonEngine {
    fn recognize(&self, image: &Path) -> Result<Vec<RawDetection>, OcrError> {
        check_image(image)?;

        let sidecar = self.sidecar_path(image);
        if !sidecar.is_file() {
            return Err(OcrError::MissingDetections { expected: sidecar });
        }

        let json = fs::read_to_string(&sidecar)?;
        parse_detections(&json).map_err(|source| OcrError::InvalidDetections {
            path: sidecar,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{PaddleJsonEngine, parse_detections};

    #[test]
    fn parses_paged_paddle_output() {
        let json = r#"[
            [
                [[[0, 0], [40, 0], [40, 12], [0, 12]], ["Year", 0.99]],
                [[[60, 1], [90, 1], [90, 12], [60, 12]], ["2023", 0.95]]
            ],
            null
        ]"#;
        let detections = parse_detections(json).expect("paged output should parse");
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[1].1.0, "2023");
    }

    #[test]
    fn parses_flat_detection_list() {
        let json = r#"[[[[5, 5], [9, 5], [9, 9], [5, 9]], ["x", 0.5]]]"#;
        let detections = parse_detections(json).expect("flat output should parse");
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].1.0, "x");
    }

    #[test]
    fn blank_page_yields_no_detections() {
        assert!(parse_detections("[null]").expect("parses").is_empty());
        assert!(parse_detections("[]").expect("parses").is_empty());
    }

    #[test]
    fn rejects_non_detection_json() {
        assert!(parse_detections(r#"{"text": "nope"}"#).is_err());
    }

    #[test]
    fn sidecar_sits_next_to_image_by_default() {
        let engine = PaddleJsonEngine::default();
        assert_eq!(
            engine.sidecar_path(Path::new("scans/page_01.PNG")),
            PathBuf::from("scans/page_01.json")
        );

        let engine = PaddleJsonEngine::new(Some(PathBuf::from("ocr")));
        assert_eq!(
            engine.sidecar_path(Path::new("scans/page_01.png")),
            PathBuf::from("ocr/page_01.json")
        );
    }
}
