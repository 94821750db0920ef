use std::fs;
use std::path::Path;

use serde_json::{Value, json};

/// A detection box of the given size with its top-left corner at `(x, y)`.
pub fn detection(text: &str, x: f64, y: f64, score: f64) -> Value {
    let (w, h) = (40.0, 12.0);
    json!([
        [[x, y], [x + w, y], [x + w, y + h], [x, y + h]],
        [text, score]
    ])
}

/// Writes a placeholder image and its PaddleOCR sidecar next to it.
pub fn create_page(
    dir: &Path,
    image_name: &str,
    detections: &[Value],
) -> Result<(), Box<dyn std::error::Error>> {
    let image = dir.join(image_name);
    fs::write(&image, b"\x89PNG fixture")?;

    let sidecar = image.with_extension("json");
    // PaddleOCR wraps one image's results in an outer per-page list.
    fs::write(sidecar, serde_json::to_string(&json!([detections]))?)?;
    Ok(())
}
