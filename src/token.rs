use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One recognized text fragment: its text, corner points and confidence.
///
/// Corners are conventionally top-left, top-right, bottom-right, bottom-left.
/// Only the first point is ever read by the layout code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    text: String,
    bbox: Vec<Point>,
    score: f32,
}

impl Token {
    /// Builds a token, rejecting a bbox without a usable top-left corner.
    pub fn new(text: impl Into<String>, bbox: Vec<Point>, score: f32) -> Result<Self, LayoutError> {
        let Some(top_left) = bbox.first() else {
            return Err(malformed("bbox has no points".to_string()));
        };
        if !top_left.x.is_finite() || !top_left.y.is_finite() {
            return Err(malformed(format!(
                "top-left corner ({}, {}) is not a finite coordinate",
                top_left.x, top_left.y
            )));
        }

        Ok(Self {
            text: text.into(),
            bbox,
            score,
        })
    }

    /// Convenience for axis-aligned boxes given by their top-left corner.
    pub fn at(text: impl Into<String>, x: f64, y: f64) -> Result<Self, LayoutError> {
        Self::new(text, vec![Point::new(x, y)], 1.0)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn bbox(&self) -> &[Point] {
        &self.bbox
    }

    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    #[must_use]
    pub fn top_left(&self) -> Point {
        self.bbox[0]
    }

    /// Reference vertical position used for row clustering.
    #[must_use]
    pub fn anchor_y(&self) -> f64 {
        self.bbox[0].y
    }

    /// Reference horizontal position used for ordering within a row.
    #[must_use]
    pub fn anchor_x(&self) -> f64 {
        self.bbox[0].x
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// A detection exactly as PaddleOCR emits it: `[[[x, y], ...], ["text", score]]`.
///
/// Coordinates are kept as raw JSON so that a non-numeric corner surfaces as a
/// malformed token instead of failing the whole document parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection(pub Vec<Vec<Value>>, pub (String, f32));

impl RawDetection {
    #[must_use]
    pub fn new(points: &[(f64, f64)], text: &str, score: f32) -> Self {
        let points = points
            .iter()
            .map(|&(x, y)| vec![Value::from(x), Value::from(y)])
            .collect();
        Self(points, (text.to_string(), score))
    }
}

fn malformed(reason: String) -> LayoutError {
    LayoutError::MalformedToken {
        index: None,
        reason,
    }
}

fn coordinate(point: &[Value], axis: usize, name: &str) -> Result<f64, String> {
    point
        .get(axis)
        .ok_or_else(|| format!("point is missing its {name} coordinate"))?
        .as_f64()
        .ok_or_else(|| format!("{name} coordinate {} is not a number", point[axis]))
}

impl TryFrom<RawDetection> for Token {
    type Error = LayoutError;

    fn try_from(raw: RawDetection) -> Result<Self, Self::Error> {
        let RawDetection(points, (text, score)) = raw;
        if points.is_empty() {
            return Err(malformed(format!("'{text}' has an empty bbox")));
        }

        // Later corners are informational only; an unreadable one degrades to NaN.
        let mut bbox = Vec::with_capacity(points.len());
        for (corner, point) in points.iter().enumerate() {
            let parsed = match (coordinate(point, 0, "x"), coordinate(point, 1, "y")) {
                (Ok(x), Ok(y)) => Point::new(x, y),
                (Err(reason), _) | (_, Err(reason)) if corner == 0 => {
                    return Err(malformed(format!("'{text}' top-left corner: {reason}")));
                }
                _ => Point::new(f64::NAN, f64::NAN),
            };
            bbox.push(parsed);
        }

        Self::new(text, bbox, score)
    }
}

/// Converts one page of raw detections, naming the first offending detection.
pub fn tokens_from_detections(detections: Vec<RawDetection>) -> Result<Vec<Token>, LayoutError> {
    detections
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            Token::try_from(raw).map_err(|error| match error {
                LayoutError::MalformedToken { reason, .. } => LayoutError::MalformedToken {
                    index: Some(index),
                    reason,
                },
                other => other,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Point, RawDetection, Token, tokens_from_detections};
    use crate::error::LayoutError;

    #[test]
    fn rejects_empty_bbox() {
        let err = Token::new("x", Vec::new(), 0.9).expect_err("empty bbox should fail");
        assert!(matches!(err, LayoutError::MalformedToken { index: None, .. }));
    }

    #[test]
    fn rejects_nan_top_left() {
        let err = Token::new("x", vec![Point::new(f64::NAN, 1.0)], 0.9)
            .expect_err("NaN corner should fail");
        assert!(err.to_string().contains("not a finite coordinate"));
    }

    #[test]
    fn reads_anchor_from_first_corner() {
        let token = Token::new(
            "Total",
            vec![
                Point::new(12.0, 40.0),
                Point::new(80.0, 38.0),
                Point::new(80.0, 60.0),
                Point::new(12.0, 62.0),
            ],
            0.97,
        )
        .expect("token should build");
        assert_eq!(token.anchor_x(), 12.0);
        assert_eq!(token.anchor_y(), 40.0);
        assert_eq!(token.bbox().len(), 4);
    }

    #[test]
    fn parses_paddle_detection() {
        let raw: RawDetection = serde_json::from_value(json!([
            [[10, 20], [50, 20], [50, 35], [10, 35]],
            ["Revenue", 0.991]
        ]))
        .expect("detection should deserialize");

        let token = Token::try_from(raw).expect("token should convert");
        assert_eq!(token.text(), "Revenue");
        assert_eq!(token.top_left(), Point::new(10.0, 20.0));
        assert!((token.score() - 0.991).abs() < 1e-6);
    }

    #[test]
    fn names_the_detection_with_a_non_numeric_corner() {
        let good = RawDetection::new(&[(0.0, 0.0)], "ok", 0.9);
        let bad: RawDetection = serde_json::from_value(json!([[["left", 5]], ["bad", 0.5]]))
            .expect("detection should deserialize");

        let err = tokens_from_detections(vec![good, bad]).expect_err("bad corner should fail");
        assert!(matches!(err, LayoutError::MalformedToken { index: Some(1), .. }));
        let message = err.to_string();
        assert!(message.contains("detection 1"), "{message}");
        assert!(message.contains("x coordinate"), "{message}");
    }

    #[test]
    fn tolerates_unreadable_trailing_corner() {
        let raw: RawDetection =
            serde_json::from_value(json!([[[1, 2], [3, null]], ["tail", 0.4]]))
                .expect("detection should deserialize");
        let token = Token::try_from(raw).expect("only the top-left corner matters");
        assert_eq!(token.anchor_y(), 2.0);
        assert!(token.bbox()[1].y.is_nan());
    }
}
