//! Error types for the host-facing surface of the mark.
//!
//! The normalization pipeline and the interaction state machine are total;
//! errors only come from parsing attribute values and payloads handed over by
//! the host, or from addressing a curve/point that does not exist.

use std::fmt;

/// Errors that can occur while applying host input to a mark.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkError {
    /// An attribute string did not name a known variant.
    UnknownAttributeValue {
        attribute: &'static str,
        value: String,
    },

    /// A color string could not be parsed.
    InvalidColor(String),

    /// A JSON payload could not be decoded.
    Decode(String),

    /// Curve index past the end of the normalized records.
    CurveOutOfRange { curve: usize, curves: usize },

    /// Point index past the end of a curve.
    PointOutOfRange {
        curve: usize,
        point: usize,
        points: usize,
    },
}

impl MarkError {
    pub(crate) fn unknown(attribute: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownAttributeValue {
            attribute,
            value: value.into(),
        }
    }
}

impl fmt::Display for MarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkError::UnknownAttributeValue { attribute, value } => {
                write!(f, "Unknown value for '{}': {:?}", attribute, value)
            }
            MarkError::InvalidColor(value) => write!(f, "Invalid color: {:?}", value),
            MarkError::Decode(msg) => write!(f, "Failed to decode payload: {}", msg),
            MarkError::CurveOutOfRange { curve, curves } => {
                write!(f, "Curve {} out of range ({} curves)", curve, curves)
            }
            MarkError::PointOutOfRange {
                curve,
                point,
                points,
            } => write!(
                f,
                "Point {} out of range for curve {} ({} points)",
                point, curve, points
            ),
        }
    }
}

impl std::error::Error for MarkError {}

impl From<serde_json::Error> for MarkError {
    fn from(err: serde_json::Error) -> Self {
        MarkError::Decode(err.to_string())
    }
}

/// Result type for mark operations.
pub type MarkResult<T> = Result<T, MarkError>;
