//! Raw input arrays as received from the host.
//!
//! Columns are reference counted so cloning a [`RawSeries`] is cheap; edits
//! always replace the owning column with a fresh copy instead of mutating it
//! in place.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::MarkResult;

/// One ordered sequence of numbers. Absent values are stored as NaN.
pub type Column = Arc<Vec<f64>>;

/// The `x` input: either one sequence shared by every curve or one per curve.
#[derive(Debug, Clone, PartialEq)]
pub enum XValues {
    Shared(Column),
    PerCurve(Vec<Column>),
}

impl XValues {
    pub fn shared(values: Vec<f64>) -> Self {
        Self::Shared(Arc::new(values))
    }

    pub fn per_curve(series: Vec<Vec<f64>>) -> Self {
        Self::PerCurve(series.into_iter().map(Arc::new).collect())
    }

    /// Number of x sequences after wrapping a flat input as a single one.
    pub fn series_count(&self) -> usize {
        match self {
            Self::Shared(_) => 1,
            Self::PerCurve(series) => series.len(),
        }
    }

    /// `true` for a flat input without values or a nested input without series.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Shared(column) => column.is_empty(),
            Self::PerCurve(series) => series.is_empty(),
        }
    }

    pub fn series(&self, index: usize) -> Option<&Column> {
        match self {
            Self::Shared(column) if index == 0 => Some(column),
            Self::Shared(_) => None,
            Self::PerCurve(series) => series.get(index),
        }
    }
}

impl Default for XValues {
    fn default() -> Self {
        Self::Shared(Arc::default())
    }
}

/// The raw `x`, `y` and `color` arrays backing a curve model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireSeries", into = "WireSeries")]
pub struct RawSeries {
    pub x: XValues,
    pub y: Vec<Column>,
    /// One entry per curve, consumed by the color scale. Missing entries are NaN.
    pub color: Column,
}

impl RawSeries {
    pub fn new(x: XValues, y: Vec<Vec<f64>>) -> Self {
        Self {
            x,
            y: y.into_iter().map(Arc::new).collect(),
            color: Arc::default(),
        }
    }

    pub fn with_color(mut self, color: Vec<f64>) -> Self {
        self.color = Arc::new(color);
        self
    }

    /// Decode the host's array encoding (`null` entries become NaN).
    pub fn from_json(json: &str) -> MarkResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> MarkResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Color value for a curve, `None` when absent.
    pub fn curve_color(&self, curve: usize) -> Option<f64> {
        self.color.get(curve).copied().filter(|c| !c.is_nan())
    }

    /// Overwrite the x value of a point, replacing the owning column.
    ///
    /// With a shared `x` the point's value moves for every curve. Returns
    /// `false` when the point does not exist.
    pub fn write_x(&mut self, curve: usize, sub_index: usize, value: f64) -> bool {
        let slot = match &mut self.x {
            XValues::Shared(column) => Some(column),
            XValues::PerCurve(series) => series.get_mut(curve),
        };
        match slot {
            Some(column) => replace_in_column(column, sub_index, value),
            None => false,
        }
    }

    /// Overwrite the y value of a point, replacing the owning column.
    pub fn write_y(&mut self, curve: usize, sub_index: usize, value: f64) -> bool {
        match self.y.get_mut(curve) {
            Some(column) => replace_in_column(column, sub_index, value),
            None => false,
        }
    }
}

fn replace_in_column(column: &mut Column, index: usize, value: f64) -> bool {
    if index >= column.len() {
        return false;
    }
    let mut copy = column.as_ref().clone();
    copy[index] = value;
    *column = Arc::new(copy);
    true
}

/// A number array as it appears on the wire: flat or nested, `null` for gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum WireArray {
    Flat(Vec<Option<f64>>),
    Nested(Vec<Vec<Option<f64>>>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireSeries {
    x: WireArray,
    y: WireArray,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Vec<Option<f64>>>,
}

fn from_wire(values: Vec<Option<f64>>) -> Column {
    Arc::new(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

fn to_wire(column: &Column) -> Vec<Option<f64>> {
    column
        .iter()
        .map(|v| if v.is_nan() { None } else { Some(*v) })
        .collect()
}

fn x_from_wire(array: WireArray) -> XValues {
    match array {
        WireArray::Flat(values) => XValues::Shared(from_wire(values)),
        WireArray::Nested(series) => XValues::PerCurve(series.into_iter().map(from_wire).collect()),
    }
}

fn y_from_wire(array: WireArray) -> Vec<Column> {
    match array {
        WireArray::Flat(values) if values.is_empty() => Vec::new(),
        WireArray::Flat(values) => vec![from_wire(values)],
        WireArray::Nested(series) => series.into_iter().map(from_wire).collect(),
    }
}

fn x_to_wire(x: &XValues) -> WireArray {
    match x {
        XValues::Shared(column) => WireArray::Flat(to_wire(column)),
        XValues::PerCurve(columns) => WireArray::Nested(columns.iter().map(to_wire).collect()),
    }
}

pub(crate) fn decode_x(value: serde_json::Value) -> MarkResult<XValues> {
    Ok(x_from_wire(serde_json::from_value(value)?))
}

pub(crate) fn decode_y(value: serde_json::Value) -> MarkResult<Vec<Column>> {
    Ok(y_from_wire(serde_json::from_value(value)?))
}

pub(crate) fn decode_column(value: serde_json::Value) -> MarkResult<Column> {
    Ok(from_wire(serde_json::from_value(value)?))
}

pub(crate) fn encode_x(x: &XValues) -> MarkResult<serde_json::Value> {
    Ok(serde_json::to_value(x_to_wire(x))?)
}

pub(crate) fn encode_columns(columns: &[Column]) -> MarkResult<serde_json::Value> {
    let nested: Vec<Vec<Option<f64>>> = columns.iter().map(to_wire).collect();
    Ok(serde_json::to_value(nested)?)
}

impl From<WireSeries> for RawSeries {
    fn from(wire: WireSeries) -> Self {
        RawSeries {
            x: x_from_wire(wire.x),
            y: y_from_wire(wire.y),
            color: wire.color.map(from_wire).unwrap_or_default(),
        }
    }
}

impl From<RawSeries> for WireSeries {
    fn from(series: RawSeries) -> Self {
        WireSeries {
            x: x_to_wire(&series.x),
            y: WireArray::Nested(series.y.iter().map(to_wire).collect()),
            color: (!series.color.is_empty()).then(|| to_wire(&series.color)),
        }
    }
}
