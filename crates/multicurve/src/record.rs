//! Derived per-curve records produced by normalization.

use serde::Serialize;

/// One point of a curve.
///
/// `y0` is the paired value from the next curve (the last curve pairs with
/// itself) and feeds the `between` fill baseline.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
    pub y0: f64,
    pub sub_index: usize,
}

impl PointRecord {
    /// Whether the point can be placed on the plot.
    pub fn is_defined(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

fn same(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

// Gaps are NaN, so equality treats two NaNs as the same value.
impl PartialEq for PointRecord {
    fn eq(&self, other: &Self) -> bool {
        self.sub_index == other.sub_index
            && same(self.x, other.x)
            && same(self.y, other.y)
            && same(self.y0, other.y0)
    }
}

/// A normalized curve. `index` is the stable key used to reconcile rendered
/// elements across normalization passes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveRecord {
    pub name: String,
    pub values: Vec<PointRecord>,
    pub color: Option<f64>,
    pub index: usize,
}

impl CurveRecord {
    pub fn point(&self, sub_index: usize) -> Option<&PointRecord> {
        self.values.get(sub_index)
    }

    /// The last point that can be placed, used to anchor the curve label.
    pub fn last_defined(&self) -> Option<&PointRecord> {
        self.values.iter().rev().find(|p| p.is_defined())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64, sub_index: usize) -> PointRecord {
        PointRecord {
            x,
            y,
            y0: f64::NAN,
            sub_index,
        }
    }

    #[test]
    fn test_nan_points_compare_equal() {
        assert_eq!(point(f64::NAN, 1.0, 0), point(f64::NAN, 1.0, 0));
        assert_ne!(point(1.0, 1.0, 0), point(1.0, 1.0, 1));
    }

    #[test]
    fn test_defined() {
        assert!(point(1.0, 2.0, 0).is_defined());
        assert!(!point(1.0, f64::NAN, 0).is_defined());
        assert!(!point(f64::INFINITY, 2.0, 0).is_defined());
    }

    #[test]
    fn test_last_defined() {
        let curve = CurveRecord {
            name: "C1".into(),
            values: vec![point(1.0, 2.0, 0), point(2.0, 3.0, 1), point(3.0, f64::NAN, 2)],
            color: None,
            index: 0,
        };
        assert_eq!(curve.last_defined().map(|p| p.sub_index), Some(1));
    }
}
