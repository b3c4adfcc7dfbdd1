//! Drag session state and coordinate bookkeeping.

use multicurve_core::math::{DVec2, dvec2};

use crate::notify::DataPoint;
use crate::record::PointRecord;
use crate::scale::AxisScale;
use crate::series::RawSeries;

/// An in-flight drag of one point. Lives only between start and end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub curve: usize,
    pub sub_index: usize,
    /// Data-space position when the drag started.
    pub origin: DataPoint,
    /// Current pixel position of the point.
    pub pixel: DVec2,
}

impl DragSession {
    pub fn start(curve: usize, point: &PointRecord, x: &dyn AxisScale, y: &dyn AxisScale) -> Self {
        Self {
            curve,
            sub_index: point.sub_index,
            origin: DataPoint {
                x: point.x,
                y: point.y,
            },
            pixel: dvec2(x.scale(point.x) + x.offset(), y.scale(point.y) + y.offset()),
        }
    }

    /// Follow the pointer. `restrict_x` keeps the y pixel, `restrict_y` keeps
    /// the x pixel; with both set the point does not move and `false` is
    /// returned.
    pub fn follow(&mut self, pointer: DVec2, restrict_x: bool, restrict_y: bool) -> bool {
        if restrict_x && restrict_y {
            return false;
        }
        if !restrict_y {
            self.pixel.x = pointer.x;
        }
        if !restrict_x {
            self.pixel.y = pointer.y;
        }
        true
    }

    /// Current position in data space. `pixel` carries the scales' offsets,
    /// which are removed before inverting.
    pub fn data_point(&self, x: &dyn AxisScale, y: &dyn AxisScale) -> DataPoint {
        DataPoint {
            x: x.invert(self.pixel.x - x.offset()),
            y: y.invert(self.pixel.y - y.offset()),
        }
    }
}

/// Result of writing a drag position into a copy of the raw arrays.
#[derive(Debug, Clone)]
pub struct DragWrite {
    pub data: RawSeries,
    /// The data-space point the write was computed from.
    pub point: DataPoint,
    pub x_written: bool,
    pub y_written: bool,
}

impl DragWrite {
    pub fn is_empty(&self) -> bool {
        !self.x_written && !self.y_written
    }
}

/// Write the session's position into a copy of `data`, honoring the
/// restriction flags. Only the owning columns are replaced.
pub fn write_back(
    data: &RawSeries,
    session: &DragSession,
    x: &dyn AxisScale,
    y: &dyn AxisScale,
    restrict_x: bool,
    restrict_y: bool,
) -> DragWrite {
    let mut data = data.clone();
    let point = session.data_point(x, y);

    let x_written = !restrict_y && data.write_x(session.curve, session.sub_index, point.x);
    let y_written = !restrict_x && data.write_y(session.curve, session.sub_index, point.y);

    DragWrite {
        data,
        point,
        x_written,
        y_written,
    }
}
