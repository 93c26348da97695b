use serde::{Deserialize, Serialize};

/// A point in drawing-surface space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    pub fn delta_to(&self, other: Coord) -> Coord {
        Coord {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Axis-aligned box accumulated over a stroke's sampled points.
///
/// While accumulating, `start` is seeded at +infinity and `end` at -infinity
/// and monotonically tightened; a box that never saw a point keeps the
/// sentinel values and has no positive-area intersection with anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub start: Coord,
    pub end: Coord,
}

impl BoundingBox {
    pub fn unset() -> Self {
        Self {
            start: Coord::new(f64::INFINITY, f64::INFINITY),
            end: Coord::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_set(&self) -> bool {
        self.start.x.is_finite()
    }

    /// Widens the box to include `point`.
    pub fn include(&mut self, point: Coord) {
        self.start.x = self.start.x.min(point.x);
        self.start.y = self.start.y.min(point.y);
        self.end.x = self.end.x.max(point.x);
        self.end.y = self.end.y.max(point.y);
    }

    pub fn area(&self) -> f64 {
        (self.end.x - self.start.x) * (self.end.y - self.start.y)
    }

    /// Intersection area divided by `self`'s own area.
    ///
    /// Asymmetric on purpose: the ratio answers "how much of *this* box sits
    /// on top of `other`", so `a.overlap_ratio(b) != b.overlap_ratio(a)` in
    /// general. Returns 0 when either intersecting dimension is <= 0.
    pub fn overlap_ratio(&self, other: &BoundingBox) -> f64 {
        let x1 = self.start.x.max(other.start.x);
        let y1 = self.start.y.max(other.start.y);
        let x2 = self.end.x.min(other.end.x);
        let y2 = self.end.y.min(other.end.y);

        let overlap_width = x2 - x1;
        let overlap_height = y2 - y1;

        if overlap_width <= 0.0 || overlap_height <= 0.0 {
            return 0.0;
        }

        (overlap_width * overlap_height) / self.area()
    }
}

/// Angle in `[0, pi]` radians between two movement deltas.
///
/// Returns `None` when either delta has zero magnitude, since a stationary
/// sample has no direction to compare against.
pub fn turn_angle(prev_delta: Coord, curr_delta: Coord) -> Option<f64> {
    let prev_mag = prev_delta.magnitude();
    let curr_mag = curr_delta.magnitude();
    if prev_mag == 0.0 || curr_mag == 0.0 {
        return None;
    }

    let dot = (prev_delta.x / prev_mag) * (curr_delta.x / curr_mag)
        + (prev_delta.y / prev_mag) * (curr_delta.y / curr_mag);
    // Clamp against float drift so acos stays defined.
    Some(dot.clamp(-1.0, 1.0).acos())
}
