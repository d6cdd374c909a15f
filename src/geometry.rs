//! Vector transforms and axis-aligned box tests shared by the translator and
//! the fiber-engine adapter.

use crate::model::types::{Point3, add, sub};

/// Adds `offset` to every point, or subtracts it when `inverse` is set.
pub fn translate(points: &[Point3], offset: Point3, inverse: bool) -> Vec<Point3> {
    if inverse {
        points.iter().map(|p| sub(p, &offset)).collect()
    } else {
        points.iter().map(|p| add(p, &offset)).collect()
    }
}

/// Inclusive axis-aligned containment test.
#[inline]
pub fn within_box(point: &Point3, min_extent: &Point3, max_extent: &Point3) -> bool {
    (0..3).all(|axis| point[axis] >= min_extent[axis] && point[axis] <= max_extent[axis])
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Box spanning `[0, extent]` on every axis.
    pub fn from_extent(extent: Point3) -> Self {
        Self::new([0.0; 3], extent)
    }

    /// Cube of edge `size` centered on `center`.
    pub fn centered(center: Point3, size: f64) -> Self {
        let half = size / 2.0;
        Self::new(
            [center[0] - half, center[1] - half, center[2] - half],
            [center[0] + half, center[1] + half, center[2] + half],
        )
    }

    #[inline]
    pub fn contains(&self, point: &Point3) -> bool {
        within_box(point, &self.min, &self.max)
    }

    pub fn center(&self) -> Point3 {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    pub fn clamp(&self, point: &Point3) -> Point3 {
        [
            point[0].clamp(self.min[0], self.max[0]),
            point[1].clamp(self.min[1], self.max[1]),
            point[2].clamp(self.min[2], self.max[2]),
        ]
    }

    /// Clips the segment `a -> b` against the box (Liang–Barsky).
    ///
    /// Returns the portion inside the box, or `None` when the segment misses it.
    /// Segments lying wholly inside are returned unchanged; clipped endpoints are
    /// clamped so rounding never places them outside.
    pub fn clip_segment(&self, a: &Point3, b: &Point3) -> Option<(Point3, Point3)> {
        let delta = sub(b, a);
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;

        for axis in 0..3 {
            let checks = [
                (-delta[axis], a[axis] - self.min[axis]),
                (delta[axis], self.max[axis] - a[axis]),
            ];
            for (p, q) in checks {
                if p == 0.0 {
                    if q < 0.0 {
                        return None;
                    }
                    continue;
                }
                let r = q / p;
                if p < 0.0 {
                    if r > t1 {
                        return None;
                    }
                    t0 = t0.max(r);
                } else {
                    if r < t0 {
                        return None;
                    }
                    t1 = t1.min(r);
                }
            }
        }

        let start = if t0 > 0.0 {
            self.clamp(&[
                a[0] + t0 * delta[0],
                a[1] + t0 * delta[1],
                a[2] + t0 * delta[2],
            ])
        } else {
            *a
        };
        let end = if t1 < 1.0 {
            self.clamp(&[
                a[0] + t1 * delta[0],
                a[1] + t1 * delta[1],
                a[2] + t1 * delta[2],
            ])
        } else {
            *b
        };
        Some((start, end))
    }
}
