use crate::model::types::{Point3, add, distance, scale, sub};

/// Produces an ordered monomer chain approximating a polyline.
///
/// Implementations receive the cropped polyline in the global frame and the
/// configured monomer spacing, and return monomer positions in chain order.
pub trait ChainGenerator {
    fn generate(&self, points: &[Point3], spacing: f64) -> Vec<Point3>;
}

impl<F> ChainGenerator for F
where
    F: Fn(&[Point3], f64) -> Vec<Point3>,
{
    fn generate(&self, points: &[Point3], spacing: f64) -> Vec<Point3> {
        self(points, spacing)
    }
}

/// Places monomers at every multiple of `spacing` along the polyline's arc
/// length, starting at its first point.
///
/// The last monomer therefore lies within one spacing of the fiber's end. A
/// polyline shorter than one spacing yields its two endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearChainGenerator;

impl ChainGenerator for LinearChainGenerator {
    fn generate(&self, points: &[Point3], spacing: f64) -> Vec<Point3> {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Vec::new();
        };
        let total: f64 = points.windows(2).map(|w| distance(&w[0], &w[1])).sum();
        if total < spacing {
            return vec![*first, *last];
        }

        let count = (total / spacing).floor() as usize + 1;
        let mut chain = Vec::with_capacity(count);
        let mut segments = points.windows(2);
        let mut current = segments.next();
        let mut walked = 0.0;

        for k in 0..count {
            let target = k as f64 * spacing;
            while let Some(seg) = current {
                let len = distance(&seg[0], &seg[1]);
                if target <= walked + len {
                    let t = if len > 0.0 { (target - walked) / len } else { 0.0 };
                    chain.push(add(&seg[0], &scale(&sub(&seg[1], &seg[0]), t)));
                    break;
                }
                walked += len;
                current = segments.next();
            }
            if current.is_none() {
                chain.push(*last);
                break;
            }
        }
        chain
    }
}
