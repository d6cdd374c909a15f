/// A Cartesian point or per-axis extent.
pub type Point3 = [f64; 3];

/// Identifier of a particle or topology in the monomer representation.
pub type EntityId = u64;

/// Component-wise `a + b`.
#[inline]
pub fn add(a: &Point3, b: &Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Component-wise `a - b`.
#[inline]
pub fn sub(a: &Point3, b: &Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: &Point3, factor: f64) -> Point3 {
    [a[0] * factor, a[1] * factor, a[2] * factor]
}

#[inline]
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    let d = sub(a, b);
    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_helpers() {
        let a = [1.0, 2.0, 3.0];
        let b = [0.5, -1.0, 2.0];
        assert_eq!(add(&a, &b), [1.5, 1.0, 5.0]);
        assert_eq!(sub(&a, &b), [0.5, 3.0, 1.0]);
        assert_eq!(scale(&a, 2.0), [2.0, 4.0, 6.0]);
        assert!((distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0]) - 5.0).abs() < 1e-12);
    }
}
