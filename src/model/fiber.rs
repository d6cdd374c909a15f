use super::types::{Point3, distance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fiber {
    pub id: String,
    pub type_name: String,
    pub points: Vec<Point3>,
}

impl Fiber {
    pub fn new(id: impl Into<String>, type_name: impl Into<String>, points: Vec<Point3>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            points,
        }
    }

    /// Fibers with fewer than two points carry no direction and are never converted.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| distance(&w[0], &w[1])).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiberState {
    /// Per-axis size of the fiber engine's simulation box; all zero when unknown.
    pub box_extent: Point3,
    pub fibers: BTreeMap<String, Fiber>,
}

impl FiberState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fibers(box_extent: Point3, fibers: impl IntoIterator<Item = Fiber>) -> Self {
        Self {
            box_extent,
            fibers: fibers.into_iter().map(|f| (f.id.clone(), f)).collect(),
        }
    }

    pub fn insert(&mut self, fiber: Fiber) -> Option<Fiber> {
        self.fibers.insert(fiber.id.clone(), fiber)
    }

    #[inline]
    pub fn fiber_count(&self) -> usize {
        self.fibers.len()
    }

    /// A zero extent on any axis means the geometry has not been recovered yet.
    #[inline]
    pub fn has_box_extent(&self) -> bool {
        self.box_extent.iter().all(|&v| v > 0.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fibers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_and_length() {
        let single = Fiber::new("a", "Actin-Polymer", vec![[0.0, 0.0, 0.0]]);
        assert!(single.is_degenerate());

        let bent = Fiber::new(
            "b",
            "Actin-Polymer",
            vec![[0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [3.0, 4.0, 0.0]],
        );
        assert!(!bent.is_degenerate());
        assert!((bent.length() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn state_keys_fibers_by_id() {
        let mut state = FiberState::new();
        assert!(!state.has_box_extent());
        state.insert(Fiber::new("2", "A", vec![]));
        state.insert(Fiber::new("1", "A", vec![]));
        assert_eq!(state.fiber_count(), 2);
        assert_eq!(state.ids().collect::<Vec<_>>(), vec!["1", "2"]);

        state.box_extent = [10.0, 10.0, 0.0];
        assert!(!state.has_box_extent());
        state.box_extent = [10.0, 10.0, 10.0];
        assert!(state.has_box_extent());
    }
}
