use crate::geometry::BoundingBox;
use crate::model::fiber::Fiber;
use crate::model::types::{Point3, distance};
use std::collections::BTreeMap;

/// Crops every fiber to the axis-aligned box `[min_extent, max_extent]`.
///
/// Each polyline is clipped segment by segment. When a fiber leaves and
/// re-enters the box, only its longest inside run is kept so that fiber ids
/// stay unique. Fibers with no inside run of at least two distinct points are
/// dropped.
pub fn crop_to_box(
    fibers: &BTreeMap<String, Fiber>,
    min_extent: Point3,
    max_extent: Point3,
) -> BTreeMap<String, Fiber> {
    let bbox = BoundingBox::new(min_extent, max_extent);
    fibers
        .iter()
        .filter_map(|(id, fiber)| {
            crop_fiber(fiber, &bbox).map(|points| {
                (
                    id.clone(),
                    Fiber {
                        points,
                        ..fiber.clone()
                    },
                )
            })
        })
        .collect()
}

/// The kept inside run of a fiber and the segments it starts and ends on.
struct InsideRun {
    points: Vec<Point3>,
    first_segment: usize,
    last_segment: usize,
}

fn crop_fiber(fiber: &Fiber, bbox: &BoundingBox) -> Option<Vec<Point3>> {
    longest_inside_run(fiber, bbox).map(|run| run.points)
}

fn longest_inside_run(fiber: &Fiber, bbox: &BoundingBox) -> Option<InsideRun> {
    if fiber.is_degenerate() {
        return None;
    }

    let mut runs: Vec<InsideRun> = Vec::new();
    for (segment_index, segment) in fiber.points.windows(2).enumerate() {
        let Some((start, end)) = bbox.clip_segment(&segment[0], &segment[1]) else {
            continue;
        };
        match runs.last_mut() {
            Some(run) if run.points.last() == Some(&start) => {
                push_distinct(&mut run.points, end);
                run.last_segment = segment_index;
            }
            _ => {
                let mut points = vec![start];
                push_distinct(&mut points, end);
                runs.push(InsideRun {
                    points,
                    first_segment: segment_index,
                    last_segment: segment_index,
                });
            }
        }
    }

    runs.into_iter()
        .filter(|run| run.points.len() >= 2)
        .max_by(|a, b| arc_length(&a.points).total_cmp(&arc_length(&b.points)))
}

/// Puts `replacement` where [`crop_to_box`] cut `original`, keeping the parts
/// of `original` outside the box on either side.
///
/// Original points inside the box are taken to be covered by `replacement`.
/// When `original` has no inside run, `replacement` is returned as is.
pub fn splice_cropped(
    original: &Fiber,
    replacement: &[Point3],
    min_extent: Point3,
    max_extent: Point3,
) -> Vec<Point3> {
    let bbox = BoundingBox::new(min_extent, max_extent);
    let Some(run) = longest_inside_run(original, &bbox) else {
        return replacement.to_vec();
    };

    let points = &original.points;
    let head_end = if bbox.contains(&points[run.first_segment]) {
        run.first_segment
    } else {
        run.first_segment + 1
    };
    let tail_start = if bbox.contains(&points[run.last_segment + 1]) {
        run.last_segment + 2
    } else {
        run.last_segment + 1
    };

    let mut spliced = Vec::with_capacity(head_end + replacement.len() + points.len() - tail_start);
    for point in points[..head_end]
        .iter()
        .chain(replacement)
        .chain(&points[tail_start..])
    {
        push_distinct(&mut spliced, *point);
    }
    spliced
}

fn push_distinct(run: &mut Vec<Point3>, point: Point3) {
    if run.last() != Some(&point) {
        run.push(point);
    }
}

fn arc_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| distance(&w[0], &w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::within_box;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const MIN: Point3 = [0.0, 0.0, 0.0];
    const MAX: Point3 = [10.0, 10.0, 10.0];

    fn fibers(list: Vec<Fiber>) -> BTreeMap<String, Fiber> {
        list.into_iter().map(|f| (f.id.clone(), f)).collect()
    }

    #[test]
    fn keeps_inside_fiber_unchanged() {
        let input = fibers(vec![Fiber::new(
            "a",
            "Actin-Polymer",
            vec![[1.0, 1.0, 1.0], [5.0, 5.0, 5.0], [9.0, 1.0, 1.0]],
        )]);
        assert_eq!(crop_to_box(&input, MIN, MAX), input);
    }

    #[test]
    fn drops_outside_and_degenerate_fibers() {
        let input = fibers(vec![
            Fiber::new("out", "A", vec![[20.0, 1.0, 1.0], [30.0, 1.0, 1.0]]),
            Fiber::new("dot", "A", vec![[1.0, 1.0, 1.0]]),
            Fiber::new("touch", "A", vec![[-5.0, 0.0, 0.0], [0.0, 0.0, 0.0]]),
        ]);
        assert!(crop_to_box(&input, MIN, MAX).is_empty());
    }

    #[test]
    fn clips_crossing_fiber_at_boundary() {
        let input = fibers(vec![Fiber::new(
            "x",
            "A",
            vec![[-10.0, 5.0, 5.0], [5.0, 5.0, 5.0], [25.0, 5.0, 5.0]],
        )]);
        let cropped = crop_to_box(&input, MIN, MAX);
        let points = &cropped["x"].points;
        assert_eq!(points.len(), 3);
        assert_relative_eq!(points[0][0], 0.0, epsilon = 1e-9);
        assert_eq!(points[1], [5.0, 5.0, 5.0]);
        assert_relative_eq!(points[2][0], 10.0, epsilon = 1e-9);
        assert!(points.iter().all(|p| p[1] == 5.0 && p[2] == 5.0));
    }

    #[test]
    fn keeps_longest_run_when_fiber_reenters() {
        let input = fibers(vec![Fiber::new(
            "u",
            "A",
            vec![
                [1.0, 5.0, 5.0],
                [2.0, 5.0, 5.0],
                [2.0, 15.0, 5.0],
                [8.0, 15.0, 5.0],
                [8.0, 1.0, 5.0],
            ],
        )]);
        let cropped = crop_to_box(&input, MIN, MAX);
        let points = &cropped["u"].points;
        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0][1], 10.0, epsilon = 1e-9);
        assert_eq!(points[1], [8.0, 1.0, 5.0]);
        assert!(points.iter().all(|p| p[0] == 8.0));
    }

    #[test]
    fn splice_restores_parts_outside_the_box() {
        let original = Fiber::new(
            "x",
            "A",
            vec![[-10.0, 5.0, 5.0], [5.0, 5.0, 5.0], [25.0, 5.0, 5.0], [30.0, 5.0, 5.0]],
        );
        let replacement = [[0.0, 5.0, 5.0], [4.0, 6.0, 5.0], [8.0, 6.0, 5.0]];
        let spliced = splice_cropped(&original, &replacement, MIN, MAX);
        assert_eq!(
            spliced,
            vec![
                [-10.0, 5.0, 5.0],
                [0.0, 5.0, 5.0],
                [4.0, 6.0, 5.0],
                [8.0, 6.0, 5.0],
                [25.0, 5.0, 5.0],
                [30.0, 5.0, 5.0],
            ]
        );
    }

    #[test]
    fn splice_of_inside_fiber_is_the_replacement() {
        let original = Fiber::new("a", "A", vec![[1.0, 1.0, 1.0], [9.0, 1.0, 1.0]]);
        let replacement = [[1.0, 1.0, 1.0], [4.0, 1.0, 1.0], [7.0, 1.0, 1.0]];
        assert_eq!(
            splice_cropped(&original, &replacement, MIN, MAX),
            replacement.to_vec()
        );
    }

    #[test]
    fn splice_keeps_the_cut_off_excursion() {
        let original = Fiber::new(
            "u",
            "A",
            vec![
                [1.0, 5.0, 5.0],
                [2.0, 5.0, 5.0],
                [2.0, 15.0, 5.0],
                [8.0, 15.0, 5.0],
                [8.0, 1.0, 5.0],
            ],
        );
        let replacement = [[8.0, 10.0, 5.0], [8.0, 1.0, 5.0]];
        let spliced = splice_cropped(&original, &replacement, MIN, MAX);
        assert_eq!(spliced[..4], original.points[..4]);
        assert_eq!(spliced[4..], replacement);
    }

    fn arb_point() -> impl Strategy<Value = Point3> {
        [-5.0..15.0f64, -5.0..15.0f64, -5.0..15.0f64]
    }

    fn arb_fibers() -> impl Strategy<Value = BTreeMap<String, Fiber>> {
        prop::collection::vec(prop::collection::vec(arb_point(), 1..6), 0..6).prop_map(|all| {
            all.into_iter()
                .enumerate()
                .map(|(i, points)| (i.to_string(), Fiber::new(i.to_string(), "A", points)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn cropping_is_idempotent(input in arb_fibers()) {
            let once = crop_to_box(&input, MIN, MAX);
            let twice = crop_to_box(&once, MIN, MAX);
            prop_assert_eq!(&once, &twice);
        }

        #[test]
        fn splicing_the_crop_back_keeps_every_original_point(input in arb_fibers()) {
            let cropped = crop_to_box(&input, MIN, MAX);
            for (id, fiber) in &cropped {
                let original = &input[id];
                let spliced = splice_cropped(original, &fiber.points, MIN, MAX);
                for point in &original.points {
                    prop_assert!(spliced.contains(point));
                }
            }
        }

        #[test]
        fn cropped_points_lie_inside(input in arb_fibers()) {
            for fiber in crop_to_box(&input, MIN, MAX).values() {
                prop_assert!(fiber.points.len() >= 2);
                prop_assert!(fiber.points.iter().all(|p| within_box(p, &MIN, &MAX)));
            }
        }
    }
}
