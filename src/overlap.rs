use cgmath::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{resolve_static, Polygon};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapTest {
    /// Separating axis theorem, only correct for convex polygons
    SeparatingAxis,
    /// Spokes from each polygon's position to its vertices tested against the other's edges
    Diagonals,
    /// Same detection as [`OverlapTest::Diagonals`], followed by [`resolve_static`]
    #[default]
    DiagonalsStaticResolution,
}

impl OverlapTest {
    pub const ALL: [OverlapTest; 3] = [
        OverlapTest::SeparatingAxis,
        OverlapTest::Diagonals,
        OverlapTest::DiagonalsStaticResolution,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OverlapTest::SeparatingAxis => "Separating Axis",
            OverlapTest::Diagonals => "Diagonals",
            OverlapTest::DiagonalsStaticResolution => "Diagonals + Static Resolution",
        }
    }

    pub fn resolves(self) -> bool {
        matches!(self, OverlapTest::DiagonalsStaticResolution)
    }

    /// Returns whether the polygons overlapped when the test started.
    ///
    /// Only the resolving variant writes to `s1`, and only its `position`;
    /// `points` are left as they were so the caller decides when to transform again.
    pub fn test(self, s1: &mut Polygon, s2: &Polygon) -> bool {
        match self {
            OverlapTest::SeparatingAxis => separating_axis(s1, s2),
            OverlapTest::Diagonals => diagonals(s1, s2),
            OverlapTest::DiagonalsStaticResolution => {
                let overlap = diagonals(s1, s2);
                resolve_static(s1, s2);
                overlap
            }
        }
    }
}

/// Intersection parameters `(t1, t2)` along the two segments, both in `[0, 1)`.
///
/// Parallel and colinear segments have a zero denominator and never intersect.
pub fn segment_intersection(
    start1: cgmath::Vector2<f32>,
    end1: cgmath::Vector2<f32>,
    start2: cgmath::Vector2<f32>,
    end2: cgmath::Vector2<f32>,
) -> Option<(f32, f32)> {
    let h = (end2.x - start2.x) * (start1.y - end1.y) - (start1.x - end1.x) * (end2.y - start2.y);
    if h == 0.0 {
        return None;
    }

    let t1 = ((start2.y - end2.y) * (start1.x - start2.x)
        + (end2.x - start2.x) * (start1.y - start2.y))
        / h;
    let t2 = ((start1.y - end1.y) * (start1.x - start2.x)
        + (end1.x - start1.x) * (start1.y - start2.y))
        / h;

    // NaN fails both comparisons, infinities fail one of them
    let inside = |t: f32| (0.0..1.0).contains(&t);
    (inside(t1) && inside(t2)).then_some((t1, t2))
}

/// Segments from the polygon's position to each of its world space points.
fn spokes(
    polygon: &Polygon,
) -> impl Iterator<Item = (cgmath::Vector2<f32>, cgmath::Vector2<f32>)> + '_ {
    polygon
        .points
        .iter()
        .map(move |&point| (polygon.position, point))
}

/// Projects every point onto `axis`, returning `(min, max)`.
fn project(points: &[cgmath::Vector2<f32>], axis: cgmath::Vector2<f32>) -> (f32, f32) {
    points.iter().fold(
        (f32::INFINITY, f32::NEG_INFINITY),
        |(min, max), point| {
            let q = point.dot(axis);
            (min.min(q), max.max(q))
        },
    )
}

fn edge_axes(polygon: &Polygon) -> impl Iterator<Item = cgmath::Vector2<f32>> + '_ {
    polygon.edges().map(|(a, b)| {
        let edge = b - a;
        cgmath::vec2(-edge.y, edge.x)
    })
}

pub fn separating_axis(s1: &Polygon, s2: &Polygon) -> bool {
    if s1.is_degenerate() || s2.is_degenerate() {
        return false;
    }

    let shapes = [s1, s2];
    for role in 0..2 {
        let (poly1, poly2) = (shapes[role], shapes[1 - role]);
        for axis in edge_axes(poly1) {
            let (min_r1, max_r1) = project(&poly1.points, axis);
            let (min_r2, max_r2) = project(&poly2.points, axis);
            if max_r2 < min_r1 || max_r1 < min_r2 {
                return false;
            }
        }
    }
    true
}

pub fn diagonals(s1: &Polygon, s2: &Polygon) -> bool {
    if s1.is_degenerate() || s2.is_degenerate() {
        return false;
    }

    let shapes = [s1, s2];
    (0..2).any(|role| {
        let (poly1, poly2) = (shapes[role], shapes[1 - role]);
        spokes(poly1).any(|(start1, end1)| {
            poly2
                .edges()
                .any(|(start2, end2)| segment_intersection(start1, end1, start2, end2).is_some())
        })
    })
}

/// Smallest overlap of the two polygons' projections over all edge normals.
///
/// Zero when a separating axis exists. Like [`separating_axis`] this assumes convex polygons.
pub fn penetration_depth(s1: &Polygon, s2: &Polygon) -> f32 {
    if s1.is_degenerate() || s2.is_degenerate() {
        return 0.0;
    }

    let mut depth = f32::INFINITY;
    for axis in edge_axes(s1).chain(edge_axes(s2)) {
        let length = axis.magnitude();
        if length == 0.0 {
            continue;
        }
        let axis = axis / length;
        let (min_r1, max_r1) = project(&s1.points, axis);
        let (min_r2, max_r2) = project(&s2.points, axis);
        let overlap = max_r1.min(max_r2) - min_r1.max(min_r2);
        if overlap <= 0.0 {
            return 0.0;
        }
        depth = depth.min(overlap);
    }

    if depth.is_finite() {
        depth
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn square(x: f32, y: f32, half_width: f32) -> Polygon {
        Polygon::new(
            cgmath::vec2(x, y),
            0.0,
            vec![
                cgmath::vec2(-half_width, -half_width),
                cgmath::vec2(-half_width, half_width),
                cgmath::vec2(half_width, half_width),
                cgmath::vec2(half_width, -half_width),
            ],
        )
    }

    #[test]
    fn segments_crossing_at_midpoints() {
        let (t1, t2) = segment_intersection(
            cgmath::vec2(0.0, 0.0),
            cgmath::vec2(2.0, 2.0),
            cgmath::vec2(0.0, 2.0),
            cgmath::vec2(2.0, 0.0),
        )
        .unwrap();
        assert_abs_diff_eq!(t1, 0.5);
        assert_abs_diff_eq!(t2, 0.5);
    }

    #[test]
    fn first_parameter_runs_along_first_segment() {
        let (t1, t2) = segment_intersection(
            cgmath::vec2(0.0, 0.0),
            cgmath::vec2(4.0, 0.0),
            cgmath::vec2(1.0, -1.0),
            cgmath::vec2(1.0, 1.0),
        )
        .unwrap();
        assert_abs_diff_eq!(t1, 0.25);
        assert_abs_diff_eq!(t2, 0.5);
    }

    #[test]
    fn parallel_segments_never_intersect() {
        for offset in [-3.0, -0.5, 0.001, 1.0, 100.0] {
            assert_eq!(
                segment_intersection(
                    cgmath::vec2(0.0, 0.0),
                    cgmath::vec2(5.0, 1.0),
                    cgmath::vec2(0.0, offset),
                    cgmath::vec2(5.0, 1.0 + offset),
                ),
                None
            );
        }
    }

    #[test]
    fn colinear_segments_never_intersect() {
        assert_eq!(
            segment_intersection(
                cgmath::vec2(0.0, 0.0),
                cgmath::vec2(2.0, 0.0),
                cgmath::vec2(1.0, 0.0),
                cgmath::vec2(3.0, 0.0),
            ),
            None
        );
    }

    #[test]
    fn end_points_are_exclusive() {
        assert_eq!(
            segment_intersection(
                cgmath::vec2(0.0, 0.0),
                cgmath::vec2(1.0, 0.0),
                cgmath::vec2(1.0, -1.0),
                cgmath::vec2(1.0, 1.0),
            ),
            None
        );
    }

    #[test]
    fn identical_squares_overlap_with_separating_axis() {
        assert!(separating_axis(&square(0.0, 0.0, 1.0), &square(0.0, 0.0, 1.0)));
    }

    #[test]
    fn distant_squares_do_not_overlap() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(10.0, 0.0, 1.0);
        assert!(!separating_axis(&a, &b));
        assert!(!diagonals(&a, &b));
    }

    #[test]
    fn coincident_squares_escape_diagonals() {
        // every spoke ends exactly on a corner of the other square, where `t1 == 1`
        assert!(!diagonals(&square(0.0, 0.0, 1.0), &square(0.0, 0.0, 1.0)));
    }

    #[test]
    fn penetration_depth_of_offset_squares() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(15.0, 0.0, 10.0);
        assert_abs_diff_eq!(penetration_depth(&a, &b), 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(penetration_depth(&a, &square(40.0, 0.0, 10.0)), 0.0);
    }

    #[test]
    fn degenerate_polygons_never_overlap() {
        let empty = Polygon::new(cgmath::vec2(0.0, 0.0), 0.0, vec![]);
        let point = Polygon::new(cgmath::vec2(0.0, 0.0), 0.0, vec![cgmath::vec2(0.0, 0.0)]);
        let other = square(0.0, 0.0, 5.0);
        for test in OverlapTest::ALL {
            for degenerate in [&empty, &point] {
                let mut a = degenerate.clone();
                assert!(!test.test(&mut a, &other));
                let mut b = other.clone();
                assert!(!test.test(&mut b, degenerate));
                assert_eq!(b.position, other.position);
            }
        }
        assert_eq!(penetration_depth(&empty, &other), 0.0);
    }

    #[test]
    fn only_the_resolving_test_moves_shapes() {
        let b = square(15.0, 0.0, 10.0);
        for test in OverlapTest::ALL {
            let mut a = square(0.0, 0.0, 10.0);
            assert!(test.test(&mut a, &b));
            assert_eq!(a.position != cgmath::vec2(0.0, 0.0), test.resolves());
        }
    }
}
