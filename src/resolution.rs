use crate::{segment_intersection, Polygon};

/// How far the spoke reaches past every edge of `other` it crosses.
fn spoke_displacement(
    start: cgmath::Vector2<f32>,
    end: cgmath::Vector2<f32>,
    other: &Polygon,
) -> cgmath::Vector2<f32> {
    other
        .edges()
        .filter_map(|(edge_start, edge_end)| segment_intersection(start, end, edge_start, edge_end))
        .fold(cgmath::vec2(0.0, 0.0), |displacement, (t1, _)| {
            displacement + (end - start) * (1.0 - t1)
        })
}

/// Pushes `s1` out of `s2` by moving only `s1.position`.
///
/// First `s1`'s spokes are pulled back out of `s2`'s edges, then `s2`'s spokes push `s1` away.
/// The position is updated after every spoke, so later spokes start from the already moved
/// position, while `points` stay as they were at the start of the frame.
pub fn resolve_static(s1: &mut Polygon, s2: &Polygon) {
    if s1.is_degenerate() || s2.is_degenerate() {
        return;
    }

    for role in 0..2 {
        let sign: f32 = if role == 0 { -1.0 } else { 1.0 };
        let spoke_count = if role == 0 {
            s1.points.len()
        } else {
            s2.points.len()
        };

        for spoke in 0..spoke_count {
            let displacement = {
                let shapes = [&*s1, s2];
                let (poly1, poly2) = (shapes[role], shapes[1 - role]);
                spoke_displacement(poly1.position, poly1.points[spoke], poly2)
            };
            s1.position += displacement * sign;
        }
    }
}
