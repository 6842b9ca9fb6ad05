use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    /// Vertices in model space, in winding order
    pub model: Vec<cgmath::Vector2<f32>>,
    pub position: cgmath::Vector2<f32>,
    pub angle: f32,
    /// World space vertices, only valid after [`Polygon::update_points`]
    #[serde(skip)]
    pub points: Vec<cgmath::Vector2<f32>>,
    #[serde(skip)]
    pub overlap: bool,
}

impl Polygon {
    pub fn new(
        position: cgmath::Vector2<f32>,
        angle: f32,
        model: Vec<cgmath::Vector2<f32>>,
    ) -> Self {
        let mut polygon = Self {
            model,
            position,
            angle,
            points: vec![],
            overlap: false,
        };
        polygon.update_points();
        polygon
    }

    /// A regular polygon with its first vertex on the positive x axis.
    pub fn regular(position: cgmath::Vector2<f32>, radius: f32, sides: usize) -> Self {
        let theta = std::f32::consts::TAU / sides as f32;
        let model = (0..sides)
            .map(|i| {
                let angle = theta * i as f32;
                cgmath::vec2(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Self::new(position, 0.0, model)
    }

    pub fn update_points(&mut self) {
        let (sin, cos) = self.angle.sin_cos();
        let position = self.position;
        self.points.clear();
        self.points.extend(self.model.iter().map(|point| {
            cgmath::vec2(
                point.x * cos - point.y * sin,
                point.x * sin + point.y * cos,
            ) + position
        }));
    }

    /// World space edges as `(start, end)` pairs, closing the loop back to the first point.
    pub fn edges(
        &self,
    ) -> impl Iterator<Item = (cgmath::Vector2<f32>, cgmath::Vector2<f32>)> + '_ {
        let len = self.points.len();
        (0..len).map(move |a| (self.points[a], self.points[(a + 1) % len]))
    }

    /// Polygons with fewer than two points can never overlap anything
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    pub fn heading(&self) -> cgmath::Vector2<f32> {
        cgmath::vec2(self.angle.cos(), self.angle.sin())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use cgmath::prelude::*;

    use super::*;

    fn quad() -> Vec<cgmath::Vector2<f32>> {
        vec![
            cgmath::vec2(-30.0, -30.0),
            cgmath::vec2(-30.0, 10.0),
            cgmath::vec2(30.0, 30.0),
            cgmath::vec2(30.0, -30.0),
        ]
    }

    #[test]
    fn zero_angle_only_translates() {
        let polygon = Polygon::new(cgmath::vec2(120.0, 50.0), 0.0, quad());
        assert_eq!(polygon.points.len(), polygon.model.len());
        for (point, model) in polygon.points.iter().zip(&polygon.model) {
            assert_abs_diff_eq!(*point, *model + cgmath::vec2(120.0, 50.0));
        }
    }

    #[test]
    fn full_turn_matches_zero_angle() {
        let unrotated = Polygon::new(cgmath::vec2(-4.0, 7.5), 0.0, quad());
        let mut rotated = unrotated.clone();
        rotated.angle = std::f32::consts::TAU;
        rotated.update_points();
        for (a, b) in rotated.points.iter().zip(&unrotated.points) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-3);
        }
    }

    #[test]
    fn quarter_turn_rotates_counter_clockwise() {
        let polygon = Polygon::new(
            cgmath::vec2(0.0, 0.0),
            std::f32::consts::FRAC_PI_2,
            vec![cgmath::vec2(1.0, 0.0)],
        );
        assert_abs_diff_eq!(polygon.points[0], cgmath::vec2(0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn update_keeps_point_count_after_model_changes() {
        let mut polygon = Polygon::regular(cgmath::vec2(0.0, 0.0), 10.0, 5);
        polygon.model.pop();
        polygon.update_points();
        assert_eq!(polygon.points.len(), 4);
    }

    #[test]
    fn regular_polygon_vertices_lie_on_radius() {
        let polygon = Polygon::regular(cgmath::vec2(100.0, 100.0), 30.0, 5);
        assert_abs_diff_eq!(polygon.points[0], cgmath::vec2(130.0, 100.0), epsilon = 1e-4);
        for point in &polygon.points {
            let offset = *point - polygon.position;
            assert_abs_diff_eq!(offset.magnitude(), 30.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn edges_close_the_loop() {
        let polygon = Polygon::new(cgmath::vec2(0.0, 0.0), 0.0, quad());
        let edges = polygon.edges().collect::<Vec<_>>();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].1, polygon.points[0]);
    }
}
