use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{penetration_depth, OverlapTest, Polygon, DEFAULT_MOVE_SPEED, DEFAULT_ROTATION_SPEED};

/// Held state of the keys steering one shape
#[derive(Debug, Default, Clone, Copy)]
pub struct Controls {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub forward: bool,
    pub backward: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub overlap_test: OverlapTest,
    pub move_speed: f32,
    pub rotation_speed: f32,
    pub paused: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            overlap_test: OverlapTest::default(),
            move_speed: DEFAULT_MOVE_SPEED,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            paused: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub overlapping_pairs: usize,
    pub max_penetration_depth: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub shapes: Vec<Polygon>,
    pub settings: Settings,
    #[serde(skip)]
    pub stats: FrameStats,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(
            vec![
                Polygon::regular(cgmath::vec2(200.0, 150.0), 20.0, 3),
                Polygon::regular(cgmath::vec2(100.0, 100.0), 30.0, 5),
                Polygon::new(
                    cgmath::vec2(120.0, 50.0),
                    0.0,
                    vec![
                        cgmath::vec2(-30.0, -30.0),
                        cgmath::vec2(-30.0, 10.0),
                        cgmath::vec2(30.0, 30.0),
                        cgmath::vec2(30.0, -30.0),
                    ],
                ),
            ],
            Settings::default(),
        )
    }
}

impl Scene {
    pub fn new(shapes: Vec<Polygon>, settings: Settings) -> Self {
        let mut scene = Self {
            shapes,
            settings,
            stats: FrameStats::default(),
        };
        scene.transform();
        scene
    }

    /// Rotates and moves the shape at `index` along its heading. Unknown indices are ignored.
    pub fn apply_controls(&mut self, index: usize, controls: Controls, ts: f32) {
        let Settings {
            move_speed,
            rotation_speed,
            ..
        } = self.settings;
        let Some(shape) = self.shapes.get_mut(index) else {
            return;
        };

        if controls.rotate_left {
            shape.angle -= rotation_speed * ts;
        }
        if controls.rotate_right {
            shape.angle += rotation_speed * ts;
        }

        if controls.forward {
            shape.position += shape.heading() * move_speed * ts;
        }
        if controls.backward {
            shape.position -= shape.heading() * move_speed * ts;
        }
    }

    /// Recomputes the world space points of every shape and clears the overlap flags.
    pub fn transform(&mut self) {
        self.shapes.par_iter_mut().for_each(|shape| {
            shape.update_points();
            shape.overlap = false;
        });
    }

    /// Runs one frame: transform, then every unordered pair in index order.
    ///
    /// With a resolving overlap test the first shape of each pair is moved in place, so pairs
    /// tested later in the same frame see the positions left by earlier pairs.
    pub fn update(&mut self) {
        self.transform();

        let overlap_test = self.settings.overlap_test;
        let mut stats = FrameStats::default();
        for m in 0..self.shapes.len() {
            for n in m + 1..self.shapes.len() {
                let (head, tail) = self.shapes.split_at_mut(n);
                let (s1, s2) = (&mut head[m], &tail[0]);

                stats.max_penetration_depth =
                    stats.max_penetration_depth.max(penetration_depth(s1, s2));

                let overlap = overlap_test.test(s1, s2);
                log::trace!("shapes {m} and {n} overlap: {overlap}");
                if overlap {
                    stats.overlapping_pairs += 1;
                    s1.overlap = true;
                    tail[0].overlap = true;
                }
            }
        }
        self.stats = stats;
    }
}
