use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::{Controls, OverlapTest, Scene};

const STORAGE_KEY: &str = "App";

#[derive(Serialize, Deserialize)]
pub struct Camera {
    /// World position shown at the top left corner of the canvas
    position: cgmath::Vector2<f32>,
    /// Screen points per world unit
    zoom: f32,
}

impl Camera {
    fn world_to_screen(&self, rect: egui::Rect, point: cgmath::Vector2<f32>) -> egui::Pos2 {
        let offset = (point - self.position) * self.zoom;
        rect.min + egui::vec2(offset.x, offset.y)
    }

    fn screen_to_world(&self, rect: egui::Rect, pos: egui::Pos2) -> cgmath::Vector2<f32> {
        let offset = (pos - rect.min) / self.zoom;
        self.position + cgmath::vec2(offset.x, offset.y)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: cgmath::vec2(0.0, 0.0),
            zoom: 2.0,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct App {
    #[serde(skip, default = "std::time::Instant::now")]
    last_time: std::time::Instant,
    info_window_open: bool,
    settings_window_open: bool,
    shapes_window_open: bool,
    camera: Camera,
    scene: Scene,
}

impl Default for App {
    fn default() -> Self {
        Self {
            last_time: std::time::Instant::now(),
            info_window_open: false,
            settings_window_open: false,
            shapes_window_open: false,
            camera: Camera::default(),
            scene: Scene::default(),
        }
    }
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let Some(json) = cc.storage.and_then(|s| s.get_string(STORAGE_KEY)) else {
            return Self::default();
        };

        match serde_json::from_str::<Self>(&json) {
            Ok(mut app) => {
                app.scene.transform();
                log::info!("restored {} shapes", app.scene.shapes.len());
                app
            }
            Err(err) => {
                log::warn!("could not restore saved state, starting a new scene: {err}");
                Self::default()
            }
        }
    }

    fn reset_scene(&mut self) {
        self.scene = Scene::new(Scene::default().shapes, self.scene.settings);
        log::info!("scene reset");
    }

    fn read_controls(ctx: &egui::Context) -> [Controls; 2] {
        ctx.input(|i| {
            [
                Controls {
                    rotate_left: i.key_down(egui::Key::ArrowLeft),
                    rotate_right: i.key_down(egui::Key::ArrowRight),
                    forward: i.key_down(egui::Key::ArrowUp),
                    backward: i.key_down(egui::Key::ArrowDown),
                },
                Controls {
                    rotate_left: i.key_down(egui::Key::A),
                    rotate_right: i.key_down(egui::Key::D),
                    forward: i.key_down(egui::Key::W),
                    backward: i.key_down(egui::Key::S),
                },
            ]
        })
    }

    fn draw_scene(&self, painter: &egui::Painter, rect: egui::Rect) {
        for shape in &self.scene.shapes {
            let color = if shape.overlap {
                egui::Color32::RED
            } else {
                egui::Color32::WHITE
            };
            let stroke = egui::Stroke::new(1.0, color);

            for (start, end) in shape.edges() {
                painter.line_segment(
                    [
                        self.camera.world_to_screen(rect, start),
                        self.camera.world_to_screen(rect, end),
                    ],
                    stroke,
                );
            }

            // Pivot indicator
            if let Some(&first) = shape.points.first() {
                painter.line_segment(
                    [
                        self.camera.world_to_screen(rect, first),
                        self.camera.world_to_screen(rect, shape.position),
                    ],
                    stroke,
                );
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let time = std::time::Instant::now();
        let dt = time.duration_since(self.last_time);
        self.last_time = time;

        let ts = dt.as_secs_f32();

        let update_start = std::time::Instant::now();
        if self.scene.settings.paused {
            self.scene.transform();
        } else {
            if !ctx.wants_keyboard_input() {
                for (index, controls) in Self::read_controls(ctx).into_iter().enumerate() {
                    self.scene.apply_controls(index, controls, ts);
                }
            }
            self.scene.update();
        }
        let update_duration = update_start.elapsed();

        // Make sure angles dont get too high
        for shape in &mut self.scene.shapes {
            shape.angle %= std::f32::consts::TAU;
            shape.angle += std::f32::consts::TAU;
            shape.angle %= std::f32::consts::TAU;
        }

        egui::TopBottomPanel::top("Top Panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                self.info_window_open |= ui.button("Info").clicked();
                self.settings_window_open |= ui.button("Settings").clicked();
                self.shapes_window_open |= ui.button("Shapes").clicked();
            });
        });

        egui::Window::new("Info")
            .open(&mut self.info_window_open)
            .show(ctx, |ui| {
                ui.label(format!("FPS: {:.3}", 1.0 / ts));
                ui.label(format!("Total Frame Time: {:.3}ms", ts * 1000.0));
                ui.label(format!(
                    "Update Time: {:.3}ms",
                    update_duration.as_secs_f32() * 1000.0
                ));
                ui.label(format!(
                    "Overlapping Pairs: {}",
                    self.scene.stats.overlapping_pairs
                ));
                ui.label(format!(
                    "Max Penetration Depth: {:.3}",
                    self.scene.stats.max_penetration_depth
                ));
                ui.allocate_space(ui.available_size());
            });

        let mut reset = false;
        egui::Window::new("Settings")
            .open(&mut self.settings_window_open)
            .show(ctx, |ui| {
                let settings = &mut self.scene.settings;
                let old_test = settings.overlap_test;
                egui::ComboBox::from_label("Overlap Test")
                    .selected_text(settings.overlap_test.name())
                    .show_ui(ui, |ui| {
                        for test in OverlapTest::ALL {
                            ui.selectable_value(&mut settings.overlap_test, test, test.name());
                        }
                    });
                if settings.overlap_test != old_test {
                    log::debug!(
                        "overlap test changed from {:?} to {:?}",
                        old_test,
                        settings.overlap_test
                    );
                }
                ui.horizontal(|ui| {
                    ui.label("Move Speed: ");
                    ui.add(
                        egui::DragValue::new(&mut settings.move_speed)
                            .speed(1.0)
                            .clamp_range(0.0..=f32::MAX),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("Rotation Speed: ");
                    ui.add(
                        egui::DragValue::new(&mut settings.rotation_speed)
                            .speed(0.1)
                            .clamp_range(0.0..=f32::MAX)
                            .suffix("rad/s"),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("Paused: ");
                    ui.checkbox(&mut settings.paused, "");
                });
                reset |= ui.button("Reset Scene").clicked();
                ui.allocate_space(ui.available_size());
            });
        if reset {
            self.reset_scene();
        }

        egui::Window::new("Shapes")
            .open(&mut self.shapes_window_open)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (i, shape) in self.scene.shapes.iter_mut().enumerate() {
                        egui::CollapsingHeader::new(format!("Shape {i}")).show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label("Position: ");
                                ui.add(
                                    egui::DragValue::new(&mut shape.position.x)
                                        .speed(0.5)
                                        .prefix("x: "),
                                );
                                ui.add(
                                    egui::DragValue::new(&mut shape.position.y)
                                        .speed(0.5)
                                        .prefix("y: "),
                                );
                            });
                            ui.horizontal(|ui| {
                                ui.label("Angle: ");
                                ui.drag_angle(&mut shape.angle);
                            });
                            ui.label(format!("Vertices: {}", shape.model.len()));
                        });
                    }
                    ui.allocate_space(ui.available_size());
                });
            });

        let egui::InnerResponse {
            inner: (rect, response),
            ..
        } = egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let size = ui.available_size();
                let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
                self.draw_scene(&ui.painter_at(rect), rect);
                (rect, response)
            });

        if response.dragged() {
            let movement = response.drag_delta() / self.camera.zoom;
            self.camera.position -= cgmath::vec2(movement.x, movement.y);
        }

        if response.hovered() {
            ctx.input(|i| {
                let old_zoom = self.camera.zoom;
                let new_zoom = if i.scroll_delta.y > 0.0 {
                    old_zoom / 0.9
                } else if i.scroll_delta.y < 0.0 {
                    old_zoom * 0.9
                } else {
                    return;
                };

                let Some(cursor_pos) = i.pointer.hover_pos() else {
                    return;
                };

                // Keep the world point under the cursor in place
                let anchor = self.camera.screen_to_world(rect, cursor_pos);
                self.camera.zoom = new_zoom;
                let moved = self.camera.screen_to_world(rect, cursor_pos);
                self.camera.position += anchor - moved;
            });
        }

        ctx.request_repaint();
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage.set_string(STORAGE_KEY, json);
                storage.flush();
            }
            Err(err) => log::error!("could not save state: {err}"),
        }
    }
}
