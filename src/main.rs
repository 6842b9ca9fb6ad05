use collision::App;
use eframe::wgpu;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    log::info!("starting collision sandbox");

    eframe::run_native(
        "Collision",
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            initial_window_size: Some(eframe::egui::vec2(512.0, 480.0)),
            wgpu_options: eframe::egui_wgpu::WgpuConfiguration {
                power_preference: wgpu::PowerPreference::LowPower,
                ..Default::default()
            },
            ..Default::default()
        },
        Box::new(|cc| Box::new(App::new(cc))),
    )
}
