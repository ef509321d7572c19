use wlmenu::app::MenuViewerApp;
use wlmenu::config::{config_file_path, load_menu_config_or_default};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = config_file_path();
    let (config, initial_status) = load_menu_config_or_default(config_path.as_deref());

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Window/Level Menu Viewer",
        native_options,
        Box::new(move |_cc| Ok(Box::new(MenuViewerApp::new(config, initial_status)))),
    )
}
