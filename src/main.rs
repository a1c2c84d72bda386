//! Scooter configurator
//!
//! One scooter model, floating in front of a fixed camera. Hover a part to
//! see its name and color under the cursor, click it to select, recolor it
//! from the panel, drag empty space to spin the model around.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod assembly;
mod config;
mod cursor;
mod model;
mod picker;
mod rasterizer;
mod store;
mod ui;
mod viewport;

use app::ConfiguratorApp;
use assembly::PartTable;
use config::{ConfigSource, ConfiguratorConfig};
use cursor::OverlayCursor;
use macroquad::prelude::*;
use model::{load_model, GeometryLibrary};
use std::sync::OnceLock;
use ui::{MouseState, Rect};

/// Read once: the window settings are needed before `main` runs
static STARTUP_CONFIG: OnceLock<(ConfiguratorConfig, ConfigSource)> = OnceLock::new();

fn startup_config() -> &'static (ConfiguratorConfig, ConfigSource) {
    STARTUP_CONFIG.get_or_init(ConfiguratorConfig::load)
}

fn window_conf() -> Conf {
    startup_config().0.window_conf()
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Scooter configurator v{}", VERSION);
    let (config, source) = startup_config();
    source.log();

    // The built-in table is the last resort; nothing to show without it
    let table = match PartTable::load_or_embedded(config.parts_path().as_deref()) {
        Ok(table) => table,
        Err(e) => {
            log::error!("No usable part table: {}", e);
            return;
        }
    };

    let library = match load_model(&config.assets.model).await {
        Ok(asset) => {
            log::info!("Loaded model {}", config.assets.model);
            GeometryLibrary::new(asset)
        }
        Err(e) => {
            log::warn!("Model unavailable ({}), using placeholder shapes", e);
            GeometryLibrary::procedural()
        }
    };

    let mut app = ConfiguratorApp::new(config, &table, library, OverlayCursor::new());
    show_mouse(false);

    loop {
        let screen = Rect::screen(screen_width(), screen_height());
        let mouse = MouseState::poll();

        app.handle_input(mouse, &screen);
        app.update(get_time() as f32);

        clear_background(BLACK);
        app.draw(&screen);
        app.cursor().draw(mouse.x, mouse.y);

        next_frame().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_config_is_read_once() {
        let (config, _) = startup_config();
        assert!(std::ptr::eq(startup_config(), startup_config()));
        assert_eq!(window_conf().window_title, config.window.title);
    }
}
