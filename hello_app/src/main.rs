//! Hello World demo application
//!
//! Opens a resizable 640x480 window and draws "Hello World!" centered on an
//! alice-blue background once per frame, until the window is closed or
//! Escape is pressed.

use canvas_engine::prelude::*;

const CONFIG_PATH: &str = "hello_app.toml";

struct HelloApp;

impl Application for HelloApp {
    fn frame(&mut self, canvas: &mut Canvas) -> Result<(), AppError> {
        canvas.clear(Color::ALICE_BLUE);

        let paint = Paint::default()
            .with_color(Color::BLACK)
            .with_anti_alias(true)
            .with_style(PaintStyle::Fill)
            .with_align(TextAlign::Center)
            .with_text_size(24.0);

        // Centered horizontally, baseline 12px below the vertical center.
        let x = canvas.width() as f32 / 2.0;
        let y = canvas.height() as f32 / 2.0 + 12.0;
        canvas.draw_text("Hello World!", x, y, &paint)?;
        canvas.flush();

        Ok(())
    }
}

fn demo_config() -> EngineConfig {
    let mut config = EngineConfig::load_or_default(CONFIG_PATH);
    if !std::path::Path::new(CONFIG_PATH).exists() {
        config.window.title = "Hello World".to_string();
        config.window.width = 640;
        config.window.height = 480;
    }
    config
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting Hello World demo");

    let mut app = HelloApp;
    Engine::run(demo_config(), &mut app)?;

    log::info!("Hello World demo finished");
    Ok(())
}
