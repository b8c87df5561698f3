//! Application host: owns the windowing subsystem handle and the single window

use crate::application::{AppError, Application};
use crate::config::Config;
use crate::render::{Window, WindowError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main engine struct
///
/// The engine owns the windowing subsystem handle and at most one window,
/// and it runs the main loop. Teardown order is guaranteed: the window (and
/// with it the GL context and canvas) is released before the subsystem
/// terminates.
pub struct Engine {
    // Field order is teardown order: the window (and its GL context) must
    // go before the subsystem handle.
    /// The single window, created on demand
    window: Option<Window>,

    /// Windowing subsystem handle
    glfw: glfw::Glfw,

    /// Engine configuration
    config: EngineConfig,
}

impl Engine {
    /// Create a new engine instance
    ///
    /// Initializes the windowing subsystem (video output and timer). Fails
    /// fatally when the subsystem cannot start.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        log::info!("Initializing windowing subsystem...");

        let glfw = glfw::init(glfw::fail_on_errors).map_err(|e| {
            EngineError::InitializationFailed(format!("windowing subsystem: {e}"))
        })?;

        Ok(Self {
            window: None,
            glfw,
            config,
        })
    }

    /// Create the engine's window from its configuration
    ///
    /// # Panics
    ///
    /// Panics when called twice; the engine owns exactly one window.
    pub fn create_window(&mut self) -> Result<(), EngineError> {
        assert!(
            self.window.is_none(),
            "create_window called twice; the engine owns exactly one window"
        );

        let window = Window::new(&mut self.glfw, &self.config.window, &self.config.canvas)?;
        self.window = Some(window);
        Ok(())
    }

    /// Run the engine main loop with the given application
    ///
    /// Creates the window, initializes the application, then loops until the
    /// window reports closed: poll one pending event, let the application
    /// draw a frame on the canvas, present the frame. Cleanup and shutdown
    /// run on every exit path of the loop.
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;
        engine.create_window()?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");
        let result = engine.run_loop(app);

        app.cleanup(&mut engine);
        engine.shutdown();

        log::info!("Engine shutdown complete");
        result
    }

    /// One-event-per-iteration main loop
    fn run_loop<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        while let Some(window) = self.window.as_mut() {
            if window.is_closed() {
                break;
            }

            window.poll_events();

            app.frame(window.canvas_mut())
                .map_err(|e| EngineError::ApplicationError(format!("App frame: {e}")))?;

            window.swap_buffers();
        }

        Ok(())
    }

    /// Get the engine's window, if created
    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    /// Get mutable access to the engine's window, if created
    pub fn window_mut(&mut self) -> Option<&mut Window> {
        self.window.as_mut()
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Dispose the window; the subsystem terminates when the engine drops
    ///
    /// Safe to call more than once. The window must go before the subsystem,
    /// which the explicit `take` guarantees here and field ownership
    /// guarantees on the implicit drop path.
    pub fn shutdown(&mut self) {
        if let Some(window) = self.window.take() {
            drop(window);
            log::info!("Window disposed");
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Window configuration
    pub window: WindowConfig,

    /// Canvas configuration
    pub canvas: CanvasConfig,
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Requested window width (logical units; the drawable framebuffer may
    /// be larger under display scaling)
    pub width: u32,

    /// Requested window height
    pub height: u32,

    /// Whether window is resizable
    pub resizable: bool,

    /// VSync setting
    pub vsync: bool,
}

/// Canvas configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Path to a TTF/OTF font file; when unset, common system font
    /// locations are probed
    pub font_path: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig {
                title: "Canvas Engine Application".to_string(),
                width: 640,
                height: 480,
                resizable: true,
                vsync: true,
            },
            canvas: CanvasConfig::default(),
        }
    }
}

impl Config for EngineConfig {}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Window or GL context error
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 480);
        assert!(config.window.resizable);
        assert!(config.window.vsync);
        assert!(config.canvas.font_path.is_none());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let mut config = EngineConfig::default();
        config.window.title = "Round Trip".to_string();
        config.window.width = 800;
        config.canvas.font_path = Some("fonts/test.ttf".to_string());

        let toml = toml::to_string_pretty(&config).expect("serialize");
        let parsed: EngineConfig = toml::from_str(&toml).expect("parse");

        assert_eq!(parsed.window.title, "Round Trip");
        assert_eq!(parsed.window.width, 800);
        assert_eq!(parsed.window.height, config.window.height);
        assert_eq!(parsed.canvas.font_path.as_deref(), Some("fonts/test.ttf"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = EngineConfig::load_or_default("does_not_exist.toml");
        assert_eq!(config.window.width, 640);
    }
}
