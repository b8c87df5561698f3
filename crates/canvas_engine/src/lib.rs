//! # Canvas Engine
//!
//! A small 2D canvas engine: it opens a resizable GLFW window, binds an
//! OpenGL-backed drawing surface to the window's framebuffer, and runs a
//! single-threaded event/draw/present loop.
//!
//! ## Features
//!
//! - **GLFW Windowing**: one window, one OpenGL 3.3 core context
//! - **2D Canvas**: clear, anti-aliased text drawing, flush
//! - **Glyph Atlas**: `ab_glyph` rasterization cached in a texture page
//! - **Deterministic Teardown**: GL objects released before the context dies
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canvas_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn frame(&mut self, canvas: &mut Canvas) -> Result<(), AppError> {
//!         canvas.clear(Color::WHITE);
//!         canvas.flush();
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod render;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{CanvasConfig, Engine, EngineConfig, EngineError, WindowConfig};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        render::{
            Canvas, CanvasError, Color, Paint, PaintStyle, TextAlign, Typeface, Window,
            WindowError, WindowState,
        },
        AppError, Application, CanvasConfig, Engine, EngineConfig, EngineError, WindowConfig,
    };
}
