//! Application trait and lifecycle management

use crate::engine::{Engine, EngineError};
use crate::render::{Canvas, CanvasError};
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to create an application using the engine.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine has created its window. Use this to set
    /// up any state the frame callback needs.
    fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        Ok(())
    }

    /// Draw one frame
    ///
    /// Called every loop iteration after event polling. Issue clear/draw
    /// commands against the canvas here; the engine presents the frame
    /// afterwards.
    fn frame(&mut self, canvas: &mut Canvas) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called when the main loop has exited, before the engine tears the
    /// window down.
    fn cleanup(&mut self, _engine: &mut Engine) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Canvas error raised while drawing a frame
    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
