//! 2D rendering: window management, the OpenGL-backed canvas, paints, text

pub mod atlas;
pub mod canvas;
pub mod font;
pub mod paint;
pub mod window;

pub use canvas::{Canvas, CanvasError, FramebufferInfo};
pub use font::Typeface;
pub use paint::{Color, Paint, PaintStyle, TextAlign};
pub use window::{Window, WindowError, WindowState};
