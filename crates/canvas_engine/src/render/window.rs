//! Window management using GLFW
//!
//! Provides window creation, an OpenGL 3.3 core context, event handling, and
//! ownership of the 2D canvas bound to the window's framebuffer.

use glfw::{Action, Context as _, Key, WindowEvent};
use thiserror::Error;

use crate::engine::{CanvasConfig, WindowConfig};
use crate::render::canvas::{Canvas, CanvasError};
use crate::render::font::Typeface;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// Window or GL context creation failed
    #[error("unable to create window or OpenGL context")]
    ContextCreationFailed,

    /// Canvas construction failed
    #[error("canvas error: {0}")]
    Canvas(#[from] CanvasError),
}

/// Convenience result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Event-driven window state: the closed flag and the cached drawable size
///
/// Kept separate from the native handles so event handling can be exercised
/// without a display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState {
    closed: bool,
    drawable_width: i32,
    drawable_height: i32,
}

impl WindowState {
    /// Create state for a window whose framebuffer measures
    /// `drawable_width` x `drawable_height` pixels
    pub fn new(drawable_width: i32, drawable_height: i32) -> Self {
        Self {
            closed: false,
            drawable_width: drawable_width.max(1),
            drawable_height: drawable_height.max(1),
        }
    }

    /// Whether a close was requested; monotonic, never reverts to false
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Cached drawable framebuffer size in pixels
    pub const fn drawable_size(&self) -> (i32, i32) {
        (self.drawable_width, self.drawable_height)
    }

    /// Apply one OS event
    ///
    /// A close request or an Escape key press marks the window closed. A
    /// framebuffer resize updates the cached drawable size. Mouse wheel,
    /// mouse button and cursor motion events are recognized but currently
    /// unused. Everything else is ignored.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Close => self.closed = true,
            WindowEvent::Key(Key::Escape, _, Action::Press, _) => self.closed = true,
            WindowEvent::FramebufferSize(width, height) => {
                // Minimized windows report a zero-sized framebuffer; keep
                // the last usable size.
                if *width > 0 && *height > 0 {
                    self.drawable_width = *width;
                    self.drawable_height = *height;
                }
            }
            WindowEvent::Scroll(..)
            | WindowEvent::MouseButton(..)
            | WindowEvent::CursorPos(..) => {}
            _ => {}
        }
    }
}

/// GLFW window wrapper owning the GL context and the 2D canvas
pub struct Window {
    state: WindowState,
    // Field order is drop order: the canvas deletes its GL objects first,
    // while the native window (and its context) is still alive, and the
    // subsystem handle outlives both.
    canvas: Canvas,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    glfw: glfw::Glfw,
}

impl Window {
    /// The canvas wants an 8-bit stencil plane on its target
    const STENCIL_BITS: u32 = 8;

    /// Create the window, its GL context, and the canvas
    ///
    /// Requests an OpenGL 3.3 core profile context with 8-bit RGBA channels,
    /// double buffering, no depth buffer and an 8-bit stencil buffer, makes
    /// it current, and binds a canvas to the resulting default framebuffer.
    pub fn new(
        glfw: &mut glfw::Glfw,
        window_config: &WindowConfig,
        canvas_config: &CanvasConfig,
    ) -> WindowResult<Self> {
        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(
            glfw::OpenGlProfileHint::Core,
        ));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::RedBits(Some(8)));
        glfw.window_hint(glfw::WindowHint::GreenBits(Some(8)));
        glfw.window_hint(glfw::WindowHint::BlueBits(Some(8)));
        glfw.window_hint(glfw::WindowHint::AlphaBits(Some(8)));
        glfw.window_hint(glfw::WindowHint::DepthBits(Some(0)));
        glfw.window_hint(glfw::WindowHint::StencilBits(Some(Self::STENCIL_BITS)));
        glfw.window_hint(glfw::WindowHint::DoubleBuffer(true));
        glfw.window_hint(glfw::WindowHint::Resizable(window_config.resizable));

        let (mut window, events) = glfw
            .create_window(
                window_config.width,
                window_config.height,
                &window_config.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or(WindowError::ContextCreationFailed)?;

        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_scroll_polling(true);
        window.set_mouse_button_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_framebuffer_size_polling(true);

        window.make_current();
        glfw.set_swap_interval(if window_config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        // The drawable size may exceed the requested logical size under
        // display scaling.
        let (drawable_width, drawable_height) = window.get_framebuffer_size();
        log::info!(
            "Window created: requested {}x{}, drawable {}x{}",
            window_config.width,
            window_config.height,
            drawable_width,
            drawable_height
        );

        let gl = unsafe {
            glow::Context::from_loader_function(|symbol| {
                window.get_proc_address(symbol) as *const _
            })
        };

        let typeface = Typeface::resolve(canvas_config)?;
        let canvas = Canvas::new(gl, drawable_width, drawable_height, typeface)?;

        Ok(Self {
            state: WindowState::new(drawable_width, drawable_height),
            canvas,
            window,
            events,
            glfw: glfw.clone(),
        })
    }

    /// Whether the window has been asked to close
    pub const fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Cached drawable framebuffer size in pixels
    pub const fn drawable_size(&self) -> (i32, i32) {
        self.state.drawable_size()
    }

    /// Pump the OS event queue and consume at most one buffered event
    pub fn poll_events(&mut self) {
        self.glfw.poll_events();
        if let Some((_, event)) = self.events.receive() {
            self.dispatch_event(&event);
        }
    }

    /// Apply a single event to the window state
    ///
    /// Used by `poll_events` for queued OS events; also lets tests and
    /// tooling inject synthesized events.
    pub fn dispatch_event(&mut self, event: &WindowEvent) {
        self.state.handle_event(event);

        let (width, height) = self.state.drawable_size();
        if (width, height) != self.canvas.target_size() {
            log::debug!("Drawable resized to {width}x{height}");
            self.canvas.resize(width, height);
        }
    }

    /// The window's drawing surface
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Mutable access to the window's drawing surface
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Present the back buffer to the screen
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        // The canvas field drops right after this body runs; its GL deletes
        // need the context current.
        self.window.make_current();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glfw::{Modifiers, MouseButton};

    fn escape_press() -> WindowEvent {
        WindowEvent::Key(Key::Escape, 0, Action::Press, Modifiers::empty())
    }

    #[test]
    fn test_new_state_is_open() {
        let state = WindowState::new(640, 480);

        assert!(!state.is_closed());
        assert_eq!(state.drawable_size(), (640, 480));
    }

    #[test]
    fn test_drawable_size_is_positive_for_any_requested_size() {
        for (w, h) in [(1, 1), (0, 0), (-5, 10), (640, 480), (3840, 2160)] {
            let state = WindowState::new(w, h);
            let (dw, dh) = state.drawable_size();
            assert!(dw > 0 && dh > 0, "({w}, {h}) produced ({dw}, {dh})");
        }
    }

    #[test]
    fn test_close_event_sets_closed() {
        let mut state = WindowState::new(640, 480);

        state.handle_event(&WindowEvent::Close);

        assert!(state.is_closed());
    }

    #[test]
    fn test_escape_press_sets_closed() {
        let mut state = WindowState::new(640, 480);

        state.handle_event(&escape_press());

        assert!(state.is_closed());
    }

    #[test]
    fn test_other_keys_leave_window_open() {
        let mut state = WindowState::new(640, 480);

        state.handle_event(&WindowEvent::Key(
            Key::A,
            0,
            Action::Press,
            Modifiers::empty(),
        ));
        state.handle_event(&WindowEvent::Key(
            Key::Space,
            0,
            Action::Press,
            Modifiers::empty(),
        ));

        assert!(!state.is_closed());
    }

    #[test]
    fn test_escape_release_leaves_window_open() {
        let mut state = WindowState::new(640, 480);

        state.handle_event(&WindowEvent::Key(
            Key::Escape,
            0,
            Action::Release,
            Modifiers::empty(),
        ));

        assert!(!state.is_closed());
    }

    #[test]
    fn test_mouse_and_focus_events_are_noops() {
        let mut state = WindowState::new(640, 480);

        state.handle_event(&WindowEvent::Scroll(0.0, 1.0));
        state.handle_event(&WindowEvent::MouseButton(
            MouseButton::Button1,
            Action::Press,
            Modifiers::empty(),
        ));
        state.handle_event(&WindowEvent::CursorPos(12.0, 34.0));
        state.handle_event(&WindowEvent::Focus(true));

        assert!(!state.is_closed());
        assert_eq!(state.drawable_size(), (640, 480));
    }

    #[test]
    fn test_closed_is_monotonic() {
        let mut state = WindowState::new(640, 480);

        state.handle_event(&WindowEvent::Close);
        assert!(state.is_closed());

        // No later event may reopen the window.
        state.handle_event(&WindowEvent::Focus(true));
        state.handle_event(&WindowEvent::Key(
            Key::A,
            0,
            Action::Press,
            Modifiers::empty(),
        ));
        state.handle_event(&WindowEvent::FramebufferSize(800, 600));
        state.handle_event(&escape_press());

        assert!(state.is_closed());
    }

    #[test]
    fn test_framebuffer_resize_updates_drawable_size() {
        let mut state = WindowState::new(640, 480);

        state.handle_event(&WindowEvent::FramebufferSize(1280, 960));

        assert_eq!(state.drawable_size(), (1280, 960));
    }

    #[test]
    fn test_zero_sized_resize_is_ignored() {
        let mut state = WindowState::new(640, 480);

        state.handle_event(&WindowEvent::FramebufferSize(0, 0));
        state.handle_event(&WindowEvent::FramebufferSize(-1, 600));

        assert_eq!(state.drawable_size(), (640, 480));
    }
}
