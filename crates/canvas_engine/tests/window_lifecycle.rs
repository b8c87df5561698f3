//! End-to-end window lifecycle scenarios
//!
//! These tests construct a real window and GL context, so they are ignored
//! by default; run them with `cargo test -- --ignored` on a machine with a
//! display.

use canvas_engine::prelude::*;
use glfw::WindowEvent;

fn test_config(title: &str) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.window.title = title.to_string();
    config.window.width = 640;
    config.window.height = 480;
    config.window.vsync = false;
    config
}

#[test]
#[ignore = "requires a display and a GPU"]
fn window_creation_reports_positive_drawable_size() {
    let mut engine = Engine::new(test_config("lifecycle: creation")).expect("subsystem init");
    engine.create_window().expect("window creation");

    let window = engine.window().expect("window exists");
    let (width, height) = window.drawable_size();

    assert!(width > 0);
    assert!(height > 0);
    assert!(!window.is_closed());

    engine.shutdown();
}

#[test]
#[ignore = "requires a display and a GPU"]
fn quit_event_terminates_the_loop() {
    let mut engine = Engine::new(test_config("lifecycle: quit")).expect("subsystem init");
    engine.create_window().expect("window creation");

    let window = engine.window_mut().expect("window exists");
    window.dispatch_event(&WindowEvent::Close);
    assert!(window.is_closed());

    // One loop iteration worth of polling must not reopen the window.
    window.poll_events();
    assert!(window.is_closed());

    engine.shutdown();
    assert!(engine.window().is_none());
}

#[test]
#[ignore = "requires a display and a GPU"]
fn escape_key_terminates_the_loop() {
    let mut engine = Engine::new(test_config("lifecycle: escape")).expect("subsystem init");
    engine.create_window().expect("window creation");

    let window = engine.window_mut().expect("window exists");
    window.dispatch_event(&WindowEvent::Key(
        glfw::Key::Escape,
        0,
        glfw::Action::Press,
        glfw::Modifiers::empty(),
    ));

    assert!(window.is_closed());
    engine.shutdown();
}

#[test]
#[ignore = "requires a display and a GPU"]
fn one_frame_renders_and_presents() {
    let mut engine = Engine::new(test_config("lifecycle: frame")).expect("subsystem init");
    engine.create_window().expect("window creation");

    let window = engine.window_mut().expect("window exists");
    window.poll_events();

    let (width, height) = window.drawable_size();
    let canvas = window.canvas_mut();
    canvas.clear(Color::ALICE_BLUE);

    let paint = Paint::default()
        .with_color(Color::BLACK)
        .with_anti_alias(true)
        .with_align(TextAlign::Center)
        .with_text_size(24.0);
    canvas
        .draw_text(
            "Hello World!",
            width as f32 / 2.0,
            height as f32 / 2.0 + 12.0,
            &paint,
        )
        .expect("text draw");
    canvas.flush();

    window.swap_buffers();
    engine.shutdown();
}
