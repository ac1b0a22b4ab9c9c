use eframe::egui;
use piccull::app::viewer::{Viewer, RESIZE_DEBOUNCE};
use std::fs;
use std::time::Instant;
use tempfile::tempdir;

mod common;
use common::{solid_image, write_image};

#[test]
fn first_viewport_renders_immediately_fitted() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("wide.png");
    write_image(&path, &solid_image(200, 100, [0, 128, 255, 255]));
    let ctx = egui::Context::default();
    let mut viewer = Viewer::new();
    viewer.load(Some(path.as_path()));
    assert_eq!(viewer.image_size(), Some((200, 100)));

    assert!(viewer.on_viewport(&ctx, egui::vec2(100.0, 100.0), Instant::now()));
    assert_eq!(viewer.texture_size(), Some([100, 50]));
}

#[test]
fn small_images_are_enlarged_to_viewport() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("tiny.png");
    write_image(&path, &solid_image(10, 20, [0, 0, 0, 255]));
    let ctx = egui::Context::default();
    let mut viewer = Viewer::new();
    viewer.load(Some(path.as_path()));
    viewer.render(&ctx, egui::vec2(400.0, 400.0));
    assert_eq!(viewer.texture_size(), Some([200, 400]));
}

#[test]
fn viewport_changes_are_debounced() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("square.png");
    write_image(&path, &solid_image(64, 64, [9, 9, 9, 255]));
    let ctx = egui::Context::default();
    let mut viewer = Viewer::new();
    viewer.load(Some(path.as_path()));

    let start = Instant::now();
    viewer.on_viewport(&ctx, egui::vec2(100.0, 100.0), start);
    assert!(!viewer.on_viewport(&ctx, egui::vec2(120.0, 120.0), start));
    assert!(!viewer.on_viewport(&ctx, egui::vec2(140.0, 140.0), start + RESIZE_DEBOUNCE / 2));
    assert!(viewer.resize_pending());
    assert_eq!(viewer.texture_size(), Some([100, 100]));

    // The second change restarted the quiet period.
    assert!(!viewer.on_viewport(&ctx, egui::vec2(140.0, 140.0), start + RESIZE_DEBOUNCE));
    let later = start + RESIZE_DEBOUNCE / 2 + RESIZE_DEBOUNCE;
    assert!(viewer.on_viewport(&ctx, egui::vec2(140.0, 140.0), later));
    assert_eq!(viewer.texture_size(), Some([140, 140]));
    assert!(!viewer.resize_pending());
}

#[test]
fn returning_to_rendered_size_drops_pending_resize() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("square.png");
    write_image(&path, &solid_image(64, 64, [9, 9, 9, 255]));
    let ctx = egui::Context::default();
    let mut viewer = Viewer::new();
    viewer.load(Some(path.as_path()));

    let start = Instant::now();
    viewer.on_viewport(&ctx, egui::vec2(100.0, 100.0), start);
    assert!(!viewer.on_viewport(&ctx, egui::vec2(130.0, 130.0), start));
    assert!(viewer.resize_pending());

    assert!(!viewer.on_viewport(&ctx, egui::vec2(100.0, 100.0), start + RESIZE_DEBOUNCE / 2));
    assert!(!viewer.resize_pending());
    assert!(!viewer.on_viewport(&ctx, egui::vec2(100.0, 100.0), start + RESIZE_DEBOUNCE * 2));
    assert_eq!(viewer.texture_size(), Some([100, 100]));
}

#[test]
fn decode_failure_becomes_inline_error() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("broken.png");
    fs::write(&path, b"not a png").unwrap();
    let ctx = egui::Context::default();
    let mut viewer = Viewer::new();
    viewer.load(Some(path.as_path()));

    let message = viewer.error().unwrap();
    assert!(message.starts_with("Error loading broken.png"));
    assert!(!viewer.on_viewport(&ctx, egui::vec2(100.0, 100.0), Instant::now()));
    assert_eq!(viewer.texture_size(), None);
}

#[test]
fn load_switches_and_invalidate_forces_reload() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a.png");
    let b = tmp.path().join("b.png");
    write_image(&a, &solid_image(30, 10, [1, 1, 1, 255]));
    write_image(&b, &solid_image(10, 30, [2, 2, 2, 255]));
    let mut viewer = Viewer::new();

    viewer.load(Some(a.as_path()));
    assert_eq!(viewer.image_size(), Some((30, 10)));
    viewer.load(Some(b.as_path()));
    assert_eq!(viewer.path(), Some(b.as_path()));
    assert_eq!(viewer.image_size(), Some((10, 30)));

    write_image(&b, &solid_image(12, 12, [3, 3, 3, 255]));
    viewer.load(Some(b.as_path()));
    assert_eq!(viewer.image_size(), Some((10, 30)));
    viewer.invalidate();
    viewer.load(Some(b.as_path()));
    assert_eq!(viewer.image_size(), Some((12, 12)));

    viewer.load(None);
    assert_eq!(viewer.image_size(), None);
    assert!(viewer.error().is_none());
}
