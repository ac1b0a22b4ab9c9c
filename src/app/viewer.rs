use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Result;
use eframe::egui::{self, Color32, Rect, Vec2};
use image::DynamicImage;
use tracing::warn;

use crate::{
    image_utils::{decode_image, resize_exact, to_color_image},
    ui::{fitted_pixels, ImageMetrics},
};

use super::deferred::Deferred;

pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(80);
const NAV_ZONE_FRACTION: f32 = 0.12;
const MUTED: Color32 = Color32::from_gray(136);
const ERROR_RED: Color32 = Color32::from_rgb(255, 85, 85);

enum Content {
    Empty,
    Decoded(DynamicImage),
    Failed(String),
}

#[derive(Default)]
pub struct ViewerAction {
    pub prev: bool,
    pub next: bool,
}

/// Shows one image fitted to the available space.
pub struct Viewer {
    path: Option<PathBuf>,
    content: Content,
    texture: Option<egui::TextureHandle>,
    rendered_for: Option<Vec2>,
    pending_viewport: Option<Vec2>,
    resize: Deferred,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            path: None,
            content: Content::Empty,
            texture: None,
            rendered_for: None,
            pending_viewport: None,
            resize: Deferred::new(RESIZE_DEBOUNCE),
        }
    }

    /// Decodes `path` unless it is already the displayed image.
    pub fn load(&mut self, path: Option<&Path>) {
        if self.path.as_deref() == path && !matches!(self.content, Content::Empty) {
            return;
        }
        self.texture = None;
        self.rendered_for = None;
        self.pending_viewport = None;
        self.resize.cancel();
        self.path = path.map(Path::to_path_buf);
        self.content = match path {
            None => Content::Empty,
            Some(path) => match decode_image(path) {
                Ok(image) => Content::Decoded(image),
                Err(err) => {
                    warn!("viewer: {err:#}");
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    Content::Failed(format!("Error loading {name}: {err:#}"))
                }
            },
        };
    }

    /// Forces the next [`Viewer::load`] to decode again.
    pub fn invalidate(&mut self) {
        self.path = None;
        self.content = Content::Empty;
        self.texture = None;
        self.rendered_for = None;
        self.pending_viewport = None;
        self.resize.cancel();
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.content {
            Content::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        match &self.content {
            Content::Decoded(image) => Some((image.width(), image.height())),
            _ => None,
        }
    }

    pub fn texture_size(&self) -> Option<[usize; 2]> {
        self.texture.as_ref().map(|t| t.size())
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Renders immediately after a load and debounces later viewport changes.
    /// Returns whether a new bitmap was produced.
    pub fn on_viewport(&mut self, ctx: &egui::Context, viewport_px: Vec2, now: Instant) -> bool {
        if !matches!(self.content, Content::Decoded(_)) {
            return false;
        }
        if self.texture.is_none() {
            self.render(ctx, viewport_px);
            return true;
        }
        if self.rendered_for == Some(viewport_px) {
            self.pending_viewport = None;
            self.resize.cancel();
            return false;
        }
        if self.pending_viewport != Some(viewport_px) {
            self.pending_viewport = Some(viewport_px);
            self.resize.schedule(now);
        }
        if self.resize.fire(now) {
            if let Some(viewport) = self.pending_viewport.take() {
                self.render(ctx, viewport);
                return true;
            }
        }
        false
    }

    pub fn render(&mut self, ctx: &egui::Context, viewport_px: Vec2) {
        let Content::Decoded(image) = &self.content else {
            return;
        };
        match render_fitted(image, viewport_px) {
            Ok(color_image) => {
                if let Some(texture) = self.texture.as_mut() {
                    texture.set(color_image, egui::TextureOptions::LINEAR);
                } else {
                    self.texture = Some(ctx.load_texture(
                        "piccull-viewer",
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
                self.rendered_for = Some(viewport_px);
            }
            Err(err) => {
                warn!("viewer resize failed: {err:#}");
                self.texture = None;
                self.content = Content::Failed(format!("Error rendering image: {err:#}"));
            }
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        current: Option<&Path>,
        has_prev: bool,
        has_next: bool,
    ) -> ViewerAction {
        let mut action = ViewerAction::default();
        self.load(current);

        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

        let ctx = ui.ctx().clone();
        let now = Instant::now();
        self.on_viewport(&ctx, rect.size() * ctx.pixels_per_point(), now);
        if let Some(remaining) = self.resize.remaining(now) {
            ctx.request_repaint_after(remaining);
        }

        match &self.content {
            Content::Empty => {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No image",
                    egui::FontId::monospace(14.0),
                    MUTED,
                );
            }
            Content::Failed(msg) => {
                painter.text(
                    rect.left_top() + egui::vec2(20.0, 20.0),
                    egui::Align2::LEFT_TOP,
                    msg,
                    egui::FontId::monospace(13.0),
                    ERROR_RED,
                );
            }
            Content::Decoded(_) => {
                if let Some(texture) = &self.texture {
                    let metrics = ImageMetrics::new(rect, texture.size_vec2());
                    painter.image(
                        texture.id(),
                        metrics.image_rect,
                        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
            }
        }

        let zone_width = rect.width() * NAV_ZONE_FRACTION;
        if has_prev {
            let zone = Rect::from_min_size(rect.min, egui::vec2(zone_width, rect.height()));
            action.prev = nav_zone(ui, &painter, zone, "nav_prev", "‹");
        }
        if has_next {
            let zone = Rect::from_min_size(
                egui::pos2(rect.max.x - zone_width, rect.min.y),
                egui::vec2(zone_width, rect.height()),
            );
            action.next = nav_zone(ui, &painter, zone, "nav_next", "›");
        }
        action
    }
}

fn nav_zone(ui: &egui::Ui, painter: &egui::Painter, zone: Rect, id: &str, glyph: &str) -> bool {
    let response = ui.interact(zone, ui.id().with(id), egui::Sense::click());
    let alpha = if response.hovered() { 48 } else { 0 };
    painter.rect_filled(zone, 0.0, Color32::from_white_alpha(alpha));
    painter.text(
        zone.center(),
        egui::Align2::CENTER_CENTER,
        glyph,
        egui::FontId::proportional(40.0),
        if response.hovered() { Color32::WHITE } else { MUTED },
    );
    response.clicked()
}

fn render_fitted(image: &DynamicImage, viewport_px: Vec2) -> Result<egui::ColorImage> {
    let (width, height) = fitted_pixels((image.width(), image.height()), viewport_px);
    let resized = resize_exact(image, width, height)?;
    Ok(to_color_image(&resized))
}
