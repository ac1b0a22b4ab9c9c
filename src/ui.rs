use eframe::egui::{self, Rect, Vec2};

pub const THUMB_MIN: u32 = 96;
pub const THUMB_MAX: u32 = 384;
pub const THUMB_STEP: u32 = 16;
pub const THUMB_DEFAULT: u32 = 160;
pub const TILE_GAP: f32 = 8.0;

pub struct ImageMetrics {
    pub image_rect: Rect,
    pub image_size: Vec2,
    pub scale: f32,
}

impl ImageMetrics {
    pub fn new(canvas: Rect, image_size: Vec2) -> Self {
        let (display, scale) = fit_within(image_size, canvas.size());
        let offset = (canvas.size() - display) * 0.5;
        let image_rect = Rect::from_min_size(canvas.min + offset, display);
        Self {
            image_rect,
            image_size,
            scale,
        }
    }
}

/// Scales `image_size` to fit `available` while keeping its aspect ratio.
/// Small images are enlarged: there is no ceiling at 1.0.
pub fn fit_within(image_size: Vec2, available: Vec2) -> (Vec2, f32) {
    let safe_size = egui::vec2(image_size.x.max(1.0), image_size.y.max(1.0));
    let scale = (available.x / safe_size.x)
        .min(available.y / safe_size.y)
        .max(0.01);
    (safe_size * scale, scale)
}

/// Pixel dimensions of an image of `image_px` rendered to fit `viewport_px`.
pub fn fitted_pixels(image_px: (u32, u32), viewport_px: Vec2) -> (u32, u32) {
    let (display, _) = fit_within(
        egui::vec2(image_px.0 as f32, image_px.1 as f32),
        egui::vec2(viewport_px.x.max(1.0), viewport_px.y.max(1.0)),
    );
    ((display.x as u32).max(1), (display.y as u32).max(1))
}

pub fn snap_thumb_size(raw: f32) -> u32 {
    let steps = (raw / THUMB_STEP as f32).round().max(0.0) as u32;
    (steps * THUMB_STEP).clamp(THUMB_MIN, THUMB_MAX)
}

pub fn grid_columns(viewport_width: f32, tile: f32, gap: f32) -> usize {
    (((viewport_width - gap) / (tile + gap)).floor().max(1.0)) as usize
}

pub fn tile_row(index: usize, columns: usize) -> usize {
    index / columns.max(1)
}

/// Top-left of tile `index` relative to the grid content origin.
pub fn tile_origin(index: usize, columns: usize, tile: f32, gap: f32) -> egui::Pos2 {
    let columns = columns.max(1);
    let col = index % columns;
    let row = index / columns;
    egui::pos2(
        gap + col as f32 * (tile + gap),
        gap + row as f32 * (tile + gap),
    )
}

/// Total content height for `count` tiles.
pub fn grid_height(count: usize, columns: usize, tile: f32, gap: f32) -> f32 {
    let rows = count.div_ceil(columns.max(1));
    gap + rows as f32 * (tile + gap)
}

/// New scroll offset that brings `[top, bottom]` into the view, or `None`
/// when it is already fully visible.
pub fn reveal_offset(top: f32, bottom: f32, view_top: f32, view_height: f32) -> Option<f32> {
    if top < view_top {
        Some((top - TILE_GAP).max(0.0))
    } else if bottom > view_top + view_height {
        Some((bottom - view_height + TILE_GAP).max(0.0))
    } else {
        None
    }
}

pub struct KeyboardState {
    pub next_image: bool,
    pub prev_image: bool,
    pub row_up: bool,
    pub row_down: bool,
    pub delete: bool,
    pub undo: bool,
    pub go_to: bool,
    pub toggle_view: bool,
    pub thumb_larger: bool,
    pub thumb_smaller: bool,
    pub escape: bool,
}

impl KeyboardState {
    /// Reads this frame's shortcuts; Tab is consumed.
    pub fn read(ctx: &egui::Context) -> Self {
        ctx.input_mut(|input| Self {
            next_image: input.key_pressed(egui::Key::ArrowRight)
                || input.key_pressed(egui::Key::Enter)
                || input.key_pressed(egui::Key::Space),
            prev_image: input.key_pressed(egui::Key::ArrowLeft),
            row_up: input.key_pressed(egui::Key::ArrowUp),
            row_down: input.key_pressed(egui::Key::ArrowDown),
            delete: input.key_pressed(egui::Key::Delete),
            undo: (input.modifiers.command && input.key_pressed(egui::Key::Z))
                || input.key_pressed(egui::Key::U),
            go_to: input.key_pressed(egui::Key::G),
            toggle_view: input.consume_key(egui::Modifiers::NONE, egui::Key::Tab),
            thumb_larger: input.key_pressed(egui::Key::Plus) || input.key_pressed(egui::Key::Equals),
            thumb_smaller: input.key_pressed(egui::Key::Minus),
            escape: input.key_pressed(egui::Key::Escape),
        })
    }
}
