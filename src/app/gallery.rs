use std::{
    collections::BTreeMap,
    ops::Range,
    path::PathBuf,
    time::{Duration, Instant},
};

use eframe::egui::{self, Color32, Rect};
use tracing::debug;

use crate::{
    thumbnails::ThumbnailCache,
    ui::{
        fit_within, grid_columns, grid_height, reveal_offset, snap_thumb_size, tile_origin,
        THUMB_DEFAULT, TILE_GAP,
    },
};

use super::deferred::Deferred;

pub const BATCH_SIZE: usize = 5;
pub const LOAD_MORE_DEBOUNCE: Duration = Duration::from_millis(30);

/// Tile state for one collection index. Indices without an entry are
/// placeholders.
pub enum TileState {
    Loading,
    Realized(egui::TextureHandle),
}

#[derive(Default)]
pub struct GalleryAction {
    pub select: Option<usize>,
    pub open: Option<usize>,
}

/// Scrollable thumbnail grid that realizes tiles in batches as they come
/// into view.
pub struct Gallery {
    thumb_size: u32,
    len: usize,
    tiles: BTreeMap<usize, TileState>,
    next_to_load: usize,
    columns: usize,
    selected: Option<usize>,
    reveal: Option<usize>,
    viewport: Option<Rect>,
    load_more: Deferred,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

impl Gallery {
    pub fn new() -> Self {
        Self {
            thumb_size: THUMB_DEFAULT,
            len: 0,
            tiles: BTreeMap::new(),
            next_to_load: 0,
            columns: 1,
            selected: None,
            reveal: None,
            viewport: None,
            load_more: Deferred::new(LOAD_MORE_DEBOUNCE),
        }
    }

    pub fn thumb_size(&self) -> u32 {
        self.thumb_size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn tile(&self, index: usize) -> Option<&TileState> {
        self.tiles.get(&index)
    }

    pub fn realized_count(&self) -> usize {
        self.tiles
            .values()
            .filter(|t| matches!(t, TileState::Realized(_)))
            .count()
    }

    /// Recomputes the column count for `viewport_width`. Tile indices are
    /// unaffected.
    pub fn relayout(&mut self, viewport_width: f32) -> usize {
        self.columns = grid_columns(viewport_width, self.thumb_size as f32, TILE_GAP);
        self.columns
    }

    /// Indices of the tiles intersecting the vertical band
    /// `[view_top, view_top + view_height]`.
    pub fn visible_range(&self, view_top: f32, view_height: f32) -> Range<usize> {
        let pitch = self.thumb_size as f32 + TILE_GAP;
        let first_row = ((view_top - TILE_GAP) / pitch).floor().max(0.0) as usize;
        let last_row = ((view_top + view_height) / pitch).floor().max(0.0) as usize;
        let start = (first_row * self.columns).min(self.len);
        let end = ((last_row + 1) * self.columns).min(self.len);
        start..end
    }

    /// Drops every tile and starts over with the first batch.
    pub fn rebuild(&mut self, len: usize, selected: Option<usize>) {
        debug!("gallery rebuild: {len} tiles at {}px", self.thumb_size);
        self.len = len;
        self.tiles.clear();
        self.next_to_load = 0;
        self.load_more.cancel();
        self.selected = selected;
        self.begin_batch();
        if let Some(index) = selected {
            self.ensure_visible(index);
        }
    }

    /// Snaps `raw` to the allowed sizes; a changed size rebuilds the tiles.
    pub fn set_thumb_size(&mut self, raw: f32) -> bool {
        let size = snap_thumb_size(raw);
        if size == self.thumb_size {
            return false;
        }
        self.thumb_size = size;
        self.rebuild(self.len, self.selected);
        true
    }

    /// Moves the highlight without touching tile state.
    pub fn set_selected(&mut self, selected: Option<usize>) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        if let Some(index) = selected {
            self.ensure_visible(index);
        }
    }

    /// Marks the next batch of placeholders as loading.
    pub fn begin_batch(&mut self) -> Range<usize> {
        let start = self.next_to_load;
        let end = (start + BATCH_SIZE).min(self.len);
        for index in start..end {
            self.tiles.insert(index, TileState::Loading);
        }
        self.next_to_load = end;
        start..end
    }

    /// Loads batches until `index` is at least loading, and scrolls to it.
    pub fn ensure_visible(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        while self.next_to_load <= index {
            self.begin_batch();
        }
        self.reveal = Some(index);
    }

    pub fn has_loading(&self) -> bool {
        self.tiles.values().any(|t| matches!(t, TileState::Loading))
    }

    /// Turns up to [`BATCH_SIZE`] loading tiles, lowest index first, into
    /// realized textures from `cache`. The rest stay loading for later frames.
    pub fn realize_loading(
        &mut self,
        ctx: &egui::Context,
        cache: &mut ThumbnailCache,
        images: &[PathBuf],
    ) -> usize {
        let loading: Vec<usize> = self
            .tiles
            .iter()
            .filter(|(_, t)| matches!(t, TileState::Loading))
            .map(|(idx, _)| *idx)
            .take(BATCH_SIZE)
            .collect();
        let mut realized = 0;
        for index in loading {
            let Some(path) = images.get(index) else {
                self.tiles.remove(&index);
                continue;
            };
            let color_image = cache.get(path, self.thumb_size).clone();
            let texture = ctx.load_texture(
                format!("piccull-thumb-{index}"),
                color_image,
                egui::TextureOptions::LINEAR,
            );
            self.tiles.insert(index, TileState::Realized(texture));
            realized += 1;
        }
        realized
    }

    /// Schedules the next batch when the visible bottom edge is within half a
    /// viewport of the loaded rows.
    pub fn check_scroll(&mut self, view_top: f32, view_height: f32, now: Instant) {
        if self.next_to_load >= self.len || self.has_loading() {
            return;
        }
        let loaded_bottom = grid_height(
            self.next_to_load,
            self.columns,
            self.thumb_size as f32,
            TILE_GAP,
        );
        if view_top + view_height * 1.5 >= loaded_bottom {
            if !self.load_more.is_pending() {
                self.load_more.schedule(now);
            }
        }
    }

    /// Starts a batch once the debounced "load more" request is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.load_more.fire(now) {
            return !self.begin_batch().is_empty();
        }
        false
    }

    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.load_more.remaining(now)
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        cache: &mut ThumbnailCache,
        images: &[PathBuf],
    ) -> GalleryAction {
        let mut action = GalleryAction::default();
        let ctx = ui.ctx().clone();
        let now = Instant::now();

        // Tiles marked loading before this frame are drawn as spinners once,
        // then decoded at the end of it.
        let realize_now = self.has_loading();

        let tile = self.thumb_size as f32;
        self.relayout(ui.available_width());

        let mut scroll = egui::ScrollArea::vertical()
            .id_salt("piccull-gallery")
            .auto_shrink([false, false]);
        if let (Some(index), Some(view)) = (self.reveal, self.viewport) {
            let top = tile_origin(index, self.columns, tile, TILE_GAP).y;
            if let Some(offset) = reveal_offset(top, top + tile, view.min.y, view.height()) {
                scroll = scroll.vertical_scroll_offset(offset);
            }
            self.reveal = None;
        }

        scroll.show_viewport(ui, |ui, viewport| {
            self.viewport = Some(viewport);
            let height = grid_height(self.len, self.columns, tile, TILE_GAP);
            let (content, _) = ui.allocate_exact_size(
                egui::vec2(ui.available_width(), height),
                egui::Sense::hover(),
            );
            let painter = ui.painter().clone();
            for index in self.visible_range(viewport.min.y, viewport.height()) {
                let origin = tile_origin(index, self.columns, tile, TILE_GAP);
                let local = Rect::from_min_size(origin, egui::vec2(tile, tile));
                let rect = local.translate(content.min.to_vec2());
                let response = ui.interact(rect, ui.id().with(("tile", index)), egui::Sense::click());
                painter.rect_filled(rect, 4.0, ui.visuals().faint_bg_color);
                match self.tiles.get(&index) {
                    Some(TileState::Realized(texture)) => {
                        let size = texture.size_vec2();
                        let (display, _) = fit_within(size, rect.size());
                        let image_rect = Rect::from_center_size(rect.center(), display);
                        painter.image(
                            texture.id(),
                            image_rect,
                            Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                            Color32::WHITE,
                        );
                    }
                    Some(TileState::Loading) => {
                        let spinner = Rect::from_center_size(rect.center(), egui::vec2(24.0, 24.0));
                        ui.put(spinner, egui::Spinner::new());
                    }
                    None => {}
                }
                if self.selected == Some(index) {
                    painter.rect_stroke(
                        rect,
                        4.0,
                        (3.0, ui.visuals().selection.stroke.color),
                        egui::StrokeKind::Inside,
                    );
                }
                if response.double_clicked() {
                    action.open = Some(index);
                } else if response.clicked() {
                    action.select = Some(index);
                }
            }
            self.check_scroll(viewport.min.y, viewport.height(), now);
        });

        if realize_now {
            self.realize_loading(&ctx, cache, images);
        }
        self.poll(now);
        if self.has_loading() {
            ctx.request_repaint();
        }
        if let Some(remaining) = self.next_deadline(now) {
            ctx.request_repaint_after(remaining);
        }
        action
    }
}
