pub mod deferred;
pub mod gallery;
pub mod viewer;

use std::path::Path;

use eframe::{
    egui::{self, Color32, ViewportCommand},
    App, Frame,
};
use tracing::{info, warn};

use crate::{
    collection::Direction,
    session::Session,
    ui::{KeyboardState, THUMB_MAX, THUMB_MIN, THUMB_STEP},
};

use self::{gallery::Gallery, viewer::Viewer};

const ERROR_RED: Color32 = Color32::from_rgb(255, 85, 85);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Single,
    Grid,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    OpenFolder,
    Navigate(Direction),
    RowUp,
    RowDown,
    Select(usize),
    OpenInViewer(usize),
    Delete,
    Undo,
    GoTo,
    ToggleView,
    ThumbSize(f32),
}

#[derive(Default)]
pub struct JumpPrompt {
    pub input: String,
    pub invalid: Option<String>,
    focused: bool,
}

pub struct PicCullApp {
    pub session: Session,
    pub viewer: Viewer,
    pub gallery: Gallery,
    pub mode: ViewMode,
    pub status_extra: Option<String>,
    pub jump: Option<JumpPrompt>,
    pub error: Option<String>,
}

impl Default for PicCullApp {
    fn default() -> Self {
        Self {
            session: Session::new(),
            viewer: Viewer::new(),
            gallery: Gallery::new(),
            mode: ViewMode::Single,
            status_extra: None,
            jump: None,
            error: None,
        }
    }
}

impl PicCullApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self::default()
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::OpenFolder => self.choose_folder(),
            Command::Navigate(direction) => {
                if self.session.collection.advance(direction) {
                    self.selection_changed();
                }
            }
            Command::RowUp => self.step(-(self.gallery.columns() as isize)),
            Command::RowDown => self.step(self.gallery.columns() as isize),
            Command::Select(index) => {
                if self.session.collection.set_index(index) {
                    self.selection_changed();
                }
            }
            Command::OpenInViewer(index) => {
                self.session.collection.set_index(index);
                self.selection_changed();
                self.mode = ViewMode::Single;
            }
            Command::Delete => self.delete_current(),
            Command::Undo => self.undo(),
            Command::GoTo => {
                if !self.session.collection.is_empty() {
                    self.jump = Some(JumpPrompt::default());
                }
            }
            Command::ToggleView => self.toggle_mode(),
            Command::ThumbSize(raw) => {
                self.gallery.set_thumb_size(raw);
            }
        }
    }

    fn choose_folder(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Select image folder")
            .pick_folder();
        if let Some(folder) = picked {
            self.open_path(&folder);
        }
    }

    pub fn open_path(&mut self, folder: &Path) {
        self.session.open(folder);
        self.status_extra = None;
        self.jump = None;
        self.viewer.invalidate();
        self.gallery
            .rebuild(self.session.collection.len(), self.session.collection.index());
    }

    fn step(&mut self, offset: isize) {
        if self.mode == ViewMode::Grid && self.session.collection.step(offset) {
            self.selection_changed();
        }
    }

    fn selection_changed(&mut self) {
        self.status_extra = None;
        self.gallery.set_selected(self.session.collection.index());
    }

    pub fn submit_jump(&mut self) {
        let Some(prompt) = self.jump.as_mut() else {
            return;
        };
        match self.session.collection.jump_to_input(&prompt.input) {
            Ok(()) => {
                self.jump = None;
                self.selection_changed();
            }
            Err(err) => {
                prompt.invalid = Some(err.to_string());
                prompt.focused = false;
            }
        }
    }

    pub fn delete_current(&mut self) {
        if self.session.collection.is_empty() {
            return;
        }
        match self.session.delete_current() {
            Ok(deleted) => {
                self.status_extra = Some(format!(
                    "Moved to {}",
                    self.session.display_path(&deleted.moved_to)
                ));
                self.collection_changed();
            }
            Err(err) => {
                warn!("delete failed: {err:#}");
                self.error = Some(format!("Failed to move file:\n{err:#}"));
            }
        }
    }

    pub fn undo(&mut self) {
        match self.session.undo() {
            Ok(Some(restored)) => {
                self.status_extra = Some(format!(
                    "Restored {}",
                    self.session.display_path(&restored.path)
                ));
                self.collection_changed();
            }
            Ok(None) => {
                self.status_extra = Some("Nothing to undo".into());
            }
            Err(err) => {
                warn!("undo failed: {err:#}");
                self.error = Some(format!("Failed to restore file:\n{err:#}"));
            }
        }
    }

    fn collection_changed(&mut self) {
        self.viewer.invalidate();
        self.gallery
            .rebuild(self.session.collection.len(), self.session.collection.index());
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ViewMode::Single => ViewMode::Grid,
            ViewMode::Grid => ViewMode::Single,
        };
        if self.mode == ViewMode::Grid {
            if let Some(index) = self.session.collection.index() {
                self.gallery.ensure_visible(index);
            }
        }
        info!("view mode: {:?}", self.mode);
    }

    pub fn status_text(&self) -> String {
        let collection = &self.session.collection;
        let text = match (collection.folder(), collection.current(), collection.index()) {
            (None, _, _) => "Pick a folder to begin".to_string(),
            (Some(_), Some(path), Some(index)) => format!(
                "{}/{} — {}",
                index + 1,
                collection.len(),
                path.file_name().unwrap_or_default().to_string_lossy()
            ),
            (Some(_), _, _) => "No images found".to_string(),
        };
        match &self.status_extra {
            Some(extra) => format!("{text}  |  {extra}"),
            None => text,
        }
    }

    fn keyboard_commands(&self, keys: &KeyboardState) -> Vec<Command> {
        let mut commands = Vec::new();
        if keys.next_image {
            commands.push(Command::Navigate(Direction::Next));
        }
        if keys.prev_image {
            commands.push(Command::Navigate(Direction::Prev));
        }
        if keys.row_up {
            commands.push(Command::RowUp);
        }
        if keys.row_down {
            commands.push(Command::RowDown);
        }
        if keys.delete {
            commands.push(Command::Delete);
        }
        if keys.undo {
            commands.push(Command::Undo);
        }
        if keys.go_to {
            commands.push(Command::GoTo);
        }
        if keys.toggle_view {
            commands.push(Command::ToggleView);
        }
        if self.mode == ViewMode::Grid {
            let size = self.gallery.thumb_size();
            if keys.thumb_larger {
                commands.push(Command::ThumbSize((size + THUMB_STEP) as f32));
            }
            if keys.thumb_smaller {
                commands.push(Command::ThumbSize(size.saturating_sub(THUMB_STEP) as f32));
            }
        }
        commands
    }

    fn toolbar(&self, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
        let collection = &self.session.collection;
        let has_images = !collection.is_empty();
        ui.horizontal(|ui| {
            if ui.button("Open").clicked() {
                commands.push(Command::OpenFolder);
            }
            if ui
                .add_enabled(collection.has_prev(), egui::Button::new("Prev"))
                .clicked()
            {
                commands.push(Command::Navigate(Direction::Prev));
            }
            if ui
                .add_enabled(collection.has_next(), egui::Button::new("Next"))
                .clicked()
            {
                commands.push(Command::Navigate(Direction::Next));
            }
            if ui
                .add_enabled(has_images, egui::Button::new("Delete"))
                .clicked()
            {
                commands.push(Command::Delete);
            }
            if ui
                .add_enabled(self.session.undo.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                commands.push(Command::Undo);
            }
            if ui
                .add_enabled(has_images, egui::Button::new("Go to…"))
                .clicked()
            {
                commands.push(Command::GoTo);
            }
            ui.separator();
            let toggle = match self.mode {
                ViewMode::Single => "Grid",
                ViewMode::Grid => "Single",
            };
            if ui.button(toggle).clicked() {
                commands.push(Command::ToggleView);
            }
            if self.mode == ViewMode::Grid {
                let mut size = self.gallery.thumb_size() as f32;
                let slider = egui::Slider::new(&mut size, THUMB_MIN as f32..=THUMB_MAX as f32)
                    .step_by(THUMB_STEP as f64)
                    .text("Thumbnails");
                if ui.add(slider).changed() {
                    commands.push(Command::ThumbSize(size));
                }
            }
        });
    }

    fn jump_window(&mut self, ctx: &egui::Context) -> bool {
        let len = self.session.collection.len();
        let Some(prompt) = self.jump.as_mut() else {
            return false;
        };
        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Go to image")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Image number (1-{len})"));
                let response = ui.text_edit_singleline(&mut prompt.input);
                if !prompt.focused {
                    response.request_focus();
                    prompt.focused = true;
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                if let Some(msg) = &prompt.invalid {
                    ui.colored_label(ERROR_RED, msg);
                }
                ui.horizontal(|ui| {
                    submit |= ui.button("Go").clicked();
                    cancel |= ui.button("Cancel").clicked();
                });
            });
        if cancel {
            self.jump = None;
        } else if submit {
            self.submit_jump();
        }
        true
    }

    fn error_window(&mut self, ctx: &egui::Context) -> bool {
        let Some(message) = self.error.as_ref() else {
            return false;
        };
        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message.as_str());
                dismissed = ui.button("OK").clicked();
            });
        if dismissed {
            self.error = None;
        }
        true
    }
}

impl PicCullApp {
    /// Runs one frame: dialogs, shortcuts, panels, then the collected commands.
    pub fn ui(&mut self, ctx: &egui::Context) {
        let escape = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if escape {
            if self.error.is_some() {
                self.error = None;
            } else if self.jump.is_some() {
                self.jump = None;
            } else {
                ctx.send_viewport_cmd(ViewportCommand::Close);
                return;
            }
        }

        // Widgets never hold keyboard focus outside the dialogs, so Tab and
        // Enter cannot reach toolbar buttons.
        if self.error.is_none() && self.jump.is_none() {
            ctx.memory_mut(|memory| {
                if let Some(id) = memory.focused() {
                    memory.surrender_focus(id);
                }
            });
        }

        let modal_open = self.error_window(ctx) | self.jump_window(ctx);

        let mut commands = Vec::new();
        if !modal_open {
            commands.extend(self.keyboard_commands(&KeyboardState::read(ctx)));
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| self.toolbar(ui, &mut commands));
        });

        let status = self.status_text();
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(egui::RichText::new(status).monospace().color(Color32::from_gray(136)));
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.mode {
            ViewMode::Single => {
                let collection = &self.session.collection;
                let action = self.viewer.show(
                    ui,
                    collection.current(),
                    collection.has_prev(),
                    collection.has_next(),
                );
                if action.prev {
                    commands.push(Command::Navigate(Direction::Prev));
                }
                if action.next {
                    commands.push(Command::Navigate(Direction::Next));
                }
            }
            ViewMode::Grid => {
                if self.session.collection.is_empty() {
                    ui.centered_and_justified(|ui| {
                        ui.label(egui::RichText::new("No images").color(Color32::from_gray(136)));
                    });
                    return;
                }
                let action = self.gallery.show(
                    ui,
                    &mut self.session.thumbnails,
                    self.session.collection.images(),
                );
                if let Some(index) = action.open {
                    commands.push(Command::OpenInViewer(index));
                } else if let Some(index) = action.select {
                    commands.push(Command::Select(index));
                }
            }
        });

        if !commands.is_empty() {
            for command in commands {
                self.apply(command);
            }
            ctx.request_repaint();
        }
    }
}

impl App for PicCullApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.ui(ctx);
    }
}
