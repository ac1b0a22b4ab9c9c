use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fs_utils::list_images;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JumpError {
    #[error("\"{0}\" is not an image number")]
    NotANumber(String),
    #[error("image {requested} is out of range 1-{len}")]
    OutOfRange { requested: usize, len: usize },
}

/// Ordered images of the open folder and the current selection.
///
/// `index` is `None` exactly when `images` is empty.
#[derive(Default)]
pub struct Collection {
    folder: Option<PathBuf>,
    images: Vec<PathBuf>,
    index: Option<usize>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, folder: &Path) {
        let images = list_images(folder);
        self.replace(folder.to_path_buf(), images);
    }

    pub fn replace(&mut self, folder: PathBuf, images: Vec<PathBuf>) {
        self.index = if images.is_empty() { None } else { Some(0) };
        self.folder = Some(folder);
        self.images = images;
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<&Path> {
        self.index
            .and_then(|idx| self.images.get(idx))
            .map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        matches!(self.index, Some(idx) if idx > 0)
    }

    pub fn has_next(&self) -> bool {
        matches!(self.index, Some(idx) if idx + 1 < self.images.len())
    }

    /// Moves one step without wrapping. Returns whether the selection changed.
    pub fn advance(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Prev => self.step(-1),
            Direction::Next => self.step(1),
        }
    }

    /// Moves by `offset`, clamped to the ends of the collection.
    pub fn step(&mut self, offset: isize) -> bool {
        let Some(idx) = self.index else {
            return false;
        };
        let last = self.images.len().saturating_sub(1);
        let target = idx.saturating_add_signed(offset).min(last);
        self.set_index(target)
    }

    /// Selects a 0-based position. Out of range positions are ignored.
    pub fn set_index(&mut self, index: usize) -> bool {
        if index >= self.images.len() || self.index == Some(index) {
            return false;
        }
        self.index = Some(index);
        true
    }

    pub fn jump_to(&mut self, index_1_based: usize) -> Result<(), JumpError> {
        if index_1_based == 0 || index_1_based > self.images.len() {
            return Err(JumpError::OutOfRange {
                requested: index_1_based,
                len: self.images.len(),
            });
        }
        self.index = Some(index_1_based - 1);
        Ok(())
    }

    pub fn jump_to_input(&mut self, input: &str) -> Result<(), JumpError> {
        let trimmed = input.trim();
        let requested = trimmed
            .parse::<usize>()
            .map_err(|_| JumpError::NotANumber(trimmed.to_string()))?;
        self.jump_to(requested)
    }

    /// Drops the selected entry; the caller must already have moved the file.
    pub fn remove_current(&mut self) -> Option<(usize, PathBuf)> {
        let idx = self.index?;
        let removed = self.images.remove(idx);
        self.index = if self.images.is_empty() {
            None
        } else {
            Some(idx.min(self.images.len() - 1))
        };
        Some((idx, removed))
    }

    /// Reinserts `path` near `index` and selects it; the caller must already
    /// have moved the file back.
    pub fn restore(&mut self, index: usize, path: PathBuf) -> usize {
        let at = index.min(self.images.len());
        self.images.insert(at, path);
        self.index = Some(at);
        at
    }
}
