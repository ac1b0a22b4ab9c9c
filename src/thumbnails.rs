use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Result;
use eframe::egui;
use tracing::{debug, warn};

use crate::image_utils::{decode_image, placeholder_image, thumbnail, to_color_image};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThumbKey {
    pub path: PathBuf,
    pub size: u32,
}

/// Session-lifetime thumbnail bitmaps keyed by path and requested size.
///
/// Nothing is evicted except through [`ThumbnailCache::purge`]; entries are
/// not re-validated against the file on disk.
#[derive(Default)]
pub struct ThumbnailCache {
    entries: HashMap<ThumbKey, egui::ColorImage>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thumbnail whose longer edge is at most `size`. Images that fail to
    /// load produce a `size` x `size` placeholder instead of an error.
    pub fn get(&mut self, path: &Path, size: u32) -> &egui::ColorImage {
        let key = ThumbKey {
            path: path.to_path_buf(),
            size,
        };
        self.entries.entry(key).or_insert_with(|| {
            match render_thumbnail(path, size) {
                Ok(image) => {
                    debug!("cached {}px thumbnail for {}", size, path.display());
                    image
                }
                Err(err) => {
                    warn!("thumbnail for {} failed: {err:#}", path.display());
                    placeholder_image(size)
                }
            }
        })
    }

    pub fn contains(&self, path: &Path, size: u32) -> bool {
        self.entries.contains_key(&ThumbKey {
            path: path.to_path_buf(),
            size,
        })
    }

    /// Removes every size cached for `path`.
    pub fn purge(&mut self, path: &Path) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.path != path);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("purged {removed} thumbnails for {}", path.display());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn render_thumbnail(path: &Path, size: u32) -> Result<egui::ColorImage> {
    let image = decode_image(path)?;
    Ok(to_color_image(&thumbnail(&image, size)?))
}
