use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::{
    collection::Collection,
    fs_utils::{ensure_deleted_folder, move_with_collision_avoidance, restore_with_collision_avoidance},
    thumbnails::ThumbnailCache,
    undo::UndoLog,
};

pub struct Deleted {
    pub original: PathBuf,
    pub moved_to: PathBuf,
    pub index: usize,
}

pub struct Restored {
    pub path: PathBuf,
    pub index: usize,
}

/// The open folder's images, the undo slot and the thumbnail cache.
///
/// Files are moved first; in-memory state only changes once the move has
/// succeeded.
#[derive(Default)]
pub struct Session {
    pub collection: Collection,
    pub undo: UndoLog,
    pub thumbnails: ThumbnailCache,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, folder: &Path) -> usize {
        self.collection.select(folder);
        self.undo.clear();
        let count = self.collection.len();
        if count == 0 {
            warn!("no images found in {}", folder.display());
        } else {
            info!("opened {} with {count} images", folder.display());
        }
        count
    }

    pub fn delete_current(&mut self) -> Result<Deleted> {
        let (index, original) = match (self.collection.index(), self.collection.current()) {
            (Some(index), Some(path)) => (index, path.to_path_buf()),
            _ => return Err(anyhow!("No image selected")),
        };
        let folder = original
            .parent()
            .ok_or_else(|| anyhow!("{} has no parent folder", original.display()))?
            .to_path_buf();
        let original_name = original
            .file_name()
            .ok_or_else(|| anyhow!("{} has no file name", original.display()))?
            .to_os_string();

        let deleted_dir = ensure_deleted_folder(&folder)?;
        let moved_to = move_with_collision_avoidance(&original, &deleted_dir)?;

        self.collection.remove_current();
        self.thumbnails.purge(&original);
        self.undo
            .record_delete(folder, moved_to.clone(), index, original_name);
        info!("moved {} to {}", original.display(), moved_to.display());
        Ok(Deleted {
            original,
            moved_to,
            index,
        })
    }

    /// Restores the last deleted file. `Ok(None)` when there is nothing to
    /// undo; on error the undo record is kept so the user can retry.
    pub fn undo(&mut self) -> Result<Option<Restored>> {
        let Some(record) = self.undo.peek() else {
            return Ok(None);
        };
        let path = restore_with_collision_avoidance(
            &record.moved_to,
            &record.original_folder,
            &record.original_name,
        )?;
        let Some(record) = self.undo.take() else {
            return Ok(None);
        };
        let index = self.collection.restore(record.original_index, path.clone());
        info!("restored {} to {}", record.moved_to.display(), path.display());
        Ok(Some(Restored { path, index }))
    }

    /// `path` relative to the open folder when possible, else its file name.
    pub fn display_path(&self, path: &Path) -> String {
        self.collection
            .folder()
            .and_then(|folder| path.strip_prefix(folder).ok())
            .map(|rel| rel.display().to_string())
            .unwrap_or_else(|| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            })
    }
}
