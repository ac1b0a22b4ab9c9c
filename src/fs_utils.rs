use std::{
    ffi::{OsStr, OsString},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use once_cell::sync::Lazy;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const DELETED_DIR: &str = ".deleted";
pub const RESTORED_TAG: &str = "restored";

pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

static IMAGE_GLOB: Lazy<Option<GlobMatcher>> = Lazy::new(|| {
    let pattern = format!("*.{{{}}}", SUPPORTED_EXTENSIONS.join(","));
    match GlobBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(glob) => Some(glob.compile_matcher()),
        Err(err) => {
            warn!("invalid image glob {pattern}: {err}");
            None
        }
    }
});

/// Lists the supported images directly inside `folder`, sorted by
/// case-insensitive file name. An unreadable folder yields an empty list.
pub fn list_images(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry in {}: {err}", folder.display());
                continue;
            }
        };
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            files.push(entry.into_path());
        }
    }
    sort_by_name(&mut files);
    debug!("found {} images in {}", files.len(), folder.display());
    files
}

/// Case-insensitive name order; names equal under case folding keep a
/// deterministic byte order.
pub fn sort_by_name(files: &mut [PathBuf]) {
    files.sort_by_cached_key(|path| {
        let name = path.file_name().unwrap_or_default().to_os_string();
        (name.to_string_lossy().to_lowercase(), name)
    });
}

/// Dotfiles such as `.jpg` have no extension and never match.
pub fn is_supported_image(path: &Path) -> bool {
    let (Some(name), Some(_)) = (path.file_name(), path.extension()) else {
        return false;
    };
    IMAGE_GLOB
        .as_ref()
        .map_or(false, |glob| glob.is_match(Path::new(name)))
}

pub fn ensure_deleted_folder(folder: &Path) -> Result<PathBuf> {
    let dir = folder.join(DELETED_DIR);
    fs::create_dir_all(&dir).with_context(|| format!("Unable to create {}", dir.display()))?;
    Ok(dir)
}

/// Moves `source` into `target_dir` under its own name, appending `-{n}`
/// before the extension while that name is taken. Returns the final path.
pub fn move_with_collision_avoidance(source: &Path, target_dir: &Path) -> Result<PathBuf> {
    let file_name = source
        .file_name()
        .ok_or_else(|| anyhow!("{} has no file name", source.display()))?;
    let destination = unique_destination(target_dir, file_name, None);
    rename(source, &destination)?;
    Ok(destination)
}

/// Moves `source` back to `folder/original_name`, falling back to
/// `stem-restored-{n}.ext` when the original name is occupied.
pub fn restore_with_collision_avoidance(
    source: &Path,
    folder: &Path,
    original_name: &OsStr,
) -> Result<PathBuf> {
    let destination = unique_destination(folder, original_name, Some(RESTORED_TAG));
    rename(source, &destination)?;
    Ok(destination)
}

fn rename(source: &Path, destination: &Path) -> Result<()> {
    fs::rename(source, destination).with_context(|| {
        format!(
            "Unable to move {} to {}",
            source.display(),
            destination.display()
        )
    })
}

/// First free candidate in `dir`: the name itself, then `stem-{n}.ext`
/// (or `stem-{tag}-{n}.ext`) for n = 1, 2, 3, ...
///
/// The check is not atomic with the subsequent move.
pub fn unique_destination(dir: &Path, file_name: &OsStr, tag: Option<&str>) -> PathBuf {
    let mut candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let (mut stem, ext) = split_name(file_name);
    if let Some(tag) = tag {
        stem.push("-");
        stem.push(tag);
    }
    for idx in 1.. {
        let mut new_name = stem.clone();
        new_name.push(format!("-{idx}"));
        if let Some(ext) = &ext {
            new_name.push(".");
            new_name.push(ext);
        }
        candidate = dir.join(new_name);
        if !candidate.exists() {
            break;
        }
    }
    candidate
}

/// Stem and extension as `Path` sees them, without lossy conversion.
pub fn split_name(file_name: &OsStr) -> (OsString, Option<OsString>) {
    let path = Path::new(file_name);
    let stem = path.file_stem().unwrap_or(file_name).to_os_string();
    let ext = path.extension().map(OsStr::to_os_string);
    (stem, ext)
}
