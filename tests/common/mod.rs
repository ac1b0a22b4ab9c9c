#![allow(dead_code)]

use image::{DynamicImage, Rgba, RgbaImage};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    let pixel = Rgba(color);
    let buffer = RgbaImage::from_pixel(width, height, pixel);
    DynamicImage::ImageRgba8(buffer)
}

pub fn write_image(path: impl Into<PathBuf>, image: &DynamicImage) {
    image
        .save(path.into())
        .expect("failed to write image to disk");
}

/// Writes a small valid PNG under each name (the extension only matters to
/// the filter, the content is always PNG).
pub fn populate(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            let image = solid_image(4, 3, [200, 100, 50, 255]);
            image
                .save_with_format(&path, image::ImageFormat::Png)
                .expect("failed to write fixture");
            path
        })
        .collect()
}

pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

pub fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// A `width` x `height` JPEG carrying an EXIF orientation tag.
pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(solid_image(width, height, [90, 120, 150, 255]).to_rgb8());
    let mut encoded = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, image::ImageFormat::Jpeg)
        .expect("failed to encode jpeg");
    let encoded = encoded.into_inner();

    let mut app1 = vec![0xFF, 0xE1, 0x00, 0x22];
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(&[0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00]);
    app1.extend_from_slice(&[0x01, 0x00]);
    app1.extend_from_slice(&[0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00]);
    app1.extend_from_slice(&orientation.to_le_bytes());
    app1.extend_from_slice(&[0x00, 0x00]);
    app1.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let mut out = encoded[..2].to_vec();
    out.extend_from_slice(&app1);
    out.extend_from_slice(&encoded[2..]);
    out
}
