use std::{fs, io::Cursor, path::Path};

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use zune_jpeg::JpegDecoder;

/// Fill color of the bitmap shown for thumbnails that fail to decode.
pub const PLACEHOLDER_RGBA: [u8; 4] = [42, 42, 42, 255];

pub fn to_color_image(img: &DynamicImage) -> egui::ColorImage {
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.into_raw();
    egui::ColorImage::from_rgba_unmultiplied(size, &pixels)
}

pub fn placeholder_image(size: u32) -> egui::ColorImage {
    let size = size.max(1);
    let buffer = RgbaImage::from_pixel(size, size, Rgba(PLACEHOLDER_RGBA));
    to_color_image(&DynamicImage::ImageRgba8(buffer))
}

/// Reads and decodes `path`, then rotates/flips it upright according to its
/// EXIF orientation tag.
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    let bytes = fs::read(path).with_context(|| format!("Unable to read {}", path.display()))?;
    let image = if is_jpeg(path) {
        decode_jpeg(&bytes)
            .or_else(|_| image::load_from_memory(&bytes).map_err(anyhow::Error::from))
    } else {
        image::load_from_memory(&bytes).map_err(anyhow::Error::from)
    }
    .with_context(|| format!("Unable to decode {}", path.display()))?;
    Ok(apply_orientation(image, read_orientation(&bytes)))
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.eq_ignore_ascii_case("jpg") || s.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

fn decode_jpeg(bytes: &[u8]) -> Result<DynamicImage> {
    let mut decoder = JpegDecoder::new(Cursor::new(bytes));
    let pixels = decoder
        .decode()
        .map_err(|err| anyhow!("zune-jpeg: {err:?}"))?;
    let info = decoder
        .info()
        .ok_or_else(|| anyhow!("zune-jpeg: missing image info"))?;
    // Grayscale and CMYK output does not fit an RGB buffer; the caller falls
    // back to the image crate for those.
    image::RgbImage::from_raw(info.width as u32, info.height as u32, pixels)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| anyhow!("zune-jpeg: unexpected pixel layout"))
}

/// EXIF orientation (1-8) embedded in JPEG or PNG bytes; 1 when absent.
pub fn read_orientation(bytes: &[u8]) -> u32 {
    let mut reader = Cursor::new(bytes);
    exif::Reader::new()
        .read_from_container(&mut reader)
        .ok()
        .and_then(|exif| {
            exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .filter(|v| (1..=8).contains(v))
        .unwrap_or(1)
}

pub fn apply_orientation(image: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

/// Dimensions of `(width, height)` scaled down so the longer edge is at most
/// `max_edge`. Never upscales.
pub fn thumbnail_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longer = width.max(height).max(1);
    if longer <= max_edge {
        return (width.max(1), height.max(1));
    }
    let scale = max_edge as f64 / longer as f64;
    (
        ((width as f64 * scale).round() as u32).clamp(1, max_edge),
        ((height as f64 * scale).round() as u32).clamp(1, max_edge),
    )
}

pub fn thumbnail(image: &DynamicImage, max_edge: u32) -> Result<DynamicImage> {
    let (width, height) = thumbnail_dimensions(image.width(), image.height(), max_edge);
    if (width, height) == (image.width(), image.height()) {
        return Ok(image.clone());
    }
    resize_exact(image, width, height)
}

/// High quality (Lanczos3) resize to exactly `width` x `height`.
pub fn resize_exact(image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
    let width = width.max(1);
    let height = height.max(1);
    let rgba = image.to_rgba8();
    let src_image = Image::from_vec_u8(
        rgba.width(),
        rgba.height(),
        rgba.into_raw(),
        PixelType::U8x4,
    )?;
    let mut dst_image = Image::new(width, height, PixelType::U8x4);
    let options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    Resizer::new().resize(&src_image, &mut dst_image, &options)?;
    RgbaImage::from_raw(width, height, dst_image.into_vec())
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| anyhow!("resized buffer does not match {width}x{height}"))
}

/// Decoding support the application cannot run without.
pub fn check_decoders() -> Result<()> {
    for format in [ImageFormat::Jpeg, ImageFormat::Png] {
        if !format.reading_enabled() {
            return Err(anyhow!(
                "This build cannot decode {format:?} images; rebuild the image crate with the jpeg and png features"
            ));
        }
    }
    Ok(())
}
