//! Lossy JPEG recompression and lossless PNG optimization.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use image::ImageFormat;

use crate::error::{Result, TaskError};

/// Image formats with a dedicated optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Other,
}

impl ImageKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => ImageKind::Jpeg,
            "png" => ImageKind::Png,
            _ => ImageKind::Other,
        }
    }
}

/// Optimizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSettings {
    pub jpeg_quality: u8,
    pub png_level: u8,
}

/// Optimize `bytes` read from `file`.
///
/// Returns the smaller of the optimized and original bytes. Formats without
/// an optimizer come back unchanged.
pub fn optimize(file: &Path, bytes: &[u8], settings: ImageSettings) -> Result<Vec<u8>> {
    let optimized = match ImageKind::from_path(file) {
        ImageKind::Jpeg => recompress_jpeg(bytes, settings.jpeg_quality),
        ImageKind::Png => optimize_png(bytes, settings.png_level),
        ImageKind::Other => return Ok(bytes.to_vec()),
    }
    .map_err(|message| TaskError::Image {
        file: file.to_path_buf(),
        message,
    })?;

    if optimized.len() < bytes.len() {
        Ok(optimized)
    } else {
        tracing::debug!("{}: optimized output not smaller, keeping original", file.display());
        Ok(bytes.to_vec())
    }
}

fn recompress_jpeg(bytes: &[u8], quality: u8) -> std::result::Result<Vec<u8>, String> {
    let rgb = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .map_err(|e| e.to_string())?
        .to_rgb8();
    let (width, height) = rgb.dimensions();

    // libjpeg reports fatal errors by unwinding
    let encoded = catch_unwind(AssertUnwindSafe(|| -> std::io::Result<Vec<u8>> {
        let mut compress = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        compress.set_size(width as usize, height as usize);
        compress.set_quality(f32::from(quality));
        compress.set_progressive_mode();

        let mut started = compress.start_compress(Vec::new())?;
        started.write_scanlines(rgb.as_raw())?;
        started.finish()
    }));

    match encoded {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(_) => Err("jpeg encoder aborted".to_string()),
    }
}

fn optimize_png(bytes: &[u8], level: u8) -> std::result::Result<Vec<u8>, String> {
    oxipng::optimize_from_memory(bytes, &oxipng::Options::from_preset(level)).map_err(|e| e.to_string())
}
