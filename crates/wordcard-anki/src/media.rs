use std::io::Cursor;

use anyhow::{Context, Result};
use image::ImageFormat;
use image::imageops::FilterType;

pub fn media_filename(id: i64) -> String {
    format!("wordcard_{id}.png")
}

/// Decode any supported image and re-encode it as a `size`x`size` PNG
pub fn resize_png(bytes: &[u8], size: u32) -> Result<Vec<u8>> {
    let image = image::load_from_memory(bytes).context("Failed to decode image")?;
    let resized = image.resize_exact(size, size, FilterType::Lanczos3);

    let mut buffer = Cursor::new(Vec::new());
    resized
        .write_to(&mut buffer, ImageFormat::Png)
        .context("Failed to encode PNG")?;

    Ok(buffer.into_inner())
}
