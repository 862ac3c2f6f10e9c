//! Upload a single image

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::media::{ImageFile, ImageNormalizer, ImageUploader};
use crate::Desk;

use super::authorized_client;

/// Compress and upload an image, printing its public URL
pub async fn run(
    desk: &Desk,
    path: &Path,
    quality: Option<f32>,
    max_width: Option<u32>,
) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    let file = ImageFile::from_bytes(name, bytes);

    let mut image_config = desk.config.image.clone();
    if let Some(quality) = quality {
        image_config.quality = quality.clamp(0.0, 1.0);
    }
    if let Some(max_width) = max_width {
        image_config.max_width = max_width;
    }

    let client = authorized_client(desk).await?;
    let uploader = ImageUploader::new(
        &client,
        ImageNormalizer::new(image_config),
        desk.media_urls(),
    );
    let uploaded = uploader.upload(&file).await?;

    println!("Uploaded {} ({}x{})", uploaded.filename, uploaded.width, uploaded.height);
    println!("{}", uploaded.url);
    Ok(())
}
