//! Image normalization before upload
//!
//! Uploads are bounded client-side: only common web formats under a size
//! limit are accepted, and everything is downsampled to a maximum width and
//! re-encoded as JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;

use crate::config::ImageConfig;
use crate::error::{Error, Result, ValidationError};

/// Largest accepted source file (5 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types accepted for upload
pub const ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// An image picked for upload
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// Original file name
    pub name: String,
    /// Detected or declared MIME type
    pub mime: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Create a file with an explicit MIME type
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Create a file, sniffing the MIME type from its contents
    ///
    /// Falls back to the file extension when the magic bytes are not
    /// recognized.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| mime_from_extension(&name).to_string());
        Self { name, mime, bytes }
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn mime_from_extension(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Result of [`compress`]
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CompressedImage {
    pub const MIME: &'static str = "image/jpeg";
}

/// Check type and size against the default limit
pub fn validate(file: &ImageFile) -> std::result::Result<(), ValidationError> {
    validate_with_limit(file, MAX_UPLOAD_BYTES)
}

/// Check type and size against `max_bytes`
pub fn validate_with_limit(
    file: &ImageFile,
    max_bytes: u64,
) -> std::result::Result<(), ValidationError> {
    let mime = file.mime.to_ascii_lowercase();
    if !ALLOWED_TYPES.contains(&mime.as_str()) {
        return Err(ValidationError::InvalidFileType(file.mime.clone()));
    }
    if file.size() > max_bytes {
        return Err(ValidationError::FileTooLarge {
            size: file.size(),
            max: max_bytes,
        });
    }
    Ok(())
}

/// Target size for an image capped at `max_width`, keeping the aspect ratio
///
/// Images already narrower than the cap keep their size.
pub fn fit_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 || max_width == 0 {
        return (width, height);
    }
    let ratio = max_width as f64 / width as f64;
    let scaled = (height as f64 * ratio).round().max(1.0) as u32;
    (max_width, scaled)
}

/// Decode, downsample and re-encode as JPEG
///
/// `quality` is a fraction in `0.0..=1.0`.
pub fn compress(file: &ImageFile, quality: f32, max_width: u32) -> Result<CompressedImage> {
    let img = image::load_from_memory(&file.bytes)
        .map_err(|e| Error::DecodeFailure(format!("{}: {}", file.name, e)))?;

    let (width, height) = fit_width(img.width(), img.height(), max_width);
    let img = if (width, height) != (img.width(), img.height()) {
        tracing::debug!(
            "Resizing {} from {}x{} to {}x{}",
            file.name,
            img.width(),
            img.height(),
            width,
            height
        );
        img.resize_exact(width, height, FilterType::Lanczos3)
    } else {
        img
    };

    let bytes = encode_jpeg(&img, quality)
        .map_err(|e| Error::DecodeFailure(format!("{}: {}", file.name, e)))?;

    tracing::debug!(
        "Compressed {} from {} to {} bytes",
        file.name,
        file.size(),
        bytes.len()
    );

    Ok(CompressedImage {
        bytes,
        width,
        height,
    })
}

fn encode_jpeg(img: &DynamicImage, quality: f32) -> image::ImageResult<Vec<u8>> {
    let quality = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(&rgb)?;
    Ok(buf)
}

/// Normalizer bound to the configured limits
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    config: ImageConfig,
}

impl ImageNormalizer {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Validate then compress with the configured quality and width
    pub fn normalize(&self, file: &ImageFile) -> Result<CompressedImage> {
        validate_with_limit(file, self.config.max_bytes)?;
        compress(file, self.config.quality, self.config.max_width)
    }
}
