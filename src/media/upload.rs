//! Image upload flow: validate, compress, upload, resolve the public URL

use std::path::Path;

use super::normalize::{CompressedImage, ImageFile, ImageNormalizer};
use crate::api::{UploadBackend, UploadedImage};
use crate::error::Result;
use crate::helpers::MediaUrls;

/// Uploads normalized images and hands back their public URL
pub struct ImageUploader<'a, B: UploadBackend> {
    backend: &'a B,
    normalizer: ImageNormalizer,
    urls: MediaUrls,
}

impl<'a, B: UploadBackend> ImageUploader<'a, B> {
    pub fn new(backend: &'a B, normalizer: ImageNormalizer, urls: MediaUrls) -> Self {
        Self {
            backend,
            normalizer,
            urls,
        }
    }

    /// Run the full upload flow for one file
    ///
    /// Validation and compression failures return before anything is sent.
    pub async fn upload(&self, file: &ImageFile) -> Result<UploadedImage> {
        let CompressedImage {
            bytes,
            width,
            height,
        } = self.normalizer.normalize(file)?;

        let name = jpeg_name(&file.name);
        tracing::info!("Uploading {} ({} bytes, {}x{})", name, bytes.len(), width, height);

        let filename = self
            .backend
            .upload_image(&name, CompressedImage::MIME, bytes)
            .await?;
        let url = self.urls.sanitize(&self.urls.upload_url(&filename));

        Ok(UploadedImage {
            filename,
            url,
            width,
            height,
        })
    }
}

/// Upload name for a re-encoded image
fn jpeg_name(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    format!("{}.jpg", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageConfig;
    use crate::error::{Error, ValidationError};
    use crate::media::normalize::tests::png;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeUploads {
        calls: Mutex<Vec<(String, String, usize)>>,
    }

    #[async_trait]
    impl UploadBackend for FakeUploads {
        async fn upload_image(&self, filename: &str, mime: &str, bytes: Vec<u8>) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((filename.to_string(), mime.to_string(), bytes.len()));
            Ok(format!("1700000000-{}", filename))
        }
    }

    fn uploader(backend: &FakeUploads, max_width: u32) -> ImageUploader<'_, FakeUploads> {
        ImageUploader::new(
            backend,
            ImageNormalizer::new(ImageConfig {
                max_width,
                ..ImageConfig::default()
            }),
            MediaUrls::new("https://contabil.example", "/uploads/"),
        )
    }

    #[tokio::test]
    async fn test_upload_flow() {
        let backend = FakeUploads::default();
        let file = ImageFile::from_bytes("Fachada.png", png(1000, 500));

        let uploaded = uploader(&backend, 800).upload(&file).await.unwrap();
        assert_eq!(uploaded.filename, "1700000000-Fachada.jpg");
        assert_eq!(
            uploaded.url,
            "https://contabil.example/uploads/1700000000-Fachada.jpg"
        );
        assert_eq!((uploaded.width, uploaded.height), (800, 400));

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "image/jpeg");
    }

    #[tokio::test]
    async fn test_invalid_file_never_uploads() {
        let backend = FakeUploads::default();
        let file = ImageFile::new("notes.txt", "text/plain", b"hello".to_vec());

        let err = uploader(&backend, 800).upload(&file).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidFileType(_))
        ));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_image_never_uploads() {
        let backend = FakeUploads::default();
        let file = ImageFile::new("broken.jpg", "image/jpeg", vec![0xff, 0xd8, 0x00]);

        let err = uploader(&backend, 800).upload(&file).await.unwrap_err();
        assert!(matches!(err, Error::DecodeFailure(_)));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_jpeg_name() {
        assert_eq!(jpeg_name("logo.png"), "logo.jpg");
        assert_eq!(jpeg_name(""), "image.jpg");
    }
}
