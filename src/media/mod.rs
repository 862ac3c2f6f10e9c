//! Media module - image normalization and upload

mod normalize;
mod upload;

pub use normalize::{
    compress, fit_width, validate, validate_with_limit, CompressedImage, ImageFile,
    ImageNormalizer, ALLOWED_TYPES, MAX_UPLOAD_BYTES,
};
pub use upload::ImageUploader;
