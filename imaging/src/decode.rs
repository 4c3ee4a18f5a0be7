//! Decoding encoded uploads (PNG, JPEG) into an [`Image`].

use idv_types::{Image, ImageRole, InputError, PixelFormat};
use std::path::Path;

/// Decode PNG or JPEG bytes into an RGB image.
pub fn decode(bytes: &[u8], role: ImageRole) -> Result<Image, InputError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| InputError::Undecodable {
        role,
        reason: e.to_string(),
    })?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    Image::new(width, height, PixelFormat::Rgb8, rgb.into_raw())
}

/// Read and decode an image file.
pub fn decode_file(path: impl AsRef<Path>, role: ImageRole) -> Result<Image, InputError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| InputError::Undecodable {
        role,
        reason: format!("{}: {e}", path.display()),
    })?;
    decode(&bytes, role)
}
