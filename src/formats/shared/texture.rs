//! Provides texture decoding for fetched texture bytes.
//!
//! Both the primary (PNG) and fallback (Radiance HDR) formats are decoded
//! through `image`, which sniffs the format from the bytes themselves.
//!
//! # Examples
//! ```
//! use legends_import::formats::shared::texture::decode_texture;
//!
//! use legends_import::formats::TextureFilter;
//!
//! assert!(decode_texture(b"not an image", TextureFilter::Nearest).is_err());
//! ```

use std::sync::Arc;

use image::GenericImageView;

use crate::formats::{TextureData, TextureFilter};

/// Decodes encoded image bytes into RGBA8 texture data sampled with `filter`.
///
/// # Errors
/// Returns the decoder error if the bytes are not a supported image.
///
/// # Examples
/// ```
/// use legends_import::formats::shared::texture::decode_texture;
/// use legends_import::formats::TextureFilter;
///
/// let png = [
///     0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
///     0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
///     0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x10, 0x49, 0x44, 0x41, 0x54, 0x78, 0x01, 0x01, 0x05,
///     0x00, 0xFA, 0xFF, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x09, 0xFB, 0x03, 0xFD, 0xA3, 0xD1, 0x49,
///     0x0A, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
/// ];
/// let texture = decode_texture(&png, TextureFilter::Nearest).unwrap();
/// assert_eq!((texture.width, texture.height), (1, 1));
/// ```
pub fn decode_texture(bytes: &[u8], filter: TextureFilter) -> Result<Arc<TextureData>, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    let rgba = img.to_rgba8();

    Ok(Arc::new(TextureData {
        width,
        height,
        data: rgba.into_raw(),
        filter,
    }))
}
