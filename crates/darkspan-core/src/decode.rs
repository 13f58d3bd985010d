//! Image decoding into normalized float channels.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces an
//! [`Rgba32FImage`] whose channels lie in `[0.0, 1.0]` regardless of the
//! source bit depth. That is the intensity scale the darkness threshold
//! is expressed in.
//!
//! This module takes bytes, never paths: reading files is the caller's job.

use image::Rgba32FImage;

use crate::types::MeasureError;

/// Decode raw image bytes into a normalized RGBA float image.
///
/// Supports whatever the `image` crate was built to decode (PNG, JPEG,
/// BMP, WebP). 8-bit and 16-bit sources both map to `[0.0, 1.0]`.
///
/// # Errors
///
/// Returns [`MeasureError::EmptyInput`] if `bytes` is empty.
/// Returns [`MeasureError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode_normalized(bytes: &[u8]) -> Result<Rgba32FImage, MeasureError> {
    if bytes.is_empty() {
        return Err(MeasureError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    log::debug!(
        "decoded {}x{} image ({:?})",
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img.to_rgba32f())
}
