//! darkspan-core: measure dark bands along a line segment (sans-IO).
//!
//! Given a decoded image and two endpoints, the measurement runs:
//! sample the segment -> classify samples dark/not dark -> record
//! boundaries where the classification flips -> pair boundaries ->
//! convert each pair's distance to physical units.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! pixel grids and byte slices and returns structured data. Reading
//! files, capturing clicks and printing results live in the `darkspan`
//! binary.

pub mod boundary;
pub mod decode;
pub mod measure;
pub mod raster;
pub mod sampler;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_support;

pub use boundary::{BoundaryPair, BoundaryScan, RegionPhase, find_boundaries, pair_boundaries};
pub use measure::{MeasureReport, Measurement, RegionLength, measure};
pub use raster::PixelGrid;
pub use sampler::{Samples, sample};
pub use session::{
    ClickOutcome, ClickPhase, ClickSession, IgnoreReason, PointerButton, PointerEvent,
};
pub use types::{Dimensions, MeasureConfig, MeasureError, OpenRegionPolicy, Point, Rgba32FImage};

/// Decode image bytes and measure the segment `p1 -> p2` in one call.
///
/// Convenience for callers that hold an encoded image and want a single
/// measurement. Interactive callers should decode once with
/// [`decode::decode_normalized`] and reuse the image through a
/// [`ClickSession`].
///
/// # Errors
///
/// Returns [`MeasureError::EmptyInput`] or [`MeasureError::ImageDecode`]
/// if the bytes cannot be decoded, and any error [`measure`] reports.
pub fn measure_encoded(
    image_bytes: &[u8],
    p1: Point,
    p2: Point,
    config: &MeasureConfig,
) -> Result<MeasureReport, MeasureError> {
    let image = decode::decode_normalized(image_bytes)?;
    measure(&image, p1, p2, config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// PNG with a black vertical stripe over columns `lo..=hi`.
    fn stripe_png(width: u32, height: u32, lo: u32, hi: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, _y| {
            if (lo..=hi).contains(&x) {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn measure_encoded_empty_input() {
        let result = measure_encoded(
            &[],
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            &MeasureConfig::default(),
        );
        assert!(matches!(result, Err(MeasureError::EmptyInput)));
    }

    #[test]
    fn measure_encoded_corrupt_input() {
        let result = measure_encoded(
            &[0xFF, 0x00],
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            &MeasureConfig::default(),
        );
        assert!(matches!(result, Err(MeasureError::ImageDecode(_))));
    }

    #[test]
    fn measure_encoded_stripe() {
        let png = stripe_png(40, 20, 12, 21);
        let report = measure_encoded(
            &png,
            Point::new(0.0, 10.0),
            Point::new(39.0, 10.0),
            &MeasureConfig::default(),
        )
        .unwrap();
        let regions = report.measurement.regions();
        assert_eq!(regions.len(), 1);
        // 10000 samples over 39 px: boundaries land within one step of 12 and 22.
        let step = 39.0 / 9_999.0;
        assert!((regions[0].pixel_length - 10.0).abs() <= step + 1e-9);
    }
}
