//! Read-only pixel access for the sampler.
//!
//! The measurement code never decodes or owns images. It reads them
//! through [`PixelGrid`], which is implemented for every `image` buffer
//! with `f32` channels, so callers can hand over whatever they already
//! have decoded (`Rgb32FImage`, `Rgba32FImage`, or a raw array wrapped
//! with `ImageBuffer::from_raw`).
//!
//! Channels must be normalized to `[0.0, 1.0]`, the range the darkness
//! threshold is validated against. Scale 0-255 data before wrapping it.

use std::ops::Deref;

use image::{ImageBuffer, Pixel};

use crate::types::Dimensions;

/// A 2-D grid of pixels with at least red, green and blue intensity.
///
/// Implementations must be immutable for the duration of a measurement.
/// Coordinates are `(x, y)` = (column, row).
pub trait PixelGrid {
    /// Grid size in pixels.
    fn dimensions(&self) -> Dimensions;

    /// The red, green and blue channels of the pixel at column `x`,
    /// row `y`, or `None` when the position lies outside the grid.
    fn rgb(&self, x: u32, y: u32) -> Option<[f32; 3]>;
}

impl<P, C> PixelGrid for ImageBuffer<P, C>
where
    P: Pixel<Subpixel = f32>,
    C: Deref<Target = [f32]>,
{
    fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }

    fn rgb(&self, x: u32, y: u32) -> Option<[f32; 3]> {
        let pixel = self.get_pixel_checked(x, y)?;
        match pixel.channels() {
            [r, g, b, ..] => Some([*r, *g, *b]),
            // Gray (and gray + alpha) grids: intensity counts for every channel.
            [l, ..] => Some([*l; 3]),
            [] => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{Luma, LumaA, Rgb, Rgb32FImage, Rgba, Rgba32FImage};

    use super::*;

    #[test]
    fn rgb_image_reports_dimensions_and_channels() {
        let img = Rgb32FImage::from_fn(4, 3, |x, y| {
            #[allow(clippy::cast_precision_loss)]
            let v = (y * 4 + x) as f32 / 12.0;
            Rgb([v, 0.5, 1.0])
        });
        assert_eq!(
            PixelGrid::dimensions(&img),
            Dimensions {
                width: 4,
                height: 3
            }
        );
        let [r, g, b] = img.rgb(1, 2).unwrap_or_default();
        assert!((r - 9.0 / 12.0).abs() < f32::EPSILON);
        assert!((g - 0.5).abs() < f32::EPSILON);
        assert!((b - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rgba_image_ignores_alpha() {
        let img = Rgba32FImage::from_pixel(2, 2, Rgba([0.1, 0.2, 0.3, 0.0]));
        assert_eq!(img.rgb(0, 0), Some([0.1, 0.2, 0.3]));
    }

    #[test]
    fn gray_image_replicates_intensity() {
        let gray: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::from_pixel(2, 2, Luma([0.25]));
        assert_eq!(gray.rgb(1, 1), Some([0.25, 0.25, 0.25]));

        let gray_alpha: ImageBuffer<LumaA<f32>, Vec<f32>> =
            ImageBuffer::from_pixel(1, 1, LumaA([0.75, 1.0]));
        assert_eq!(gray_alpha.rgb(0, 0), Some([0.75, 0.75, 0.75]));
    }

    #[test]
    fn byte_range_data_is_scaled_before_measuring() {
        use crate::measure::measure;
        use crate::types::{MeasureConfig, Point};

        // One row of 0-255 samples: dark on columns 2..=3.
        let bytes: [f32; 6] = [230.0, 230.0, 20.0, 20.0, 230.0, 230.0];
        let data: Vec<f32> = bytes
            .iter()
            .flat_map(|&v| [v / 255.0; 3])
            .collect();
        let img = Rgb32FImage::from_raw(6, 1, data);
        assert!(img.is_some());
        if let Some(img) = img {
            let config = MeasureConfig {
                sample_count: 6,
                ..MeasureConfig::default()
            };
            let report = measure(&img, Point::new(0.0, 0.5), Point::new(5.0, 0.5), &config);
            let lengths: Vec<f64> = report
                .map(|r| r.regions().iter().map(|region| region.pixel_length).collect())
                .unwrap_or_default();
            assert_eq!(lengths.len(), 1);
            assert!((lengths[0] - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn outside_grid_is_none() {
        let img = Rgb32FImage::from_pixel(3, 2, Rgb([1.0, 1.0, 1.0]));
        assert_eq!(img.rgb(3, 0), None);
        assert_eq!(img.rgb(0, 2), None);
    }

    #[test]
    fn raw_array_wraps_as_grid() {
        // Row-major RGB triples, as a caller holding a decoded array would have.
        let data = vec![
            0.0, 0.0, 0.0, 1.0, 1.0, 1.0, // row 0
            0.5, 0.5, 0.5, 0.2, 0.3, 0.4, // row 1
        ];
        let img = Rgb32FImage::from_raw(2, 2, data);
        assert!(img.is_some());
        if let Some(img) = img {
            assert_eq!(img.rgb(1, 1), Some([0.2, 0.3, 0.4]));
            assert_eq!(img.rgb(0, 0), Some([0.0, 0.0, 0.0]));
        }
    }
}
