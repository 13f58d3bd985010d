//! Synthetic images for unit tests. White background, black features.

use std::ops::RangeInclusive;

use image::{Rgb, Rgb32FImage};

const WHITE: Rgb<f32> = Rgb([1.0, 1.0, 1.0]);
const BLACK: Rgb<f32> = Rgb([0.0, 0.0, 0.0]);

pub fn white_image(width: u32, height: u32) -> Rgb32FImage {
    Rgb32FImage::from_pixel(width, height, WHITE)
}

/// Black out columns `cols` on a single `row`.
pub fn darken(mut img: Rgb32FImage, row: u32, cols: RangeInclusive<u32>) -> Rgb32FImage {
    for x in cols {
        img.put_pixel(x, row, BLACK);
    }
    img
}

/// White image with columns `cols` black on `row` only.
pub fn banded_image(width: u32, height: u32, row: u32, cols: RangeInclusive<u32>) -> Rgb32FImage {
    darken(white_image(width, height), row, cols)
}

/// White image with full-height black column bands, each `(first, last)`
/// inclusive.
pub fn column_band_image(width: u32, height: u32, bands: &[(u32, u32)]) -> Rgb32FImage {
    Rgb32FImage::from_fn(width, height, |x, _| {
        if bands.iter().any(|&(lo, hi)| (lo..=hi).contains(&x)) {
            BLACK
        } else {
            WHITE
        }
    })
}

/// White image with full-width black rows `rows`.
pub fn row_band_image(width: u32, height: u32, rows: RangeInclusive<u32>) -> Rgb32FImage {
    Rgb32FImage::from_fn(width, height, |_, y| {
        if rows.contains(&y) { BLACK } else { WHITE }
    })
}
