//! Sampler: evenly spaced points along a segment, classified dark or not.
//!
//! The segment from `p1` to `p2` is sampled at `sample_count` points,
//! inclusive of both endpoints. Each sample is floored to a pixel index
//! (`column = floor(x)`, `row = floor(y)`) and the pixel is dark when its
//! red, green and blue channels are all strictly below the threshold.
//!
//! # Parametrization
//!
//! Sample `i` of `n` is the weighted average
//! `(a * (n - 1 - i) + b * i) / (n - 1)` of the endpoint coordinates.
//! Nothing is divided by `dx` or `dy`, so vertical and horizontal segments
//! take the same path through the code. The dominant axis (the larger of
//! `|dx|` and `|dy|`) is only used to reject segments too short to
//! sample. Because the sum is commutative, sampling `p2 -> p1` yields the
//! exact reverse of `p1 -> p2`.

use serde::{Deserialize, Serialize};

use crate::raster::PixelGrid;
use crate::types::{MeasureConfig, MeasureError, Point};

/// Segments whose span along the dominant axis is below this many pixels
/// are rejected as degenerate.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// The axis along which a segment covers the most distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// `|dx| >= |dy|`.
    Horizontal,
    /// `|dy| > |dx|`.
    Vertical,
}

impl Axis {
    /// Dominant axis of the segment `p1 -> p2`.
    #[must_use]
    pub fn dominant(p1: Point, p2: Point) -> Self {
        if (p2.x - p1.x).abs() >= (p2.y - p1.y).abs() {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    /// Absolute span of `p1 -> p2` along this axis.
    #[must_use]
    pub fn span(self, p1: Point, p2: Point) -> f64 {
        match self {
            Self::Horizontal => (p2.x - p1.x).abs(),
            Self::Vertical => (p2.y - p1.y).abs(),
        }
    }
}

/// Sample coordinates together with their classification.
///
/// Both sequences have one entry per sample, ordered from `p1` to `p2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    points: Vec<Point>,
    dark: Vec<bool>,
}

impl Samples {
    /// Sample coordinates, before flooring.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// `true` for every sample whose pixel is dark.
    #[must_use]
    pub fn classifications(&self) -> &[bool] {
        &self.dark
    }

    /// Number of samples.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if there are no samples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of dark samples.
    #[must_use]
    pub fn dark_count(&self) -> usize {
        self.dark.iter().filter(|&&d| d).count()
    }
}

/// Generate `sample_count` evenly spaced points from `p1` to `p2`,
/// inclusive of both endpoints.
///
/// # Errors
///
/// Returns [`MeasureError::InvalidConfig`] if `sample_count` is outside
/// `MIN_SAMPLE_COUNT..=MAX_SAMPLE_COUNT` of [`MeasureConfig`].
/// Returns [`MeasureError::OutOfBounds`] if an endpoint is not finite.
/// Returns [`MeasureError::DegenerateSegment`] if the endpoints coincide
/// (dominant-axis span below [`DEGENERATE_EPSILON`]).
pub fn sample_path(p1: Point, p2: Point, sample_count: usize) -> Result<Vec<Point>, MeasureError> {
    let accepted = MeasureConfig::MIN_SAMPLE_COUNT..=MeasureConfig::MAX_SAMPLE_COUNT;
    if !accepted.contains(&sample_count) {
        return Err(MeasureError::InvalidConfig(format!(
            "sample_count must be within [{}, {}], got {sample_count}",
            MeasureConfig::MIN_SAMPLE_COUNT,
            MeasureConfig::MAX_SAMPLE_COUNT,
        )));
    }
    for p in [p1, p2] {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(MeasureError::OutOfBounds { x: p.x, y: p.y });
        }
    }
    if Axis::dominant(p1, p2).span(p1, p2) < DEGENERATE_EPSILON {
        return Err(MeasureError::DegenerateSegment);
    }

    let last = sample_count - 1;
    #[allow(clippy::cast_precision_loss)]
    let denom = last as f64;

    // A plain sum (not mul_add) keeps p1 -> p2 and p2 -> p1 bit-identical.
    #[allow(clippy::cast_precision_loss, clippy::suboptimal_flops)]
    let points = (0..sample_count)
        .map(|i| {
            let w2 = i as f64;
            let w1 = (last - i) as f64;
            Point::new(
                (p1.x * w1 + p2.x * w2) / denom,
                (p1.y * w1 + p2.y * w2) / denom,
            )
        })
        .collect();

    Ok(points)
}

/// Returns `true` if every color channel is strictly below `threshold`.
#[must_use]
pub fn is_dark(rgb: [f32; 3], threshold: f32) -> bool {
    rgb.iter().all(|&c| c < threshold)
}

/// Classify the pixel under each point.
///
/// # Errors
///
/// Returns [`MeasureError::OutOfBounds`] for the first point whose floored
/// coordinates fall outside the grid.
pub fn classify<G: PixelGrid + ?Sized>(
    image: &G,
    points: &[Point],
    threshold: f32,
) -> Result<Vec<bool>, MeasureError> {
    points
        .iter()
        .map(|&p| pixel_at(image, p).map(|rgb| is_dark(rgb, threshold)))
        .collect()
}

/// Sample the segment `p1 -> p2` and classify every sample.
///
/// # Errors
///
/// See [`sample_path`] and [`classify`].
pub fn sample<G: PixelGrid + ?Sized>(
    image: &G,
    p1: Point,
    p2: Point,
    sample_count: usize,
    threshold: f32,
) -> Result<Samples, MeasureError> {
    let points = sample_path(p1, p2, sample_count)?;
    let dark = classify(image, &points, threshold)?;
    let samples = Samples { points, dark };
    log::debug!(
        "sampled {} points from ({}, {}) to ({}, {}), {} dark",
        samples.len(),
        p1.x,
        p1.y,
        p2.x,
        p2.y,
        samples.dark_count(),
    );
    Ok(samples)
}

/// Floor `p` to a pixel index and read it, guarding the grid bounds.
fn pixel_at<G: PixelGrid + ?Sized>(image: &G, p: Point) -> Result<[f32; 3], MeasureError> {
    let out_of_bounds = MeasureError::OutOfBounds { x: p.x, y: p.y };
    if !image.dimensions().contains(p) {
        return Err(out_of_bounds);
    }
    // In range: `contains` checked 0 <= floor < dimension.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (col, row) = (p.x.floor() as u32, p.y.floor() as u32);
    image.rgb(col, row).ok_or(out_of_bounds)
}
