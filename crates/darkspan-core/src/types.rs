//! Shared types for darkspan measurements.

use serde::{Deserialize, Serialize};

/// Re-export `Rgba32FImage` so downstream crates can hold decoded
/// images without depending on `image` directly.
pub use image::Rgba32FImage;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Returns `true` if `p` falls on a pixel of the grid once floored.
    ///
    /// This is the same test the sampler applies to every sample, so a
    /// point accepted here never produces an out-of-bounds sample.
    #[must_use]
    pub fn contains(self, p: Point) -> bool {
        p.x.is_finite()
            && p.y.is_finite()
            && p.x >= 0.0
            && p.y >= 0.0
            && p.x.floor() < f64::from(self.width)
            && p.y.floor() < f64::from(self.height)
    }
}

/// What to do with a dark region that is still open when the scan
/// reaches the last sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenRegionPolicy {
    /// Discard the unterminated region. Only closed regions are measured.
    #[default]
    Drop,
    /// Measure the unterminated region from its start to one sample spacing
    /// past the final sample, the same span a closed region of as many dark
    /// samples gets, and report it separately as an open region (a lower
    /// bound).
    Report,
}

/// Configuration for a measurement session.
///
/// Fixed for the lifetime of a session and supplied by the caller.
/// [`validate`](Self::validate) is run at the start of every measurement,
/// so invalid values are rejected before any pixel is touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Number of evenly spaced samples taken along the segment,
    /// including both endpoints. Must be at least 2.
    pub sample_count: usize,

    /// Per-channel intensity cutoff. A pixel is dark when its red, green
    /// and blue channels are all strictly below this value.
    ///
    /// Channels are normalized to `[0.0, 1.0]`, so the threshold must lie
    /// in the same range.
    pub darkness_threshold: f32,

    /// Physical units per pixel.
    pub unit_scale: f64,

    /// Handling of a dark region that extends to the final sample.
    pub open_region: OpenRegionPolicy,
}

impl MeasureConfig {
    /// Default number of samples along a segment.
    pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;

    /// Default darkness threshold (normalized intensity).
    pub const DEFAULT_DARKNESS_THRESHOLD: f32 = 0.35;

    /// Default physical units per pixel (micrometers for the reference
    /// microscope setup).
    pub const DEFAULT_UNIT_SCALE: f64 = 1.714;

    /// Smallest accepted sample count.
    pub const MIN_SAMPLE_COUNT: usize = 2;

    /// Largest accepted sample count.
    pub const MAX_SAMPLE_COUNT: usize = 10_000_000;

    /// Check the invariants every measurement relies on.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::InvalidConfig`] if `sample_count` is outside
    /// `MIN_SAMPLE_COUNT..=MAX_SAMPLE_COUNT`, if
    /// `darkness_threshold` is not a finite value in `[0.0, 1.0]`, or if
    /// `unit_scale` is not finite and strictly positive.
    pub fn validate(&self) -> Result<(), MeasureError> {
        if !(Self::MIN_SAMPLE_COUNT..=Self::MAX_SAMPLE_COUNT).contains(&self.sample_count) {
            return Err(MeasureError::InvalidConfig(format!(
                "sample_count must be within [{}, {}], got {}",
                Self::MIN_SAMPLE_COUNT,
                Self::MAX_SAMPLE_COUNT,
                self.sample_count,
            )));
        }
        if !self.darkness_threshold.is_finite() || !(0.0..=1.0).contains(&self.darkness_threshold)
        {
            return Err(MeasureError::InvalidConfig(format!(
                "darkness_threshold must be within [0, 1], got {}",
                self.darkness_threshold,
            )));
        }
        if !self.unit_scale.is_finite() || self.unit_scale <= 0.0 {
            return Err(MeasureError::InvalidConfig(format!(
                "unit_scale must be finite and positive, got {}",
                self.unit_scale,
            )));
        }
        Ok(())
    }
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            sample_count: Self::DEFAULT_SAMPLE_COUNT,
            darkness_threshold: Self::DEFAULT_DARKNESS_THRESHOLD,
            unit_scale: Self::DEFAULT_UNIT_SCALE,
            open_region: OpenRegionPolicy::default(),
        }
    }
}

/// Errors that can occur while decoding or measuring.
///
/// Every variant is local to a single call; none of them leave state
/// behind that affects the next measurement.
///
/// Uses custom `Serialize`/`Deserialize` because `image::ImageError`
/// does not implement serde traits. The `ImageDecode` variant is
/// serialized as its `Display` string.
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Image decoding failed on the other side of a serialization
    /// boundary; only the message survived.
    #[error("failed to decode image: {0}")]
    ImageDecodeMessage(String),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Measurement configuration is invalid.
    #[error("invalid measurement configuration: {0}")]
    InvalidConfig(String),

    /// A sample fell outside the pixel grid.
    #[error("sample at ({x}, {y}) lies outside the image")]
    OutOfBounds {
        /// Horizontal sample coordinate before flooring.
        x: f64,
        /// Vertical sample coordinate before flooring.
        y: f64,
    },

    /// The two endpoints coincide, so there is no line to sample.
    #[error("endpoints coincide; no measurement possible")]
    DegenerateSegment,

    /// An odd number of boundary points reached the pairing stage.
    #[error("boundary sequence has an odd number of points ({count})")]
    MalformedBoundarySequence {
        /// Number of boundary points received.
        count: usize,
    },

    /// Classification and coordinate sequences differ in length.
    #[error("got {classifications} classifications for {coordinates} sample coordinates")]
    SampleCountMismatch {
        /// Length of the classification sequence.
        classifications: usize,
        /// Length of the coordinate sequence.
        coordinates: usize,
    },
}

/// Serde-compatible proxy for `MeasureError`.
///
/// `image::ImageError` does not implement serde, so the `ImageDecode`
/// variant stores its `Display` string instead.
#[derive(Serialize, Deserialize)]
enum MeasureErrorProxy {
    ImageDecode(String),
    EmptyInput,
    InvalidConfig(String),
    OutOfBounds { x: f64, y: f64 },
    DegenerateSegment,
    MalformedBoundarySequence { count: usize },
    SampleCountMismatch {
        classifications: usize,
        coordinates: usize,
    },
}

impl Serialize for MeasureError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match self {
            Self::ImageDecode(e) => MeasureErrorProxy::ImageDecode(e.to_string()),
            Self::ImageDecodeMessage(msg) => MeasureErrorProxy::ImageDecode(msg.clone()),
            Self::EmptyInput => MeasureErrorProxy::EmptyInput,
            Self::InvalidConfig(s) => MeasureErrorProxy::InvalidConfig(s.clone()),
            Self::OutOfBounds { x, y } => MeasureErrorProxy::OutOfBounds { x: *x, y: *y },
            Self::DegenerateSegment => MeasureErrorProxy::DegenerateSegment,
            Self::MalformedBoundarySequence { count } => {
                MeasureErrorProxy::MalformedBoundarySequence { count: *count }
            }
            Self::SampleCountMismatch {
                classifications,
                coordinates,
            } => MeasureErrorProxy::SampleCountMismatch {
                classifications: *classifications,
                coordinates: *coordinates,
            },
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MeasureError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = MeasureErrorProxy::deserialize(deserializer)?;
        Ok(match proxy {
            // The typed image error cannot be rebuilt; keep the message.
            MeasureErrorProxy::ImageDecode(msg) => Self::ImageDecodeMessage(msg),
            MeasureErrorProxy::EmptyInput => Self::EmptyInput,
            MeasureErrorProxy::InvalidConfig(s) => Self::InvalidConfig(s),
            MeasureErrorProxy::OutOfBounds { x, y } => Self::OutOfBounds { x, y },
            MeasureErrorProxy::DegenerateSegment => Self::DegenerateSegment,
            MeasureErrorProxy::MalformedBoundarySequence { count } => {
                Self::MalformedBoundarySequence { count }
            }
            MeasureErrorProxy::SampleCountMismatch {
                classifications,
                coordinates,
            } => Self::SampleCountMismatch {
                classifications,
                coordinates,
            },
        })
    }
}
