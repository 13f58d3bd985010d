//! Measurement: sample a segment, pair its boundaries, convert lengths.
//!
//! [`measure`] is the single entry point a caller needs. It validates the
//! configuration, runs the sampler and the boundary pairer, and converts
//! every closed dark region into a [`RegionLength`] in both pixels and
//! physical units. Nothing is retained between calls.

use serde::{Deserialize, Serialize};

use crate::boundary::{self, BoundaryPair};
use crate::raster::PixelGrid;
use crate::sampler;
use crate::types::{MeasureConfig, MeasureError, OpenRegionPolicy, Point};

/// Length of one dark region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionLength {
    /// Boundary point where the region starts.
    pub start: Point,
    /// Boundary point where the region ends.
    pub end: Point,
    /// Euclidean distance between `start` and `end`, in pixels.
    pub pixel_length: f64,
    /// `pixel_length * unit_scale`.
    pub physical_length: f64,
}

impl RegionLength {
    /// Measure the distance from `start` to `end`.
    #[must_use]
    pub fn between(start: Point, end: Point, unit_scale: f64) -> Self {
        let pixel_length = start.distance(end);
        Self {
            start,
            end,
            pixel_length,
            physical_length: pixel_length * unit_scale,
        }
    }

    fn from_pair(pair: BoundaryPair, unit_scale: f64) -> Self {
        Self::between(pair.start, pair.end, unit_scale)
    }
}

/// The point one sample spacing beyond the final sample.
///
/// A closed region ends at its first not-dark sample, so it spans one step
/// per dark sample. Ending an open region here keeps that count, which makes
/// a band touching `p2` measure the same as when it touches `p1` and the
/// endpoints are swapped.
fn step_past_end(points: &[Point]) -> Option<Point> {
    let [.., prev, last] = points else {
        return None;
    };
    Some(Point::new(
        last.x + (last.x - prev.x),
        last.y + (last.y - prev.y),
    ))
}

/// Closed dark regions found along the segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "regions", rename_all = "snake_case")]
pub enum Measurement {
    /// No closed dark region.
    NotFound,
    /// Exactly one closed dark region.
    Single(RegionLength),
    /// Two or more closed dark regions, in order from `p1` to `p2`.
    Multiple(Vec<RegionLength>),
}

impl Measurement {
    fn from_regions(mut regions: Vec<RegionLength>) -> Self {
        match regions.len() {
            0 => Self::NotFound,
            1 => regions.pop().map_or(Self::NotFound, Self::Single),
            _ => Self::Multiple(regions),
        }
    }

    /// All closed regions regardless of variant.
    #[must_use]
    pub fn regions(&self) -> &[RegionLength] {
        match self {
            Self::NotFound => &[],
            Self::Single(region) => std::slice::from_ref(region),
            Self::Multiple(regions) => regions,
        }
    }

    /// Returns `true` for [`Measurement::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Everything a single measurement produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureReport {
    /// Segment start.
    pub from: Point,
    /// Segment end.
    pub to: Point,
    /// Closed regions.
    pub measurement: Measurement,
    /// Dark region still open at the final sample, measured to one sample
    /// spacing past `to`. Only set under [`OpenRegionPolicy::Report`].
    ///
    /// Under [`OpenRegionPolicy::Drop`] a band touching `to` is discarded
    /// while the same band touching `from` is measured, so swapping the
    /// endpoints only preserves the lengths under `Report`.
    pub open_region: Option<RegionLength>,
    /// Number of samples that were dark.
    pub dark_samples: usize,
    /// Number of samples taken.
    pub sample_count: usize,
}

impl MeasureReport {
    /// All closed regions, in order from `from` to `to`.
    #[must_use]
    pub fn regions(&self) -> &[RegionLength] {
        self.measurement.regions()
    }
}

/// Measure the dark regions crossed by the segment `p1 -> p2`.
///
/// # Errors
///
/// Returns [`MeasureError::InvalidConfig`] if `config` fails
/// [`MeasureConfig::validate`], [`MeasureError::DegenerateSegment`] if
/// the endpoints coincide, and [`MeasureError::OutOfBounds`] if any sample
/// falls outside `image`.
pub fn measure<G: PixelGrid + ?Sized>(
    image: &G,
    p1: Point,
    p2: Point,
    config: &MeasureConfig,
) -> Result<MeasureReport, MeasureError> {
    config.validate()?;

    let samples = sampler::sample(
        image,
        p1,
        p2,
        config.sample_count,
        config.darkness_threshold,
    )?;
    let scan = boundary::find_boundaries(samples.classifications(), samples.points())?;
    let pairs = boundary::pair_boundaries(scan.closed_points())?;

    let open_region = match (scan.open_start(), config.open_region) {
        (None, _) => None,
        (Some(start), OpenRegionPolicy::Drop) => {
            log::debug!(
                "dropping dark region open from ({}, {}) to the end of the segment",
                start.x,
                start.y,
            );
            None
        }
        (Some(start), OpenRegionPolicy::Report) => step_past_end(samples.points())
            .map(|end| RegionLength::between(start, end, config.unit_scale)),
    };

    let regions: Vec<RegionLength> = pairs
        .into_iter()
        .map(|pair| RegionLength::from_pair(pair, config.unit_scale))
        .collect();
    log::debug!(
        "{} boundary points, {} closed regions",
        scan.points().len(),
        regions.len(),
    );

    Ok(MeasureReport {
        from: p1,
        to: p2,
        measurement: Measurement::from_regions(regions),
        open_region,
        dark_samples: samples.dark_count(),
        sample_count: samples.len(),
    })
}
