//! Boundary pairer: find where the classification flips and pair the flips.
//!
//! A scan walks the classification sequence with a two-state machine
//! ([`RegionPhase`]). Entering a dark run records the sample as a region
//! start; leaving it records the first not-dark sample as the region end.
//! The recorded points therefore alternate start, end, start, end, ...
//!
//! If the last sample is still dark the scan ends in
//! [`RegionPhase::ExpectingEnd`] and the final region start has no partner.
//! [`BoundaryScan::open_start`] exposes that point so the caller can decide
//! whether to drop or report it; [`pair_boundaries`] itself only accepts
//! even-length sequences.

use serde::{Deserialize, Serialize};

use crate::types::{MeasureError, Point};

/// State of the boundary scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegionPhase {
    /// Outside a dark region, waiting for the first dark sample.
    #[default]
    ExpectingStart,
    /// Inside a dark region, waiting for the first not-dark sample.
    ExpectingEnd,
}

impl RegionPhase {
    /// Advance by one sample.
    ///
    /// Returns the next phase and whether the sample is a boundary point.
    ///
    /// | phase            | sample   | next             | boundary |
    /// |------------------|----------|------------------|----------|
    /// | `ExpectingStart` | dark     | `ExpectingEnd`   | yes      |
    /// | `ExpectingStart` | not dark | `ExpectingStart` | no       |
    /// | `ExpectingEnd`   | not dark | `ExpectingStart` | yes      |
    /// | `ExpectingEnd`   | dark     | `ExpectingEnd`   | no       |
    #[must_use]
    pub const fn step(self, dark: bool) -> (Self, bool) {
        match (self, dark) {
            (Self::ExpectingStart, true) => (Self::ExpectingEnd, true),
            (Self::ExpectingEnd, false) => (Self::ExpectingStart, true),
            (phase, _) => (phase, false),
        }
    }
}

/// Result of scanning one classification sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryScan {
    points: Vec<Point>,
    terminal: RegionPhase,
}

impl BoundaryScan {
    /// All recorded boundary points in encounter order.
    ///
    /// Odd in length exactly when the scan ended inside a dark region.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Phase after the last sample.
    #[must_use]
    pub const fn terminal_phase(&self) -> RegionPhase {
        self.terminal
    }

    /// Start of the trailing region that never closed, if any.
    #[must_use]
    pub fn open_start(&self) -> Option<Point> {
        match self.terminal {
            RegionPhase::ExpectingEnd => self.points.last().copied(),
            RegionPhase::ExpectingStart => None,
        }
    }

    /// Boundary points of closed regions only (the open start removed).
    #[must_use]
    pub fn closed_points(&self) -> &[Point] {
        match self.terminal {
            RegionPhase::ExpectingEnd => &self.points[..self.points.len() - 1],
            RegionPhase::ExpectingStart => &self.points,
        }
    }
}

/// Scan `classifications` and record the coordinate of every flip.
///
/// `sample_coords[i]` must be the coordinate of `classifications[i]`.
///
/// # Errors
///
/// Returns [`MeasureError::SampleCountMismatch`] if the two sequences
/// differ in length.
pub fn find_boundaries(
    classifications: &[bool],
    sample_coords: &[Point],
) -> Result<BoundaryScan, MeasureError> {
    if classifications.len() != sample_coords.len() {
        return Err(MeasureError::SampleCountMismatch {
            classifications: classifications.len(),
            coordinates: sample_coords.len(),
        });
    }

    let mut phase = RegionPhase::default();
    let mut points = Vec::new();
    for (&dark, &coord) in classifications.iter().zip(sample_coords) {
        let (next, boundary) = phase.step(dark);
        if boundary {
            points.push(coord);
        }
        phase = next;
    }

    Ok(BoundaryScan {
        points,
        terminal: phase,
    })
}

/// Two boundary points enclosing one dark region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPair {
    /// First dark sample of the region.
    pub start: Point,
    /// First not-dark sample after the region.
    pub end: Point,
}

impl BoundaryPair {
    /// Euclidean distance between start and end, in pixels.
    #[must_use]
    pub fn pixel_length(self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Pair consecutive boundary points: (0, 1), (2, 3), ...
///
/// # Errors
///
/// Returns [`MeasureError::MalformedBoundarySequence`] if `points` has an
/// odd length.
pub fn pair_boundaries(points: &[Point]) -> Result<Vec<BoundaryPair>, MeasureError> {
    if points.len() % 2 != 0 {
        return Err(MeasureError::MalformedBoundarySequence {
            count: points.len(),
        });
    }
    Ok(points
        .chunks_exact(2)
        .map(|pair| BoundaryPair {
            start: pair[0],
            end: pair[1],
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Coordinates `(i, 0)` for `n` samples.
    #[allow(clippy::cast_precision_loss)]
    fn coords(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, 0.0)).collect()
    }

    /// Classification that is dark exactly on `lo..=hi`.
    fn dark_run(n: usize, lo: usize, hi: usize) -> Vec<bool> {
        (0..n).map(|i| (lo..=hi).contains(&i)).collect()
    }

    #[test]
    fn transition_table() {
        use RegionPhase::{ExpectingEnd, ExpectingStart};
        assert_eq!(ExpectingStart.step(true), (ExpectingEnd, true));
        assert_eq!(ExpectingStart.step(false), (ExpectingStart, false));
        assert_eq!(ExpectingEnd.step(false), (ExpectingStart, true));
        assert_eq!(ExpectingEnd.step(true), (ExpectingEnd, false));
        assert_eq!(RegionPhase::default(), ExpectingStart);
    }

    #[test]
    fn no_dark_samples_no_boundaries() {
        let scan = find_boundaries(&[false; 8], &coords(8)).unwrap();
        assert!(scan.points().is_empty());
        assert_eq!(scan.terminal_phase(), RegionPhase::ExpectingStart);
        assert_eq!(scan.open_start(), None);
    }

    #[test]
    fn interior_run_records_lo_and_hi_plus_one() {
        let n = 20;
        for (lo, hi) in [(0, 0), (3, 7), (5, 5), (0, 18), (10, 18)] {
            let scan = find_boundaries(&dark_run(n, lo, hi), &coords(n)).unwrap();
            #[allow(clippy::cast_precision_loss)]
            let expected = vec![Point::new(lo as f64, 0.0), Point::new((hi + 1) as f64, 0.0)];
            assert_eq!(scan.points(), expected.as_slice(), "run {lo}..={hi}");
            assert_eq!(scan.open_start(), None);
        }
    }

    #[test]
    fn run_to_last_sample_records_only_start() {
        let n = 12;
        for lo in [0, 4, 11] {
            let scan = find_boundaries(&dark_run(n, lo, n - 1), &coords(n)).unwrap();
            #[allow(clippy::cast_precision_loss)]
            let start = Point::new(lo as f64, 0.0);
            assert_eq!(scan.points(), &[start]);
            assert_eq!(scan.terminal_phase(), RegionPhase::ExpectingEnd);
            assert_eq!(scan.open_start(), Some(start));
            assert!(scan.closed_points().is_empty());
        }
    }

    #[test]
    fn several_runs_alternate_start_end() {
        let dark = [
            false, true, true, false, false, true, false, true, true, true, false,
        ];
        let scan = find_boundaries(&dark, &coords(dark.len())).unwrap();
        let xs: Vec<f64> = scan.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 5.0, 6.0, 7.0, 10.0]);
        assert_eq!(scan.closed_points().len(), 6);
    }

    #[test]
    fn closed_points_strip_only_the_open_start() {
        let dark = [true, false, false, true, true];
        let scan = find_boundaries(&dark, &coords(5)).unwrap();
        assert_eq!(scan.points().len(), 3);
        assert_eq!(
            scan.closed_points(),
            &[Point::new(0.0, 0.0), Point::new(1.0, 0.0)]
        );
        assert_eq!(scan.open_start(), Some(Point::new(3.0, 0.0)));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = find_boundaries(&[true, false], &coords(3)).unwrap_err();
        assert!(matches!(
            err,
            MeasureError::SampleCountMismatch {
                classifications: 2,
                coordinates: 3
            }
        ));
    }

    #[test]
    fn pairs_are_consecutive_and_non_overlapping() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 2.5),
        ];
        let pairs = pair_boundaries(&pts).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!((pairs[0].pixel_length() - 5.0).abs() < f64::EPSILON);
        assert!((pairs[1].pixel_length() - 2.5).abs() < f64::EPSILON);
        assert_eq!(pairs[1].start, Point::new(10.0, 0.0));
    }

    #[test]
    fn empty_sequence_pairs_to_nothing() {
        assert!(pair_boundaries(&[]).unwrap().is_empty());
    }

    #[test]
    fn odd_sequence_is_malformed() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        assert!(matches!(
            pair_boundaries(&pts),
            Err(MeasureError::MalformedBoundarySequence { count: 3 })
        ));
    }
}
