//! Two-click measurement session.
//!
//! An interactive front end feeds pointer events into a [`ClickSession`].
//! The first accepted click arms the session with a start point, the
//! second completes the segment, runs [`measure`] once, and returns the
//! session to [`ClickPhase::AwaitingFirst`] whatever the result. A failed
//! measurement therefore never leaves a stale first point behind.
//!
//! ```rust
//! # use darkspan_core::{ClickOutcome, ClickSession, MeasureConfig, Point, PointerEvent};
//! # use image::{Rgb, Rgb32FImage};
//! let image = Rgb32FImage::from_pixel(10, 10, Rgb([1.0, 1.0, 1.0]));
//! let mut session = ClickSession::new(&image, MeasureConfig::default());
//!
//! let first = session.handle(PointerEvent::primary(Point::new(0.0, 5.0)));
//! assert!(matches!(first, ClickOutcome::Armed { .. }));
//!
//! let second = session.handle(PointerEvent::primary(Point::new(9.0, 5.0)));
//! assert!(matches!(second, ClickOutcome::Measured { .. }));
//! ```

use serde::{Deserialize, Serialize};

use crate::measure::{MeasureReport, measure};
use crate::raster::PixelGrid;
use crate::types::{MeasureConfig, MeasureError, Point};

/// Which pointer button produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Usually the left button. The only button that places points.
    Primary,
    /// Usually the right button.
    Secondary,
    /// Usually the wheel button.
    Middle,
}

/// A pointer press in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Position in image coordinates.
    pub position: Point,
    /// Button that was pressed.
    pub button: PointerButton,
    /// `true` while a pan/zoom tool owns the pointer; such presses
    /// navigate the view and never place points.
    pub navigating: bool,
}

impl PointerEvent {
    /// A primary-button press with no navigation tool active.
    #[must_use]
    pub const fn primary(position: Point) -> Self {
        Self {
            position,
            button: PointerButton::Primary,
            navigating: false,
        }
    }
}

/// Why an event did not advance the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Not the primary button.
    NotPrimary,
    /// A navigation tool was active.
    Navigating,
    /// The press landed outside the image.
    OutsideImage,
}

/// Where the session is in the two-click protocol.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickPhase {
    /// No point placed yet.
    #[default]
    AwaitingFirst,
    /// First point placed; the next click completes the segment.
    AwaitingSecond {
        /// The armed start point.
        first: Point,
    },
}

impl ClickPhase {
    /// Place a point.
    ///
    /// Returns the next phase and, when this click completes a segment,
    /// the `(from, to)` pair to measure.
    #[must_use]
    pub const fn advance(self, point: Point) -> (Self, Option<(Point, Point)>) {
        match self {
            Self::AwaitingFirst => (Self::AwaitingSecond { first: point }, None),
            Self::AwaitingSecond { first } => (Self::AwaitingFirst, Some((first, point))),
        }
    }
}

/// Result of feeding one event to a [`ClickSession`].
#[derive(Debug)]
pub enum ClickOutcome {
    /// The event was filtered out; the phase is unchanged.
    Ignored(IgnoreReason),
    /// The first point was placed.
    Armed {
        /// The armed start point.
        first: Point,
    },
    /// The second point was placed and a measurement ran.
    Measured {
        /// Segment start.
        from: Point,
        /// Segment end.
        to: Point,
        /// Outcome of [`measure`].
        result: Result<MeasureReport, MeasureError>,
    },
}

/// Click-driven measurement over one image.
///
/// Borrows the image for its whole lifetime and owns the configuration
/// and the click phase. No other state survives between measurements.
#[derive(Debug)]
pub struct ClickSession<'a, G: PixelGrid + ?Sized> {
    image: &'a G,
    config: MeasureConfig,
    phase: ClickPhase,
}

impl<'a, G: PixelGrid + ?Sized> ClickSession<'a, G> {
    /// Start a session awaiting its first click.
    #[must_use]
    pub fn new(image: &'a G, config: MeasureConfig) -> Self {
        Self {
            image,
            config,
            phase: ClickPhase::AwaitingFirst,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ClickPhase {
        self.phase
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Forget an armed first point.
    pub fn reset(&mut self) {
        self.phase = ClickPhase::AwaitingFirst;
    }

    /// Feed one pointer event.
    pub fn handle(&mut self, event: PointerEvent) -> ClickOutcome {
        if let Some(reason) = self.reject(&event) {
            log::trace!("ignoring pointer event: {reason:?}");
            return ClickOutcome::Ignored(reason);
        }

        let (next, segment) = self.phase.advance(event.position);
        self.phase = next;

        match segment {
            None => ClickOutcome::Armed {
                first: event.position,
            },
            Some((from, to)) => {
                let result = measure(self.image, from, to, &self.config);
                if let Err(ref e) = result {
                    log::warn!("measurement failed: {e}");
                }
                ClickOutcome::Measured { from, to, result }
            }
        }
    }

    fn reject(&self, event: &PointerEvent) -> Option<IgnoreReason> {
        if event.button != PointerButton::Primary {
            Some(IgnoreReason::NotPrimary)
        } else if event.navigating {
            Some(IgnoreReason::Navigating)
        } else if !self.image.dimensions().contains(event.position) {
            Some(IgnoreReason::OutsideImage)
        } else {
            None
        }
    }
}
