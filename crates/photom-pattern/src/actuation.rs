//! Driving a steering mirror along an ablation path.
//!
//! The engine does not talk to hardware. Callers supply three
//! collaborators:
//!
//! - a [`CoordinateTransform`] mapping pixel coordinates to mirror
//!   coordinates (typically an [`AffineTransform`] from calibration),
//! - a [`MirrorActuator`] that moves the mirror,
//! - a [`Pacer`] that waits between points ([`ThreadPacer`] sleeps the
//!   current thread; tests inject a pacer that only records).
//!
//! [`run_trace`] visits each point in order: transform, move, wait.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Moves the mirror to a target in its own coordinate space.
pub trait MirrorActuator {
    /// Error reported by the device.
    type Error: std::error::Error + 'static;

    /// Move to `target` and return once the command was accepted.
    ///
    /// # Errors
    ///
    /// Implementation-defined device failures.
    fn move_to(&mut self, target: Point) -> Result<(), Self::Error>;
}

/// Maps a pixel-space point into actuator space.
pub trait CoordinateTransform {
    /// Transform one point.
    fn apply(&self, p: Point) -> Point;
}

/// Waits between consecutive mirror moves.
pub trait Pacer {
    /// Block for `delay`.
    fn wait(&mut self, delay: Duration);
}

/// [`Pacer`] backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn wait(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// A 2x3 affine matrix `[[a, b, tx], [c, d, ty]]`.
///
/// `x' = a*x + b*y + tx`, `y' = c*x + d*y + ty`. The default is the
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    /// Row-major matrix.
    pub matrix: [[f64; 3]; 2],
}

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        matrix: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    };

    /// Build from a row-major 2x3 matrix.
    #[must_use]
    pub const fn new(matrix: [[f64; 3]; 2]) -> Self {
        Self { matrix }
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CoordinateTransform for AffineTransform {
    fn apply(&self, p: Point) -> Point {
        let [[a, b, tx], [c, d, ty]] = self.matrix;
        Point::new(
            a.mul_add(p.x, b.mul_add(p.y, tx)),
            c.mul_add(p.x, d.mul_add(p.y, ty)),
        )
    }
}

/// Settings for [`run_trace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Pause after each move.
    pub delay: Duration,
}

impl RunOptions {
    /// Default pause between points, in seconds.
    pub const DEFAULT_DELAY_SECS: f64 = 1.0;

    /// Build options from a delay in seconds, as entered in the UI.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDelay`] if `secs` is negative, NaN, infinite or
    /// too large for a [`Duration`].
    pub fn from_secs(secs: f64) -> Result<Self, InvalidDelay> {
        Duration::try_from_secs_f64(secs)
            .map(|delay| Self { delay })
            .map_err(|_| InvalidDelay(secs))
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
        }
    }
}

/// A delay that is not a finite, non-negative number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("invalid inter-point delay {0} s")]
pub struct InvalidDelay(pub f64);

/// Failure while running a trace.
#[derive(Debug, thiserror::Error)]
pub enum RunError<E: std::error::Error + 'static> {
    /// The delay setting was rejected.
    #[error(transparent)]
    InvalidDelay(#[from] InvalidDelay),

    /// The actuator refused a move; points before `index` were visited.
    #[error("mirror move to point {index} failed")]
    Actuator {
        /// Position of the failing point in the path.
        index: usize,
        /// Device error.
        #[source]
        source: E,
    },
}

/// Visit `points` in order and return the mirror targets that were sent.
///
/// # Errors
///
/// Returns [`RunError::Actuator`] at the first failing move; no later
/// point is attempted.
pub fn run_trace<A, T, P>(
    points: &[Point],
    transform: &T,
    actuator: &mut A,
    pacer: &mut P,
    options: RunOptions,
) -> Result<Vec<Point>, RunError<A::Error>>
where
    A: MirrorActuator,
    T: CoordinateTransform + ?Sized,
    P: Pacer + ?Sized,
{
    tracing::info!(
        points = points.len(),
        delay_secs = options.delay.as_secs_f64(),
        "running trace"
    );
    let mut visited = Vec::with_capacity(points.len());
    for (index, &p) in points.iter().enumerate() {
        let target = transform.apply(p);
        tracing::trace!(index, x = target.x, y = target.y, "mirror move");
        actuator
            .move_to(target)
            .map_err(|source| RunError::Actuator { index, source })?;
        visited.push(target);
        pacer.wait(options.delay);
    }
    Ok(visited)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("mirror offline")]
    struct Offline;

    /// Records every target; fails from `fail_at` onwards.
    #[derive(Default)]
    struct RecordingMirror {
        moves: Vec<Point>,
        fail_at: Option<usize>,
    }

    impl MirrorActuator for RecordingMirror {
        type Error = Offline;

        fn move_to(&mut self, target: Point) -> Result<(), Offline> {
            if self.fail_at == Some(self.moves.len()) {
                return Err(Offline);
            }
            self.moves.push(target);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingPacer {
        waits: Vec<Duration>,
    }

    impl Pacer for CountingPacer {
        fn wait(&mut self, delay: Duration) {
            self.waits.push(delay);
        }
    }

    fn path() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]
    }

    #[test]
    fn identity_is_default() {
        let p = Point::new(3.5, -2.0);
        assert_eq!(AffineTransform::default().apply(p), p);
    }

    #[test]
    fn affine_scales_and_translates() {
        let t = AffineTransform::new([[2.0, 0.0, 1.0], [0.0, 0.5, -3.0]]);
        assert_eq!(t.apply(Point::new(4.0, 8.0)), Point::new(9.0, 1.0));
    }

    #[test]
    fn affine_swaps_axes() {
        let t = AffineTransform::new([[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]);
        assert_eq!(t.apply(Point::new(1.0, 2.0)), Point::new(2.0, 1.0));
    }

    #[test]
    fn delay_validation() {
        assert_eq!(
            RunOptions::from_secs(0.25).unwrap().delay,
            Duration::from_millis(250)
        );
        assert_eq!(RunOptions::from_secs(0.0).unwrap().delay, Duration::ZERO);
        assert!(RunOptions::from_secs(-1.0).is_err());
        assert!(RunOptions::from_secs(f64::NAN).is_err());
        assert!(RunOptions::from_secs(f64::INFINITY).is_err());
        assert_eq!(
            RunOptions::default().delay,
            Duration::from_secs_f64(RunOptions::DEFAULT_DELAY_SECS)
        );
    }

    #[test]
    fn visits_every_point_in_order() {
        let mut mirror = RecordingMirror::default();
        let mut pacer = CountingPacer::default();
        let shift = AffineTransform::new([[1.0, 0.0, 100.0], [0.0, 1.0, 0.0]]);
        let options = RunOptions::from_secs(0.5).unwrap();

        let sent = run_trace(&path(), &shift, &mut mirror, &mut pacer, options).unwrap();

        let expected = vec![
            Point::new(100.0, 0.0),
            Point::new(110.0, 0.0),
            Point::new(110.0, 10.0),
        ];
        assert_eq!(sent, expected);
        assert_eq!(mirror.moves, expected);
        assert_eq!(pacer.waits, vec![Duration::from_millis(500); 3]);
    }

    #[test]
    fn stops_at_first_failure() {
        let mut mirror = RecordingMirror {
            fail_at: Some(1),
            ..RecordingMirror::default()
        };
        let mut pacer = CountingPacer::default();

        let err = run_trace(
            &path(),
            &AffineTransform::IDENTITY,
            &mut mirror,
            &mut pacer,
            RunOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RunError::Actuator { index: 1, .. }));
        assert_eq!(err.to_string(), "mirror move to point 1 failed");
        assert_eq!(mirror.moves.len(), 1);
        assert_eq!(pacer.waits.len(), 1);
    }

    #[test]
    fn invalid_delay_converts_into_run_error() {
        let err: RunError<Offline> = RunOptions::from_secs(-0.5).unwrap_err().into();
        assert_eq!(err.to_string(), "invalid inter-point delay -0.5 s");
    }

    #[test]
    fn empty_path_does_nothing() {
        let mut mirror = RecordingMirror::default();
        let mut pacer = CountingPacer::default();
        let sent = run_trace(
            &[],
            &AffineTransform::IDENTITY,
            &mut mirror,
            &mut pacer,
            RunOptions::default(),
        )
        .unwrap();
        assert!(sent.is_empty());
        assert!(pacer.waits.is_empty());
    }
}
