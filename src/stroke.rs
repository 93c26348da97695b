use crate::geometry::{turn_angle, BoundingBox, Coord};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Accumulated travel distance required before a turn check runs. Gating on
/// distance instead of checking every sample keeps high-rate pointer noise
/// from registering as sharp turns.
const MIN_TRAVEL_FOR_TURN_CHECK: f64 = 5.0;

/// Scaled-angle threshold above which a sample counts as a sharp turn.
const SHARP_TURN_ANGLE_THRESHOLD: f64 = 0.5;

/// Speed (units per millisecond) at which the speed factor saturates.
const SPEED_NORMALIZER: f64 = 10.0;

/// One continuous pointer-down-to-pointer-up trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub path: Vec<Coord>,
    pub bounding_box: BoundingBox,
}

/// A finished stroke together with the kinematic evidence the gesture
/// classifier needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedStroke {
    pub stroke: Stroke,
    pub turn_count: u32,
}

/// Accumulates pointer samples into an in-progress stroke.
///
/// One recorder per drawing surface; samples must arrive in order, and only
/// one stroke can be in flight at a time.
#[derive(Debug)]
pub struct StrokeRecorder {
    drawing: bool,
    last_position: Coord,
    last_delta: Coord,
    distance_traveled: f64,
    last_sample_at: SystemTime,
    turn_count: u32,
    bounding_box: BoundingBox,
    path: Vec<Coord>,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self {
            drawing: false,
            last_position: Coord::new(0.0, 0.0),
            last_delta: Coord::new(0.0, 0.0),
            distance_traveled: 0.0,
            last_sample_at: SystemTime::now(),
            turn_count: 0,
            bounding_box: BoundingBox::unset(),
            path: Vec::new(),
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn begin(&mut self, point: Coord) {
        self.begin_at(point, SystemTime::now());
    }

    /// Starts a new stroke. No-op if one is already in progress.
    pub fn begin_at(&mut self, point: Coord, now: SystemTime) {
        if self.drawing {
            return;
        }
        self.drawing = true;
        self.last_position = point;
        self.last_delta = point;
        self.distance_traveled = 0.0;
        self.last_sample_at = now;
        self.turn_count = 0;
        self.bounding_box = BoundingBox::unset();
        self.path = Vec::new();
    }

    pub fn sample(&mut self, point: Coord) {
        self.sample_at(point, SystemTime::now());
    }

    /// Feeds one pointer position into the in-progress stroke. No-op when
    /// not drawing.
    ///
    /// Degenerate samples (zero elapsed time, zero-length current or
    /// previous delta) only roll the kinematic state forward; they are not
    /// appended to the path and never contribute a turn, which avoids
    /// division by zero and angle spikes from duplicate or stationary
    /// events.
    pub fn sample_at(&mut self, point: Coord, now: SystemTime) {
        if !self.drawing {
            return;
        }

        let delta = self.last_position.delta_to(point);
        let current_magnitude = delta.magnitude();
        let last_magnitude = self.last_delta.magnitude();

        let elapsed_ms = now
            .duration_since(self.last_sample_at)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        let speed = current_magnitude / elapsed_ms;

        if !speed.is_finite() || current_magnitude == 0.0 || last_magnitude == 0.0 {
            self.last_delta = delta;
            self.last_position = point;
            return;
        }

        self.distance_traveled += current_magnitude;

        if self.distance_traveled > MIN_TRAVEL_FOR_TURN_CHECK {
            // Slow, deliberate handwriting gets scaled down; fast chaotic
            // scribbling keeps the full angle.
            let speed_factor = (speed / SPEED_NORMALIZER).min(1.0);

            if let Some(angle) = turn_angle(self.last_delta, delta) {
                if angle * speed_factor * 10.0 > SHARP_TURN_ANGLE_THRESHOLD {
                    self.turn_count += 1;
                }
            }

            self.distance_traveled = 0.0;
            self.last_sample_at = now;
        }

        self.path.push(point);
        self.bounding_box.include(point);
        self.last_position = point;
        self.last_delta = delta;
    }

    /// Freezes the in-progress stroke and returns it. `None` when no stroke
    /// was being recorded.
    pub fn end(&mut self) -> Option<FinishedStroke> {
        if !self.drawing {
            return None;
        }
        self.drawing = false;
        Some(FinishedStroke {
            stroke: Stroke {
                path: std::mem::take(&mut self.path),
                bounding_box: self.bounding_box,
            },
            turn_count: self.turn_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(base: SystemTime, ms: u64) -> SystemTime {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn test_end_without_begin_is_none() {
        let mut recorder = StrokeRecorder::new();
        assert_eq!(recorder.end(), None);
    }

    #[test]
    fn test_begin_is_noop_while_drawing() {
        let base = SystemTime::now();
        let mut recorder = StrokeRecorder::new();
        recorder.begin_at(Coord::new(10.0, 10.0), base);
        recorder.sample_at(Coord::new(20.0, 20.0), at(base, 10));
        // A second begin must not reset the stroke in flight.
        recorder.begin_at(Coord::new(500.0, 500.0), at(base, 11));

        let finished = recorder.end().unwrap();
        assert_eq!(finished.stroke.path, vec![Coord::new(20.0, 20.0)]);
    }

    #[test]
    fn test_straight_stroke_has_no_turns() {
        let base = SystemTime::now();
        let mut recorder = StrokeRecorder::new();
        // The recorder seeds the previous delta with the begin point, so a
        // begin point collinear with the motion keeps the first turn check
        // quiet (as does drawing slowly; see the slow zigzag test).
        recorder.begin_at(Coord::new(-100.0, 0.0), base);
        for i in 1..=6 {
            recorder.sample_at(Coord::new(-100.0 + i as f64 * 20.0, 0.0), at(base, i));
        }

        let finished = recorder.end().unwrap();
        assert_eq!(finished.turn_count, 0);
        assert_eq!(finished.stroke.path.len(), 6);
    }

    #[test]
    fn test_fast_zigzag_counts_turns() {
        let base = SystemTime::now();
        let mut recorder = StrokeRecorder::new();
        recorder.begin_at(Coord::new(100.0, 100.0), base);
        // Direction reverses on every sample; each segment is long and fast
        // enough to pass both the distance gate and the speed factor.
        let xs = [180.0, 100.0, 180.0, 100.0, 180.0, 100.0];
        for (i, x) in xs.iter().enumerate() {
            recorder.sample_at(Coord::new(*x, 100.0 + i as f64), at(base, i as u64 + 1));
        }

        let finished = recorder.end().unwrap();
        assert!(
            finished.turn_count > 3,
            "expected more than 3 sharp turns, got {}",
            finished.turn_count
        );
    }

    #[test]
    fn test_slow_zigzag_counts_no_turns() {
        let base = SystemTime::now();
        let mut recorder = StrokeRecorder::new();
        recorder.begin_at(Coord::new(100.0, 100.0), base);
        // Same geometry, but seconds between samples: the speed factor
        // suppresses the angle below the threshold.
        let xs = [180.0, 100.0, 180.0, 100.0, 180.0, 100.0];
        for (i, x) in xs.iter().enumerate() {
            recorder.sample_at(
                Coord::new(*x, 100.0 + i as f64),
                at(base, (i as u64 + 1) * 60_000),
            );
        }

        let finished = recorder.end().unwrap();
        assert_eq!(finished.turn_count, 0);
    }

    #[test]
    fn test_duplicate_sample_is_skipped() {
        let base = SystemTime::now();
        let mut recorder = StrokeRecorder::new();
        recorder.begin_at(Coord::new(10.0, 10.0), base);
        recorder.sample_at(Coord::new(30.0, 10.0), at(base, 1));
        // Stationary sample: zero-length delta must not reach the path.
        recorder.sample_at(Coord::new(30.0, 10.0), at(base, 2));
        recorder.sample_at(Coord::new(50.0, 10.0), at(base, 3));

        let finished = recorder.end().unwrap();
        assert_eq!(
            finished.stroke.path,
            vec![Coord::new(30.0, 10.0), Coord::new(50.0, 10.0)]
        );
    }

    #[test]
    fn test_zero_elapsed_sample_is_skipped() {
        let base = SystemTime::now();
        let mut recorder = StrokeRecorder::new();
        recorder.begin_at(Coord::new(10.0, 10.0), base);
        // Same timestamp as begin: infinite instantaneous speed.
        recorder.sample_at(Coord::new(30.0, 10.0), base);

        let finished = recorder.end().unwrap();
        assert!(finished.stroke.path.is_empty());
        assert!(!finished.stroke.bounding_box.is_set());
    }

    #[test]
    fn test_sample_when_idle_is_noop() {
        let mut recorder = StrokeRecorder::new();
        recorder.sample(Coord::new(10.0, 10.0));
        assert!(!recorder.is_drawing());
        assert_eq!(recorder.end(), None);
    }

    #[test]
    fn test_bounding_box_spans_sampled_points() {
        let base = SystemTime::now();
        let mut recorder = StrokeRecorder::new();
        recorder.begin_at(Coord::new(50.0, 50.0), base);
        recorder.sample_at(Coord::new(80.0, 40.0), at(base, 1));
        recorder.sample_at(Coord::new(20.0, 90.0), at(base, 2));

        let finished = recorder.end().unwrap();
        let bb = finished.stroke.bounding_box;
        assert_eq!(bb.start, Coord::new(20.0, 40.0));
        assert_eq!(bb.end, Coord::new(80.0, 90.0));
    }

    #[test]
    fn test_recorder_is_reusable_after_end() {
        let base = SystemTime::now();
        let mut recorder = StrokeRecorder::new();
        recorder.begin_at(Coord::new(10.0, 10.0), base);
        recorder.sample_at(Coord::new(30.0, 10.0), at(base, 1));
        let first = recorder.end().unwrap();

        recorder.begin_at(Coord::new(-200.0, 0.0), at(base, 10));
        recorder.sample_at(Coord::new(-170.0, 0.0), at(base, 11));
        let second = recorder.end().unwrap();

        assert_eq!(first.stroke.path.len(), 1);
        assert_eq!(second.stroke.path, vec![Coord::new(-170.0, 0.0)]);
        assert_eq!(second.turn_count, 0);
    }
}
