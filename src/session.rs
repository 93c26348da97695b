use crate::geometry::Coord;
use crate::gesture::{classify, StrokeKind};
use crate::history::StrokeHistory;
use crate::stroke::{Stroke, StrokeRecorder};
use crate::timer::SessionTimer;
use std::time::SystemTime;

pub const DEFAULT_TARGET_TEXT: &str = "the quick brown fox jumped over the lazy dog";

/// What happened when a stroke ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// The stroke was written content and is now part of the history.
    Committed,
    /// The stroke was a scribble-erase gesture; this many strokes were
    /// removed and the gesture stroke itself was discarded.
    Erased(usize),
}

/// One writing session on one drawing surface.
///
/// Owns the recorder, the stroke history, and the timer, and serializes all
/// pointer input: events are processed one at a time in the order received,
/// and at most one stroke is in flight. While an evaluation is pending the
/// session is locked and pointer input is dropped, so the snapshot being
/// scored cannot race a history mutation.
#[derive(Debug)]
pub struct DrawingSession {
    recorder: StrokeRecorder,
    history: StrokeHistory,
    timer: SessionTimer,
    target_text: String,
    erasing: bool,
    locked: bool,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_TEXT)
    }
}

impl DrawingSession {
    pub fn new(target_text: impl Into<String>) -> Self {
        Self {
            recorder: StrokeRecorder::new(),
            history: StrokeHistory::new(),
            timer: SessionTimer::new(),
            target_text: target_text.into(),
            erasing: false,
            locked: false,
        }
    }

    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    /// Replaces the sentence the user is asked to reproduce. The text is
    /// read-only to the core while strokes are being written.
    pub fn set_target_text(&mut self, text: impl Into<String>) {
        self.target_text = text.into();
    }

    pub fn committed_strokes(&self) -> &[Stroke] {
        self.history.committed()
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Plain-eraser mode: pointer input wipes pixels on the rendering
    /// surface but is not recorded, classified, or timed.
    pub fn set_erasing(&mut self, erasing: bool) {
        self.erasing = erasing;
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    pub fn pointer_down(&mut self, point: Coord) {
        self.pointer_down_at(point, SystemTime::now());
    }

    pub fn pointer_down_at(&mut self, point: Coord, now: SystemTime) {
        if self.locked || self.erasing {
            return;
        }
        // A fresh stroke invalidates the redo branch before anything else.
        self.history.begin_new_stroke();
        self.timer.on_stroke_begin_at(now);
        self.recorder.begin_at(point, now);
    }

    pub fn pointer_move(&mut self, point: Coord) {
        self.pointer_move_at(point, SystemTime::now());
    }

    pub fn pointer_move_at(&mut self, point: Coord, now: SystemTime) {
        if self.locked || self.erasing {
            return;
        }
        self.recorder.sample_at(point, now);
    }

    pub fn pointer_up(&mut self) -> Option<StrokeOutcome> {
        self.pointer_up_at(SystemTime::now())
    }

    /// Ends the in-flight stroke: classifies it against the committed
    /// history and either commits it or erases what it crossed out.
    pub fn pointer_up_at(&mut self, now: SystemTime) -> Option<StrokeOutcome> {
        if self.locked || self.erasing {
            return None;
        }
        let finished = self.recorder.end()?;
        self.timer.on_stroke_end_at(now);

        let outcome = match classify(&finished, self.history.committed()) {
            StrokeKind::ScribbleErase => {
                let removed = self
                    .history
                    .erase_overlapping(&finished.stroke.bounding_box);
                StrokeOutcome::Erased(removed)
            }
            StrokeKind::Mark => {
                self.history.commit(finished.stroke);
                StrokeOutcome::Committed
            }
        };

        self.sync_timer();
        Some(outcome)
    }

    pub fn undo(&mut self) {
        if self.locked {
            return;
        }
        self.history.undo();
        self.sync_timer();
    }

    pub fn redo(&mut self) {
        if self.locked {
            return;
        }
        self.history.redo();
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Clears the canvas. Returns `true` when the canvas was already blank,
    /// which is the caller's cue to fetch a new target sentence instead.
    pub fn reset(&mut self) -> bool {
        if self.locked {
            return false;
        }
        let was_blank = self.history.is_empty();
        self.history.reset();
        self.sync_timer();
        was_blank
    }

    // The timer resets whenever the committed history drains, whether by
    // reset, undo, or erasing the last remaining stroke.
    fn sync_timer(&mut self) {
        if self.history.is_empty() {
            self.timer.on_history_empty();
        }
    }
}
