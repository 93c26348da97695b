use crate::geometry::BoundingBox;
use crate::gesture::OVERLAP_THRESHOLD;
use crate::stroke::Stroke;

/// Canonical store of committed strokes plus the undo/redo stacks.
///
/// Rendering is a derived projection of `committed()`; the history never
/// reaches back into a rendering surface. A stroke lives in at most one of
/// the two stacks at any time.
#[derive(Debug, Default)]
pub struct StrokeHistory {
    committed: Vec<Stroke>,
    undone: Vec<Stroke>,
}

impl StrokeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn commit(&mut self, stroke: Stroke) {
        self.committed.push(stroke);
    }

    /// Removes every committed stroke mostly covered by `erase_box` and
    /// returns how many were removed. Unlike undo, erased strokes are gone
    /// for good: they do not land on the redo stack.
    pub fn erase_overlapping(&mut self, erase_box: &BoundingBox) -> usize {
        let before = self.committed.len();
        self.committed
            .retain(|s| s.bounding_box.overlap_ratio(erase_box) <= OVERLAP_THRESHOLD);
        before - self.committed.len()
    }

    /// Moves the most recent committed stroke onto the redo stack. No-op
    /// when nothing is committed.
    pub fn undo(&mut self) {
        if let Some(stroke) = self.committed.pop() {
            self.undone.push(stroke);
        }
    }

    /// Moves the most recently undone stroke back. No-op when the redo
    /// stack is empty.
    pub fn redo(&mut self) {
        if let Some(stroke) = self.undone.pop() {
            self.committed.push(stroke);
        }
    }

    /// Starting a fresh stroke invalidates the redo branch.
    pub fn begin_new_stroke(&mut self) {
        self.undone.clear();
    }

    pub fn reset(&mut self) {
        self.committed.clear();
        self.undone.clear();
    }
}
