use crate::stroke::{FinishedStroke, Stroke};

/// More sharp turns than this (together with spatial overlap) marks a
/// stroke as a scribble-erase gesture.
pub const SHARP_TURN_LIMIT: u32 = 3;

/// Overlap ratio above which two strokes are considered "mostly covered".
///
/// Measured against each existing stroke's own area: the question is how
/// much of that stroke sits underneath the new one.
pub const OVERLAP_THRESHOLD: f64 = 0.5;

/// What an ended stroke turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeKind {
    /// Written content; gets committed to the history.
    Mark,
    /// A crossing-out gesture; erases the strokes underneath it and is
    /// itself discarded.
    ScribbleErase,
}

/// Counts committed strokes that are mostly covered by `finished`'s box.
pub fn overlapping_strokes(finished: &FinishedStroke, committed: &[Stroke]) -> usize {
    committed
        .iter()
        .filter(|s| {
            s.bounding_box
                .overlap_ratio(&finished.stroke.bounding_box)
                > OVERLAP_THRESHOLD
        })
        .count()
}

/// Classifies a just-ended stroke from its turn count and its overlap with
/// the committed history. A chaotic stroke over blank canvas is still a
/// mark; only chaos on top of existing writing erases.
pub fn classify(finished: &FinishedStroke, committed: &[Stroke]) -> StrokeKind {
    if finished.turn_count > SHARP_TURN_LIMIT && overlapping_strokes(finished, committed) > 0 {
        StrokeKind::ScribbleErase
    } else {
        StrokeKind::Mark
    }
}
