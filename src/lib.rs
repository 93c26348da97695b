// Library surface for the stroke capture, gesture-classification, and
// scoring engine. Rendering, dialogs, OCR, and edit distance stay behind
// the collaborator seams in `evaluate` and `sentence`.
pub mod config;
pub mod evaluate;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod sentence;
pub mod session;
pub mod stats;
pub mod stroke;
pub mod timer;

pub use evaluate::{
    EvaluateOptions, EvaluationError, EvaluationResult, Evaluator, StrokeRenderer, TextExtraction,
    TextExtractor,
};
pub use geometry::{BoundingBox, Coord};
pub use session::{DrawingSession, StrokeOutcome, DEFAULT_TARGET_TEXT};
pub use stroke::{Stroke, StrokeRecorder};
