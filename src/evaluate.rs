use crate::session::DrawingSession;
use crate::stroke::Stroke;
use chrono::prelude::*;
use directories::ProjectDirs;
use std::error::Error;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Keeps the WPM division defined for near-instant sessions.
const ELAPSED_MINUTES_EPSILON: f64 = 1e-4;

/// Transcription returned by the text-extraction service.
#[derive(Debug, Clone, PartialEq)]
pub struct TextExtraction {
    pub text: String,
    /// Readability score in `[0, 100]`.
    pub legibility: f64,
}

/// External OCR-style service: image in, transcription plus legibility out.
pub trait TextExtractor: Send + Sync {
    fn extract(
        &self,
        image: &[u8],
        expected_text: &str,
    ) -> Result<TextExtraction, Box<dyn Error + Send + Sync>>;
}

/// Produces an encoded snapshot image of the committed strokes. `None`
/// means the surface is not ready, which skips the evaluation.
pub trait StrokeRenderer {
    fn snapshot(&self, strokes: &[Stroke]) -> Option<Vec<u8>>;
}

/// External string metric: `(a, b) -> edit distance` (Levenshtein or
/// equivalent).
pub type EditDistanceFn = fn(&str, &str) -> usize;

/// Scores for one finished writing session.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub transcribed_text: String,
    pub wpm: f64,
    pub accuracy_percent: f64,
    pub legibility_percent: f64,
    pub elapsed_secs: f64,
    pub target_word_count: usize,
}

#[derive(Debug)]
pub enum EvaluationError {
    /// The extraction service did not answer within the configured timeout,
    /// even after the retry.
    TimedOut,
    /// The extraction service answered with an error.
    Extraction(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut => write!(f, "text extraction timed out"),
            Self::Extraction(err) => write!(f, "text extraction failed: {err}"),
        }
    }
}

impl Error for EvaluationError {}

/// Timeout and retry policy for the external extraction call.
#[derive(Debug, Clone, Copy)]
pub struct EvaluateOptions {
    pub timeout: Duration,
    pub retry_backoff: Duration,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Orchestrates a finished session into an [`EvaluationResult`]:
/// snapshot the committed strokes, transcribe them through the extraction
/// service, then derive WPM and accuracy against the target sentence.
pub struct Evaluator {
    renderer: Box<dyn StrokeRenderer>,
    extractor: Arc<dyn TextExtractor>,
    distance: EditDistanceFn,
    options: EvaluateOptions,
}

impl Evaluator {
    pub fn new(
        renderer: Box<dyn StrokeRenderer>,
        extractor: Arc<dyn TextExtractor>,
        distance: EditDistanceFn,
    ) -> Self {
        Self {
            renderer,
            extractor,
            distance,
            options: EvaluateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvaluateOptions) -> Self {
        self.options = options;
        self
    }

    /// Evaluates the session's committed strokes.
    ///
    /// Returns `Ok(None)` without calling the extraction service when there
    /// is nothing to score yet: no committed strokes, an unset timer, or an
    /// unready rendering surface. On extraction failure the session's
    /// strokes and timing are untouched, so the caller may retry without
    /// redrawing.
    pub fn evaluate(
        &self,
        session: &mut DrawingSession,
    ) -> Result<Option<EvaluationResult>, EvaluationError> {
        if session.committed_strokes().is_empty() {
            return Ok(None);
        }
        let Some(elapsed_minutes) = session.timer().elapsed_minutes() else {
            return Ok(None);
        };
        let Some(image) = self.renderer.snapshot(session.committed_strokes()) else {
            return Ok(None);
        };

        // No stroke input while the snapshot is being scored.
        session.set_locked(true);
        let extracted = self.extract_with_retry(&image, session.target_text());
        session.set_locked(false);
        let extracted = extracted?;

        Ok(Some(score(
            session.target_text(),
            &extracted,
            elapsed_minutes,
            self.distance,
        )))
    }

    fn extract_with_retry(
        &self,
        image: &[u8],
        expected_text: &str,
    ) -> Result<TextExtraction, EvaluationError> {
        match self.attempt(image, expected_text) {
            Ok(extraction) => Ok(extraction),
            Err(_) => {
                thread::sleep(self.options.retry_backoff);
                self.attempt(image, expected_text)
            }
        }
    }

    // One bounded call to the extraction service. The service gets its own
    // thread so a hung call cannot wedge the session.
    fn attempt(
        &self,
        image: &[u8],
        expected_text: &str,
    ) -> Result<TextExtraction, EvaluationError> {
        let (tx, rx) = mpsc::channel();
        let extractor = Arc::clone(&self.extractor);
        let image = image.to_vec();
        let expected = expected_text.to_string();

        thread::spawn(move || {
            let _ = tx.send(extractor.extract(&image, &expected));
        });

        match rx.recv_timeout(self.options.timeout) {
            Ok(Ok(extraction)) => Ok(extraction),
            Ok(Err(err)) => Err(EvaluationError::Extraction(err)),
            Err(_) => Err(EvaluationError::TimedOut),
        }
    }
}

/// Pure scoring math, separated from the collaborator plumbing.
fn score(
    target_text: &str,
    extracted: &TextExtraction,
    elapsed_minutes: f64,
    distance: EditDistanceFn,
) -> EvaluationResult {
    let transcribed = extracted.text.trim();
    let minutes = elapsed_minutes + ELAPSED_MINUTES_EPSILON;

    let wpm = word_count(transcribed) as f64 / minutes;

    // The denominator mixes the target's character length with its word
    // count. Kept exactly for score compatibility with earlier releases.
    let denominator = target_text.len().max(word_count(target_text)) as f64;
    let edits = distance(target_text.trim(), transcribed) as f64;
    let accuracy_percent = (1.0 - edits / denominator) * 100.0;

    EvaluationResult {
        transcribed_text: transcribed.to_string(),
        wpm,
        accuracy_percent,
        legibility_percent: extracted.legibility,
        elapsed_secs: elapsed_minutes * 60.0,
        target_word_count: word_count(target_text),
    }
}

// Split on single spaces; an empty string counts as one (empty) word, which
// matches how the scores have always been computed.
fn word_count(text: &str) -> usize {
    text.split(' ').count()
}

/// Appends one CSV line per evaluation to `log.csv` in the config
/// directory.
pub fn log_result(result: &EvaluationResult) -> io::Result<()> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "scrawl") {
        let config_dir = proj_dirs.config_dir();
        let log_path = config_dir.join("log.csv");

        std::fs::create_dir_all(config_dir)?;

        // If the log file doesn't exist yet, we need to emit a header
        let needs_header = !log_path.exists();

        let mut log_file = OpenOptions::new()
            .write(true)
            .append(true)
            .create(true)
            .open(log_path)?;

        if needs_header {
            writeln!(
                log_file,
                "date,target_words,elapsed_secs,wpm,accuracy,legibility"
            )?;
        }

        writeln!(
            log_file,
            "{},{},{:.2},{:.2},{:.2},{:.2}",
            Local::now().format("%c"),
            result.target_word_count,
            result.elapsed_secs,
            result.wpm,
            result.accuracy_percent,
            result.legibility_percent,
        )?;
    }

    Ok(())
}
