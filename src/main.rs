use clap::Parser;
use scrawl::config::{ConfigStore, FileConfigStore};
use scrawl::evaluate::{log_result, TextExtraction, TextExtractor};
use scrawl::sentence::{SentenceKind, SentenceSource};
use scrawl::stats::ResultsDb;
use scrawl::stroke::Stroke;
use scrawl::{Coord, DrawingSession, Evaluator, StrokeOutcome, StrokeRenderer};
use serde::Deserialize;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// headless handwriting scorer: replay a recorded pointer trace and score it
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Replays a recorded pointer trace through the stroke capture and gesture \
classification engine, then scores the writing session for speed, accuracy, and legibility. \
Useful for tuning the scribble-erase thresholds offline."
)]
struct Cli {
    /// recorded pointer trace to replay (json array of timestamped events)
    #[clap(short = 'r', long)]
    replay: Option<PathBuf>,

    /// transcription standing in for the text-extraction service
    #[clap(short = 't', long, default_value = "")]
    transcription: String,

    /// legibility score standing in for the text-extraction service
    #[clap(long, default_value_t = 100.0)]
    legibility: f64,

    /// number of words in a generated target sentence
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// kind of target sentence to generate
    #[clap(short = 'k', long, value_enum, default_value_t = SentenceKind::Words)]
    sentence_kind: SentenceKind,

    /// explicit target sentence to copy
    #[clap(short = 'p', long)]
    sentence: Option<String>,

    /// append the result to the csv log and the history database
    #[clap(long)]
    save: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum EventKind {
    Down,
    Move,
    Up,
}

/// One pointer event in a replay file, `ms` relative to the trace start.
#[derive(Debug, Clone, Copy, Deserialize)]
struct ReplayEvent {
    ms: u64,
    kind: EventKind,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

/// Stands in for the OCR service with a fixed transcription.
struct StaticExtractor {
    text: String,
    legibility: f64,
}

impl TextExtractor for StaticExtractor {
    fn extract(
        &self,
        _image: &[u8],
        _expected_text: &str,
    ) -> Result<TextExtraction, Box<dyn Error + Send + Sync>> {
        Ok(TextExtraction {
            text: self.text.clone(),
            legibility: self.legibility,
        })
    }
}

/// Headless snapshot: the stroke list itself, JSON-encoded.
struct JsonSnapshotRenderer;

impl StrokeRenderer for JsonSnapshotRenderer {
    fn snapshot(&self, strokes: &[Stroke]) -> Option<Vec<u8>> {
        serde_json::to_vec(strokes).ok()
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn pick_target(cli: &Cli) -> String {
    if let Some(sentence) = &cli.sentence {
        return sentence.clone();
    }

    let config = FileConfigStore::new().load();
    if let Some(sentence) = &config.custom_sentence {
        return sentence.clone();
    }

    let length = cli.number_of_words.unwrap_or(config.number_of_words);
    SentenceSource::default().refresh(cli.sentence_kind, length, scrawl::DEFAULT_TARGET_TEXT)
}

fn replay(session: &mut DrawingSession, events: &[ReplayEvent]) {
    let base = SystemTime::now();
    for event in events {
        let at = base + Duration::from_millis(event.ms);
        match event.kind {
            EventKind::Down => session.pointer_down_at(Coord::new(event.x, event.y), at),
            EventKind::Move => session.pointer_move_at(Coord::new(event.x, event.y), at),
            EventKind::Up => {
                match session.pointer_up_at(at) {
                    Some(StrokeOutcome::Committed) => {
                        println!("stroke at {}ms: committed", event.ms);
                    }
                    Some(StrokeOutcome::Erased(n)) => {
                        println!("stroke at {}ms: scribble erase, removed {n}", event.ms);
                    }
                    None => {}
                };
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let target = pick_target(&cli);
    println!("target: {target}");

    let Some(replay_path) = &cli.replay else {
        // Sentence preview mode; nothing to replay.
        return Ok(());
    };

    let raw = std::fs::read_to_string(replay_path)?;
    let events: Vec<ReplayEvent> = serde_json::from_str(&raw)?;

    let mut session = DrawingSession::new(target);
    replay(&mut session, &events);
    println!("committed strokes: {}", session.committed_strokes().len());

    let evaluator = Evaluator::new(
        Box::new(JsonSnapshotRenderer),
        Arc::new(StaticExtractor {
            text: cli.transcription.clone(),
            legibility: cli.legibility,
        }),
        levenshtein,
    );

    match evaluator.evaluate(&mut session)? {
        Some(result) => {
            println!("transcribed: {}", result.transcribed_text);
            println!("wpm: {:.2}", result.wpm);
            println!("accuracy: {:.2}%", result.accuracy_percent);
            println!("legibility: {:.0}%", result.legibility_percent);

            if cli.save {
                log_result(&result)?;
                ResultsDb::new()?.record_result(&result)?;
            }
        }
        None => println!("nothing to evaluate: no finished writing session"),
    }

    Ok(())
}
