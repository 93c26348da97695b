use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;

static WORDS_DIR: Dir = include_dir!("src/words");

pub const MIN_SENTENCE_LENGTH: usize = 1;
pub const MAX_SENTENCE_LENGTH: usize = 100;

/// Which kind of target sentence to generate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum SentenceKind {
    /// A run of random words from the embedded word bank.
    Words,
    /// A quote fetched from the configured quote source.
    Quotes,
}

/// Clamps a requested word count into the supported range. Invalid input is
/// never rejected, just clamped.
pub fn clamp_sentence_length(length: usize) -> usize {
    length.clamp(MIN_SENTENCE_LENGTH, MAX_SENTENCE_LENGTH)
}

/// An embedded list of words to build practice sentences from.
#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct WordBank {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordBank {
    pub fn common() -> Self {
        read_bank_from_file("common.json").unwrap()
    }

    /// `length` random words joined by single spaces, with `length` clamped
    /// to `[MIN_SENTENCE_LENGTH, MAX_SENTENCE_LENGTH]`.
    pub fn random_sentence(&self, length: usize) -> String {
        let length = clamp_sentence_length(length);
        let rng = &mut rand::thread_rng();
        (0..length)
            .map(|_| {
                self.words
                    .choose(rng)
                    .map(String::as_str)
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn read_bank_from_file(file_name: &str) -> Result<WordBank, Box<dyn Error>> {
    let file = WORDS_DIR
        .get_file(file_name)
        .expect("Word bank file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret file as a string");

    let bank = from_str(file_as_str).expect("Unable to deserialize word bank json");

    Ok(bank)
}

/// External supplier of quotes (typically a remote service).
pub trait QuoteSource {
    fn random_quote(&self) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// Produces target sentences from the word bank or a quote source.
pub struct SentenceSource {
    bank: WordBank,
    quotes: Option<Box<dyn QuoteSource>>,
}

impl Default for SentenceSource {
    fn default() -> Self {
        Self::new(WordBank::common())
    }
}

impl SentenceSource {
    pub fn new(bank: WordBank) -> Self {
        Self { bank, quotes: None }
    }

    pub fn with_quotes(mut self, quotes: Box<dyn QuoteSource>) -> Self {
        self.quotes = Some(quotes);
        self
    }

    pub fn generate(
        &self,
        kind: SentenceKind,
        length: usize,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        match kind {
            SentenceKind::Words => Ok(self.bank.random_sentence(length)),
            SentenceKind::Quotes => match &self.quotes {
                Some(source) => source.random_quote(),
                None => Err("no quote source configured".into()),
            },
        }
    }

    /// Like [`generate`](Self::generate), but a failing quote fetch keeps
    /// the prior sentence instead of surfacing the error.
    pub fn refresh(&self, kind: SentenceKind, length: usize, prior: &str) -> String {
        self.generate(kind, length)
            .unwrap_or_else(|_| prior.to_string())
    }
}
