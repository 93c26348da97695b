use crate::sentence::clamp_sentence_length;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MIN_TOOL_SIZE: u8 = 1;
const MAX_TOOL_SIZE: u8 = 20;

/// Persisted user settings for the copy trainer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub number_of_words: usize,
    pub sentence_kind: String,
    pub pencil_size: u8,
    pub eraser_size: u8,
    pub custom_sentence: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_of_words: 5,
            sentence_kind: "words".to_string(),
            pencil_size: 2,
            eraser_size: 2,
            custom_sentence: None,
        }
    }
}

impl Config {
    /// Clamps every numeric field into its supported range. Out-of-range
    /// values in a hand-edited config file are corrected, never rejected.
    pub fn normalized(mut self) -> Self {
        self.number_of_words = clamp_sentence_length(self.number_of_words);
        self.pencil_size = self.pencil_size.clamp(MIN_TOOL_SIZE, MAX_TOOL_SIZE);
        self.eraser_size = self.eraser_size.clamp(MIN_TOOL_SIZE, MAX_TOOL_SIZE);
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "scrawl") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("scrawl_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg.normalized();
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
