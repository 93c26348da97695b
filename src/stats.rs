use crate::evaluate::EvaluationResult;
use chrono::{DateTime, Local};
use directories::ProjectDirs;
use rusqlite::{params, Connection, Result};
use std::path::PathBuf;

/// One stored evaluation outcome.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub timestamp: DateTime<Local>,
    pub target_words: usize,
    pub elapsed_secs: f64,
    pub wpm: f64,
    pub accuracy: f64,
    pub legibility: f64,
}

/// Aggregate view over the stored history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultsSummary {
    pub sessions: i64,
    pub avg_wpm: f64,
    pub avg_accuracy: f64,
    pub avg_legibility: f64,
}

/// Database manager for the evaluation-result history
#[derive(Debug)]
pub struct ResultsDb {
    conn: Connection,
}

impl ResultsDb {
    /// Initialize the database connection and create tables if needed
    pub fn new() -> Result<Self> {
        let db_path = Self::get_db_path().unwrap_or_else(|| PathBuf::from("scrawl_results.db"));
        Self::with_path(&db_path)
    }

    /// Open (or create) the history database at an explicit path.
    pub fn with_path(db_path: &std::path::Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS evaluation_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                target_words INTEGER NOT NULL,
                elapsed_secs REAL NOT NULL,
                wpm REAL NOT NULL,
                accuracy REAL NOT NULL,
                legibility REAL NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_evaluation_results_timestamp ON evaluation_results(timestamp)",
            [],
        )?;

        Ok(ResultsDb { conn })
    }

    /// Get the database file path under $HOME/.local/state/scrawl
    fn get_db_path() -> Option<PathBuf> {
        // Try to use the XDG-compliant ~/.local/state directory first
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("scrawl");
            Some(state_dir.join("results.db"))
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "scrawl") {
            // Fallback to system-specific directory
            let state_dir = proj_dirs.data_local_dir();
            Some(state_dir.join("results.db"))
        } else {
            None
        }
    }

    /// Record one finished evaluation
    pub fn record_result(&self, result: &EvaluationResult) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO evaluation_results
            (timestamp, target_words, elapsed_secs, wpm, accuracy, legibility)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                Local::now().to_rfc3339(),
                result.target_word_count as i64,
                result.elapsed_secs,
                result.wpm,
                result.accuracy_percent,
                result.legibility_percent,
            ],
        )?;

        Ok(())
    }

    /// Most recent results, newest first
    pub fn recent_results(&self, limit: usize) -> Result<Vec<ResultRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT timestamp, target_words, elapsed_secs, wpm, accuracy, legibility
            FROM evaluation_results
            ORDER BY timestamp DESC
            LIMIT ?1
            "#,
        )?;

        let row_iter = stmt.query_map([limit as i64], |row| {
            let timestamp_str: String = row.get(0)?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        0,
                        "timestamp".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(ResultRow {
                timestamp,
                target_words: row.get::<_, i64>(1)? as usize,
                elapsed_secs: row.get(2)?,
                wpm: row.get(3)?,
                accuracy: row.get(4)?,
                legibility: row.get(5)?,
            })
        })?;

        let mut rows = Vec::new();
        for row in row_iter {
            rows.push(row?);
        }

        Ok(rows)
    }

    /// Averages over the whole stored history; `None` while empty
    pub fn summary(&self) -> Result<Option<ResultsSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                COUNT(*) as sessions,
                AVG(wpm) as avg_wpm,
                AVG(accuracy) as avg_accuracy,
                AVG(legibility) as avg_legibility
            FROM evaluation_results
            "#,
        )?;

        let (sessions, avg_wpm, avg_accuracy, avg_legibility): (
            i64,
            Option<f64>,
            Option<f64>,
            Option<f64>,
        ) = stmt.query_row([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?;

        if sessions == 0 {
            Ok(None)
        } else {
            Ok(Some(ResultsSummary {
                sessions,
                avg_wpm: avg_wpm.unwrap_or(0.0),
                avg_accuracy: avg_accuracy.unwrap_or(0.0),
                avg_legibility: avg_legibility.unwrap_or(0.0),
            }))
        }
    }

    /// Clear all stored results (for testing or reset purposes)
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM evaluation_results", [])?;
        Ok(())
    }
}
