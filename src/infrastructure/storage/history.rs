use crate::domain::error::AppError;
use crate::domain::model::TranslationOutcome;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};

pub const HISTORY_LIMIT: usize = 10;

/// Render one plain-text history entry.
pub fn format_entry(outcome: &TranslationOutcome, at: DateTime<Utc>) -> String {
    let output = match (&outcome.translation, &outcome.error) {
        (Some(text), _) => format!("Output: {}", text),
        (None, Some(err)) => format!("Error: {}", err),
        (None, None) => "Output: ".to_string(),
    };
    format!(
        "[{}] {}→ru\nInput: {}\n{}",
        at.to_rfc3339_opts(SecondsFormat::Secs, true),
        outcome.source_lang,
        outcome.input,
        output
    )
}

/// Newest-first list of past translations, capped at [`HISTORY_LIMIT`].
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> Result<Vec<String>, AppError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "History file is corrupt, starting over");
                Ok(Vec::new())
            }
        }
    }

    pub fn append(&self, entry: String) -> Result<(), AppError> {
        let mut entries = self.entries()?;
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }

    pub fn record(&self, outcome: &TranslationOutcome) -> Result<(), AppError> {
        self.append(format_entry(outcome, Utc::now()))
    }
}
