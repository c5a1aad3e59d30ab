//! Reader preferences, reading history and annotations.
//!
//! The extractor itself is stateless; a reading front end keeps its state in
//! a [`Preferences`] document persisted through a [`PersistenceStore`].
//! [`JsonFileStore`] keeps it as a pretty-printed JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::result::ExtractionResult;

/// Errors raised by a persistence store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stored document is not valid preferences JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Color scheme of the reading surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Where the reader stopped in a chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingProgress {
    pub title: String,
    /// Character offset of the reading position.
    pub last_position: usize,
    /// Length of the chapter text in characters.
    pub total_length: usize,
    pub last_read: DateTime<Utc>,
}

/// A note attached to a passage of a chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: Uuid,
    /// The annotated passage.
    pub text: String,
    /// The reader's note.
    pub annotation: String,
    /// Character offset of the passage.
    pub position: usize,
    pub created_at: DateTime<Utc>,
}

/// Everything a reader front end persists between sessions.
///
/// Missing fields take their defaults when loading, so older files keep
/// working as fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub font_size: String,
    pub line_height: String,
    pub font_family: String,
    pub theme: Theme,
    /// Keyed by chapter URL.
    pub reading_history: BTreeMap<String, ReadingProgress>,
    /// Keyed by chapter URL.
    pub annotations: BTreeMap<String, Vec<Annotation>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font_size: "16px".to_string(),
            line_height: "1.6".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            theme: Theme::Light,
            reading_history: BTreeMap::new(),
            annotations: BTreeMap::new(),
        }
    }
}

impl Preferences {
    /// Records the reading position in an extracted chapter.
    ///
    /// The sentinel "No content found" result is not recorded.
    pub fn record_progress(&mut self, url: &str, result: &ExtractionResult, position: usize) {
        if result.is_empty() {
            return;
        }
        let total_length = result.content.chars().count();
        self.reading_history.insert(
            url.to_string(),
            ReadingProgress {
                title: result.title.clone(),
                last_position: position.min(total_length),
                total_length,
                last_read: Utc::now(),
            },
        );
    }

    /// Annotations of one chapter, oldest first.
    #[must_use]
    pub fn annotations_for(&self, url: &str) -> &[Annotation] {
        self.annotations.get(url).map_or(&[], Vec::as_slice)
    }

    /// Attaches a note to a passage and returns its id.
    pub fn add_annotation(&mut self, url: &str, text: &str, note: &str, position: usize) -> Uuid {
        let id = Uuid::new_v4();
        self.annotations.entry(url.to_string()).or_default().push(Annotation {
            id,
            text: text.to_string(),
            annotation: note.to_string(),
            position,
            created_at: Utc::now(),
        });
        id
    }

    /// Removes an annotation. Returns whether it existed.
    pub fn delete_annotation(&mut self, url: &str, id: Uuid) -> bool {
        let Some(notes) = self.annotations.get_mut(url) else {
            return false;
        };
        let before = notes.len();
        notes.retain(|a| a.id != id);
        let removed = notes.len() != before;
        if notes.is_empty() {
            self.annotations.remove(url);
        }
        removed
    }
}

/// Loads and saves [`Preferences`].
pub trait PersistenceStore {
    /// Loads the stored preferences; a store that was never written yields
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the stored document cannot be read or parsed.
    fn load(&self) -> Result<Preferences, StoreError>;

    /// Replaces the stored preferences.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the document cannot be written.
    fn save(&self, preferences: &Preferences) -> Result<(), StoreError>;

    /// Like [`PersistenceStore::load`], but logs failures and falls back to
    /// the defaults.
    fn load_or_default(&self) -> Preferences {
        self.load().unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to load preferences, using defaults");
            Preferences::default()
        })
    }
}

/// Preferences kept in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// File name used by [`JsonFileStore::default`].
    pub const DEFAULT_FILE: &'static str = "preferences.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE)
    }
}

impl PersistenceStore for JsonFileStore {
    fn load(&self) -> Result<Preferences, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Preferences::default()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, preferences: &Preferences) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(preferences)?;
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "saved preferences");
        Ok(())
    }
}
