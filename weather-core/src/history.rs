//! Locations the user picked, most recent last.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::project_dirs;
use crate::model::Location;

/// Entries kept on disk.
pub const MAX_ENTRIES: usize = 50;

/// Chosen locations with their coordinates, so picking an entry again
/// fetches the same place without another geocoding round trip.
#[derive(Debug, Clone, Default)]
pub struct SearchHistory {
    entries: Vec<Location>,
    path: Option<PathBuf>,
}

impl SearchHistory {
    /// In-memory history that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from the platform data directory.
    pub fn load() -> Result<Self> {
        let path = Self::history_file_path()?;
        Self::load_from(path)
    }

    /// Load from `path`; a missing file gives an empty history bound to it.
    /// Entries are de-duplicated and capped the same way `push` does.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let stored: Vec<Location> = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read history file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse history file: {}", path.display()))?
        } else {
            Vec::new()
        };

        let mut history = Self {
            entries: Vec::with_capacity(stored.len().min(MAX_ENTRIES)),
            path: Some(path),
        };
        for location in &stored {
            history.push(location);
        }
        Ok(history)
    }

    pub fn history_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join("history.json"))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a location. Returns `false` if its label was already known or
    /// is blank.
    pub fn push(&mut self, location: &Location) -> bool {
        let label = location.label();
        if label.trim().is_empty() || self.entries.iter().any(|e| e.label() == label) {
            return false;
        }
        self.entries.push(location.clone());
        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..excess);
        }
        true
    }

    /// Up to `n` entries, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Location> {
        self.entries.iter().rev().take(n)
    }

    /// Case-insensitive substring match on labels, newest first.
    pub fn matching<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a Location> + 'a {
        let needle = needle.trim().to_lowercase();
        self.entries
            .iter()
            .rev()
            .filter(move |e| !needle.is_empty() && e.label().to_lowercase().contains(&needle))
    }

    /// Write the history if it is bound to a file.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string(&self.entries).context("Failed to serialize search history")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write history file: {}", path.display()))?;

        Ok(())
    }
}
