//! Per-channel twin metadata and storage layout.
//!
//! A twin is one creator persona: its metadata plus its knowledge base,
//! stored under `<data_dir>/twins/<twin_id>/`.

use crate::error::{Result, StemmeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Descriptive attributes of one twin.
///
/// Read-only input to prompt construction; updated only by ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwinMetadata {
    /// Twin identifier (directory name).
    pub id: String,
    /// Creator/channel title, spoken as the persona's name.
    pub title: String,
    /// Persona description used in the system prompt.
    pub description: String,
    /// Channel reference this twin was built from.
    pub channel_url: String,
    /// When the knowledge base was last rebuilt.
    pub trained_at: Option<DateTime<Utc>>,
    /// Passage count at the last rebuild.
    #[serde(default)]
    pub passage_count: usize,
    /// Distinct-video count at the last rebuild.
    #[serde(default)]
    pub video_count: usize,
}

impl TwinMetadata {
    /// Create metadata for a twin that has not been trained yet.
    pub fn new(id: &str, title: &str, description: &str, channel_url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            channel_url: channel_url.to_string(),
            trained_at: None,
            passage_count: 0,
            video_count: 0,
        }
    }
}

/// Filesystem layout for twins.
pub struct TwinStore {
    root: PathBuf,
}

impl TwinStore {
    /// Create a store rooted at the twins directory.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Validate a twin ID for use as a directory name.
    pub fn validate_id(id: &str) -> Result<()> {
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StemmeError::InvalidInput(format!(
                "Invalid twin ID '{}': use only letters, digits, '-' and '_'",
                id
            )));
        }
        Ok(())
    }

    /// Directory for one twin.
    pub fn twin_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Path to a twin's metadata file.
    pub fn metadata_path(&self, id: &str) -> PathBuf {
        self.twin_dir(id).join("metadata.json")
    }

    /// Path to a twin's knowledge base file.
    pub fn knowledge_base_path(&self, id: &str) -> PathBuf {
        self.twin_dir(id).join("knowledge_base.json")
    }

    /// Whether a twin has stored metadata.
    pub fn exists(&self, id: &str) -> bool {
        self.metadata_path(id).exists()
    }

    /// Load a twin's metadata.
    pub fn load(&self, id: &str) -> Result<TwinMetadata> {
        let path = self.metadata_path(id);
        if !path.exists() {
            return Err(StemmeError::InvalidInput(format!(
                "Twin '{}' not found. Run 'stemme ingest' to create it.",
                id
            )));
        }
        let content = std::fs::read_to_string(&path)?;
        let metadata: TwinMetadata = serde_json::from_str(&content)?;
        Ok(metadata)
    }

    /// Save a twin's metadata.
    pub fn save(&self, metadata: &TwinMetadata) -> Result<()> {
        let dir = self.twin_dir(&metadata.id);
        std::fs::create_dir_all(&dir)?;
        let content = serde_json::to_string_pretty(metadata)?;
        std::fs::write(self.metadata_path(&metadata.id), content)?;
        Ok(())
    }

    /// List all stored twins, most recently trained first.
    pub fn list(&self) -> Result<Vec<TwinMetadata>> {
        let mut twins = Vec::new();

        if !self.root.exists() {
            return Ok(twins);
        }

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let id = entry.file_name().to_string_lossy().to_string();
            if let Ok(metadata) = self.load(&id) {
                twins.push(metadata);
            }
        }

        twins.sort_by(|a, b| b.trained_at.cmp(&a.trained_at));
        Ok(twins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(TwinStore::validate_id("my-twin_1").is_ok());
        assert!(TwinStore::validate_id("").is_err());
        assert!(TwinStore::validate_id("../escape").is_err());
        assert!(TwinStore::validate_id("has space").is_err());
    }

    #[test]
    fn test_save_load_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = TwinStore::new(dir.path());

        assert!(store.list().unwrap().is_empty());
        assert!(!store.exists("alpha"));

        let mut alpha = TwinMetadata::new("alpha", "Alpha", "A creator", "https://youtube.com/@alpha");
        alpha.trained_at = Some(Utc::now());
        alpha.passage_count = 12;
        store.save(&alpha).unwrap();

        let beta = TwinMetadata::new("beta", "Beta", "Another creator", "@beta");
        store.save(&beta).unwrap();

        assert!(store.exists("alpha"));
        let loaded = store.load("alpha").unwrap();
        assert_eq!(loaded.title, "Alpha");
        assert_eq!(loaded.passage_count, 12);

        // Trained twin sorts ahead of the untrained one.
        let twins = store.list().unwrap();
        assert_eq!(twins.len(), 2);
        assert_eq!(twins[0].id, "alpha");
    }

    #[test]
    fn test_load_missing_twin() {
        let dir = tempfile::tempdir().unwrap();
        let store = TwinStore::new(dir.path());
        assert!(store.load("ghost").is_err());
    }
}
