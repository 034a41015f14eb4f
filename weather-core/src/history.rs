//! Deduplicated, user-editable list of searched cities.
//!
//! Every operation reads the whole snapshot and mutations write the whole
//! snapshot back. There is no locking: two interleaved mutations race and
//! the later write wins.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::{error::HistoryError, model::HistoryEntry};

/// Durable storage for the full history snapshot.
#[async_trait]
pub trait HistoryMedium: Send + Sync {
    async fn read(&self) -> Result<Vec<HistoryEntry>, HistoryError>;

    /// Replaces the stored snapshot with `entries`.
    async fn write(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError>;
}

/// History stored as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileMedium {
    path: PathBuf,
}

impl JsonFileMedium {
    /// Opens `path`, seeding it with an empty list if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let medium = Self { path: path.into() };

        if !tokio::fs::try_exists(&medium.path)
            .await
            .map_err(|e| medium.io_error(HistoryError::Read, e))?
        {
            if let Some(parent) = medium.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| HistoryError::Write(format!("{}: {e}", parent.display())))?;
            }
            tracing::info!(path = %medium.path.display(), "creating empty search history");
            medium.write(&[]).await?;
        }

        Ok(medium)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, kind: fn(String) -> HistoryError, err: impl std::fmt::Display) -> HistoryError {
        kind(format!("{}: {err}", self.path.display()))
    }

    /// Sibling path unique to one write, so concurrent writers never share it.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl HistoryMedium for JsonFileMedium {
    async fn read(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.io_error(HistoryError::Read, e))?;

        serde_json::from_slice(&bytes).map_err(|e| self.io_error(HistoryError::Read, e))
    }

    async fn write(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let json = serde_json::to_vec(entries).map_err(|e| self.io_error(HistoryError::Write, e))?;

        // Write beside the target and rename, so readers never see a torn file.
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| self.io_error(HistoryError::Write, e))?;
        if let Err(err) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(self.io_error(HistoryError::Write, err));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStore<M> {
    medium: M,
}

impl<M: HistoryMedium> HistoryStore<M> {
    pub fn new(medium: M) -> Self {
        Self { medium }
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// All entries in insertion order.
    pub async fn list(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        self.medium.read().await
    }

    /// Appends `name` with a fresh id unless an entry with exactly that
    /// name already exists.
    pub async fn add_if_absent(&self, name: &str) -> Result<(), HistoryError> {
        let mut entries = self.medium.read().await?;

        if entries.iter().any(|e| e.name == name) {
            tracing::debug!(name, "city already in history");
            return Ok(());
        }

        let entry = HistoryEntry { name: name.to_string(), id: Uuid::new_v4().to_string() };
        tracing::info!(name, id = %entry.id, "adding city to history");
        entries.push(entry);

        self.medium.write(&entries).await
    }

    /// Removes the first entry with `id`. Unknown ids are not an error.
    pub async fn remove(&self, id: &str) -> Result<(), HistoryError> {
        let mut entries = self.medium.read().await?;

        let Some(idx) = entries.iter().position(|e| e.id == id) else {
            tracing::debug!(id, "no history entry to remove");
            return Ok(());
        };

        let removed = entries.remove(idx);
        tracing::info!(name = %removed.name, id, "removed city from history");

        self.medium.write(&entries).await
    }
}
