//! The JSON file backing the catalog.
//!
//! The document lives in memory behind a mutex. Every mutation runs on a copy
//! under the lock, the copy is written to `<file>.tmp` and renamed over the
//! catalog, and only then replaces the in-memory document. A failed write
//! therefore leaves both the file and memory as they were.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::{EntryId, MediaKind};
use crate::models::CatalogDocument;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} entry {id} not found")]
    NotFound { kind: MediaKind, id: EntryId },

    #[error("Failed to write catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode catalog: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct DocumentFile {
    path: PathBuf,
    document: Mutex<CatalogDocument>,
}

impl DocumentFile {
    /// Loads the catalog at `path`.
    ///
    /// A missing file is created with the seeded document. An unreadable or
    /// corrupt file is copied aside to `<file>.corrupt` and replaced in memory
    /// by an empty document.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<CatalogDocument>(&bytes) {
                Ok(document) => {
                    info!(
                        path = %path.display(),
                        anime = document.anime.len(),
                        manga = document.manga.len(),
                        "Catalog loaded"
                    );
                    let skipped = skipped_entries(&bytes, &document);
                    if skipped > 0 {
                        warn!(path = %path.display(), skipped, "Catalog had unreadable entries");
                        Self::set_aside(&path).await;
                    }
                    document
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Catalog is corrupt, starting empty");
                    Self::set_aside(&path).await;
                    CatalogDocument::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No catalog found, creating one");
                let document = CatalogDocument::seeded();
                write_atomically(&path, &document).await?;
                document
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Catalog unreadable, starting empty");
                CatalogDocument::default()
            }
        };

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    async fn set_aside(path: &Path) {
        let backup = sibling(path, "corrupt");
        if let Err(e) = tokio::fs::copy(path, &backup).await {
            error!(backup = %backup.display(), error = %e, "Failed to back up corrupt catalog");
        } else {
            warn!(backup = %backup.display(), "Corrupt catalog backed up");
        }
    }

    /// Runs `f` against the current document.
    pub async fn read<R>(&self, f: impl FnOnce(&CatalogDocument) -> R) -> R {
        let guard = self.document.lock().await;
        f(&guard)
    }

    /// Runs `f` against a working copy and persists it if anything changed.
    ///
    /// The lock is held until the write completes, so mutations are applied
    /// one at a time in arrival order.
    pub async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut CatalogDocument) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut guard = self.document.lock().await;
        let mut working = guard.clone();

        let result = f(&mut working)?;

        if working == *guard {
            debug!("Mutation left catalog unchanged, skipping write");
            return Ok(result);
        }

        write_atomically(&self.path, &working).await?;
        *guard = working;
        metrics::counter!("catalog_writes_total").increment(1);

        Ok(result)
    }
}

/// Entries present in the raw file that did not survive parsing.
fn skipped_entries(bytes: &[u8], document: &CatalogDocument) -> usize {
    let Ok(raw) = serde_json::from_slice::<serde_json::Value>(bytes) else {
        return 0;
    };
    let stored = |key: &str| raw.get(key).and_then(|v| v.as_array()).map_or(0, Vec::len);
    (stored("anime") + stored("manga"))
        .saturating_sub(document.anime.len() + document.manga.len())
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

async fn write_atomically(path: &Path, document: &CatalogDocument) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let bytes = serde_json::to_vec_pretty(document)?;
    let tmp = sibling(path, "tmp");

    tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;

    Ok(())
}
