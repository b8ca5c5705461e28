use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::constants::posters::{FILE_EXTENSION, PUBLIC_PREFIX};
use crate::domain::MediaKind;

/// Local cache of cover images.
///
/// Files live at `<posters_dir>/<kind>/<key>.jpg` and are referenced from
/// entries as `/posters/<kind>/<key>.jpg`.
///
/// Keys are shared between entries with the same metadata id, so writing a
/// file and committing the entry that points at it, as well as checking and
/// unlinking an orphan, happen while holding [`ImageService::gate`].
pub struct ImageService {
    posters_dir: PathBuf,
    client: reqwest::Client,
    gate: Mutex<()>,
}

impl ImageService {
    #[must_use]
    pub fn new(posters_dir: impl Into<PathBuf>, client: reqwest::Client) -> Self {
        Self {
            posters_dir: posters_dir.into(),
            client,
            gate: Mutex::new(()),
        }
    }

    /// Serializes poster file changes against catalog commits.
    pub async fn gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    /// Fetches the image at `url`. Touches nothing on disk.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        info!(url = %url, "Downloading poster");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("Poster download returned {}", response.status());
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Writes `bytes` under `key` and returns the public reference. Callers
    /// hold the gate.
    ///
    /// `key` should be the metadata id so repeated adds of the same title
    /// reuse one file.
    pub async fn write_poster(&self, kind: MediaKind, key: &str, bytes: &[u8]) -> Result<String> {
        let kind_dir = self.posters_dir.join(kind.as_str());
        fs::create_dir_all(&kind_dir)
            .await
            .with_context(|| format!("Failed to create {}", kind_dir.display()))?;

        let filename = format!("{key}.{FILE_EXTENSION}");
        let file_path = kind_dir.join(&filename);

        fs::write(&file_path, bytes)
            .await
            .with_context(|| format!("Failed to write poster to {}", file_path.display()))?;

        Ok(format!("{PUBLIC_PREFIX}/{}/{filename}", kind.as_str()))
    }

    /// Maps a public reference back to a file inside the posters directory.
    /// Remote URLs and anything escaping the directory map to `None`.
    fn local_path(&self, reference: &str) -> Option<PathBuf> {
        let relative = reference.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
        if relative.is_empty() || relative.split('/').any(|part| part.is_empty() || part == "..") {
            return None;
        }
        Some(self.posters_dir.join(relative))
    }

    /// Deletes a cached poster and its directory once empty. Remote URLs and
    /// already missing files are ignored. Callers hold the gate.
    pub async fn release_poster(&self, reference: &str) {
        let Some(path) = self.local_path(reference) else {
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => info!(path = %path.display(), "Poster released"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to delete poster");
                return;
            }
        }

        if let Some(dir) = path.parent()
            && dir != self.posters_dir
        {
            // Only succeeds when the directory is empty.
            let _ = fs::remove_dir(dir).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_rejects_remote_and_traversal() {
        let service = ImageService::new("/srv/posters", reqwest::Client::new());
        assert_eq!(
            service.local_path("/posters/anime/1.jpg"),
            Some(PathBuf::from("/srv/posters/anime/1.jpg"))
        );
        assert_eq!(service.local_path("https://cdn.example/1.jpg"), None);
        assert_eq!(service.local_path("/posters/../db.json"), None);
        assert_eq!(service.local_path("/posters/"), None);
    }

    #[tokio::test]
    async fn release_deletes_file_and_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let anime_dir = dir.path().join("anime");
        std::fs::create_dir_all(&anime_dir).unwrap();
        std::fs::write(anime_dir.join("7.jpg"), b"img").unwrap();

        let service = ImageService::new(dir.path(), reqwest::Client::new());
        service.release_poster("/posters/anime/7.jpg").await;

        assert!(!anime_dir.join("7.jpg").exists());
        assert!(!anime_dir.exists());
        assert!(dir.path().exists());
    }

    #[tokio::test]
    async fn written_poster_maps_back_to_its_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = ImageService::new(dir.path(), reqwest::Client::new());

        let reference = service
            .write_poster(MediaKind::Manga, "13", b"jpeg")
            .await
            .unwrap();
        assert_eq!(reference, "/posters/manga/13.jpg");
        let path = service.local_path(&reference).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn release_ignores_missing_and_remote() {
        let dir = tempfile::tempdir().unwrap();
        let service = ImageService::new(dir.path(), reqwest::Client::new());
        service.release_poster("/posters/manga/404.jpg").await;
        service.release_poster("https://cdn.example/1.jpg").await;
    }
}
