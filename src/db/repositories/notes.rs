use std::sync::Arc;

use tracing::info;

use crate::db::document_file::{DocumentFile, StoreError};
use crate::models::HomeNote;

/// Repository for the append-only home notes.
pub struct NoteRepository {
    conn: Arc<DocumentFile>,
}

impl NoteRepository {
    pub const fn new(conn: Arc<DocumentFile>) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Vec<HomeNote> {
        self.conn.read(|d| d.home_notes.clone()).await
    }

    /// Appends a note and returns every note. Ids grow monotonically since
    /// notes are never deleted.
    pub async fn append(&self, text: &str) -> Result<Vec<HomeNote>, StoreError> {
        self.conn
            .mutate(|d| {
                let id = d.home_notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
                d.home_notes.push(HomeNote {
                    id,
                    text: text.to_string(),
                });
                info!(id, "Home note added");
                Ok(d.home_notes.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_assigns_next_id_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Arc::new(DocumentFile::open(dir.path().join("db.json")).await.unwrap());
        let repo = NoteRepository::new(conn);

        repo.append("first").await.unwrap();
        let notes = repo.append("second").await.unwrap();

        let ids: Vec<u64> = notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(notes.last().unwrap().text, "second");
    }
}
