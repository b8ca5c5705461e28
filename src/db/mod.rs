use std::path::Path;
use std::sync::Arc;

use crate::domain::{EntryId, MediaKind, Section};
use crate::models::{CatalogDocument, CatalogEntry, HomeNote, TopListItem};

pub mod document_file;
pub mod repositories;

pub use document_file::{DocumentFile, StoreError};
pub use repositories::entries::Removal;

/// Handle to the catalog document. Cheap to clone; all clones share the same
/// in-memory document and write lock.
#[derive(Clone)]
pub struct Store {
    pub conn: Arc<DocumentFile>,
}

impl Store {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = DocumentFile::open(path.as_ref()).await?;
        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    fn entry_repo(&self) -> repositories::entries::EntryRepository {
        repositories::entries::EntryRepository::new(self.conn.clone())
    }

    fn section_repo(&self) -> repositories::sections::SectionRepository {
        repositories::sections::SectionRepository::new(self.conn.clone())
    }

    fn top_list_repo(&self) -> repositories::top_lists::TopListRepository {
        repositories::top_lists::TopListRepository::new(self.conn.clone())
    }

    fn note_repo(&self) -> repositories::notes::NoteRepository {
        repositories::notes::NoteRepository::new(self.conn.clone())
    }

    /// Full copy of the current document.
    pub async fn snapshot(&self) -> CatalogDocument {
        self.conn.read(|d| d.clone()).await
    }

    // ========================================================================
    // Entries
    // ========================================================================

    pub async fn list_entries<E: CatalogEntry>(&self) -> Vec<E> {
        self.entry_repo().list().await
    }

    pub async fn get_entry<E: CatalogEntry>(&self, id: &EntryId) -> Option<E> {
        self.entry_repo().get(id).await
    }

    pub async fn cover_referenced<E: CatalogEntry>(&self, cover: &str) -> bool {
        self.entry_repo().references_cover::<E>(cover).await
    }

    pub async fn insert_entry<E: CatalogEntry>(&self, entry: E) -> Result<E, StoreError> {
        self.entry_repo().insert(entry).await
    }

    pub async fn update_entry<E, F>(&self, id: &EntryId, update: F) -> Result<E, StoreError>
    where
        E: CatalogEntry,
        F: FnOnce(&mut E) + Send,
    {
        self.entry_repo().update(id, update).await
    }

    pub async fn remove_entry<E: CatalogEntry>(
        &self,
        id: &EntryId,
    ) -> Result<Removal<E>, StoreError> {
        self.entry_repo().remove(id).await
    }

    // ========================================================================
    // Year sections
    // ========================================================================

    pub async fn visible_sections<E: CatalogEntry>(&self) -> Vec<String> {
        self.section_repo().visible::<E>().await
    }

    pub async fn grouped_sections<E: CatalogEntry>(&self) -> Vec<Section<E>> {
        self.section_repo().grouped::<E>().await
    }

    pub async fn declare_section(
        &self,
        kind: MediaKind,
        label: &str,
    ) -> Result<Vec<String>, StoreError> {
        self.section_repo().declare(kind, label).await
    }

    pub async fn remove_section<E: CatalogEntry>(
        &self,
        label: &str,
    ) -> Result<Removal<E>, StoreError> {
        self.section_repo().remove_with_entries(label).await
    }

    // ========================================================================
    // Top lists & notes
    // ========================================================================

    pub async fn top_list(&self, kind: MediaKind) -> Vec<TopListItem> {
        self.top_list_repo().get(kind).await
    }

    pub async fn replace_top_list(
        &self,
        kind: MediaKind,
        items: Vec<TopListItem>,
    ) -> Result<Vec<TopListItem>, StoreError> {
        self.top_list_repo().replace(kind, items).await
    }

    pub async fn home_notes(&self) -> Vec<HomeNote> {
        self.note_repo().list().await
    }

    pub async fn append_home_note(&self, text: &str) -> Result<Vec<HomeNote>, StoreError> {
        self.note_repo().append(text).await
    }
}
