use std::sync::Arc;

use tracing::info;

use crate::db::document_file::{DocumentFile, StoreError};
use crate::domain::EntryId;
use crate::models::{CatalogDocument, CatalogEntry};

/// Entries taken out of the catalog, plus the cover references no remaining
/// entry of the same kind points at any more.
#[derive(Debug)]
pub struct Removal<E> {
    pub removed: Vec<E>,
    pub orphaned_covers: Vec<String>,
}

impl<E> Removal<E> {
    const fn empty() -> Self {
        Self {
            removed: Vec::new(),
            orphaned_covers: Vec::new(),
        }
    }
}

/// Removes every entry matching `predicate` from the document.
pub(crate) fn remove_where<E, P>(document: &mut CatalogDocument, predicate: P) -> Removal<E>
where
    E: CatalogEntry,
    P: Fn(&E) -> bool,
{
    let collection = E::collection_mut(document);
    if !collection.iter().any(&predicate) {
        return Removal::empty();
    }

    let (removed, kept): (Vec<E>, Vec<E>) = std::mem::take(collection)
        .into_iter()
        .partition(|e| predicate(e));
    *collection = kept;

    let mut orphaned_covers: Vec<String> = removed
        .iter()
        .filter_map(|e| e.cover_image())
        .filter(|cover| !collection.iter().any(|e| e.cover_image() == Some(*cover)))
        .map(str::to_string)
        .collect();
    orphaned_covers.sort();
    orphaned_covers.dedup();

    Removal {
        removed,
        orphaned_covers,
    }
}

/// Repository for anime and manga entries.
pub struct EntryRepository {
    conn: Arc<DocumentFile>,
}

impl EntryRepository {
    pub const fn new(conn: Arc<DocumentFile>) -> Self {
        Self { conn }
    }

    pub async fn list<E: CatalogEntry>(&self) -> Vec<E> {
        self.conn.read(|d| E::collection(d).clone()).await
    }

    pub async fn get<E: CatalogEntry>(&self, id: &EntryId) -> Option<E> {
        self.conn
            .read(|d| E::collection(d).iter().find(|e| e.id() == id).cloned())
            .await
    }

    /// Whether any entry of kind `E` points at `cover`.
    pub async fn references_cover<E: CatalogEntry>(&self, cover: &str) -> bool {
        self.conn
            .read(|d| E::collection(d).iter().any(|e| e.cover_image() == Some(cover)))
            .await
    }

    pub async fn insert<E: CatalogEntry>(&self, entry: E) -> Result<E, StoreError> {
        let inserted = self
            .conn
            .mutate(move |d| {
                E::collection_mut(d).push(entry.clone());
                Ok(entry)
            })
            .await?;

        info!(kind = %E::KIND, id = %inserted.id(), "Entry added");
        Ok(inserted)
    }

    /// Applies `update` to the entry with `id` and returns the result.
    pub async fn update<E, F>(&self, id: &EntryId, update: F) -> Result<E, StoreError>
    where
        E: CatalogEntry,
        F: FnOnce(&mut E) + Send,
    {
        self.conn
            .mutate(|d| {
                let entry = E::collection_mut(d)
                    .iter_mut()
                    .find(|e| e.id() == id)
                    .ok_or_else(|| StoreError::NotFound {
                        kind: E::KIND,
                        id: id.clone(),
                    })?;
                update(entry);
                Ok(entry.clone())
            })
            .await
    }

    /// Removes the entry with `id`. Removing an unknown id is not an error.
    pub async fn remove<E: CatalogEntry>(&self, id: &EntryId) -> Result<Removal<E>, StoreError> {
        let removal = self
            .conn
            .mutate(|d| Ok(remove_where::<E, _>(d, |e| e.id() == id)))
            .await?;

        if removal.removed.is_empty() {
            info!(kind = %E::KIND, id = %id, "Entry already absent");
        } else {
            info!(kind = %E::KIND, id = %id, "Entry removed");
        }
        Ok(removal)
    }
}
