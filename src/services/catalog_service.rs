//! Domain service for the personal catalog.
//!
//! Handlers and CLI commands talk to [`CatalogService`] and never touch the
//! store directly, so validation, lookups and poster housekeeping happen in
//! one place.

use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;
use crate::domain::{EntryId, MediaKind, Section};
use crate::models::{
    AnimeEntry, AnimePatch, CatalogDocument, HomeNote, MangaEntry, MangaPatch, NewAnime, NewManga,
    TopListItem,
};
use crate::services::metadata::MetadataMatch;

/// Domain errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{kind} entry {id} not found")]
    NotFound { kind: MediaKind, id: EntryId },

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::Persistence(other.to_string()),
        }
    }
}

/// Everything the home page shows in one payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub notes: Vec<HomeNote>,
    pub top_anime: Vec<TopListItem>,
    pub top_manga: Vec<TopListItem>,
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_anime(&self) -> Vec<AnimeEntry>;

    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no anime has this id.
    async fn get_anime(&self, id: &EntryId) -> Result<AnimeEntry, CatalogError>;

    /// Adds an anime, enriching it from the metadata service when a match
    /// exists. Lookup and poster failures never fail the add.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::Validation`] if the title is blank
    /// - Returns [`CatalogError::Persistence`] if the catalog cannot be written
    async fn add_anime(&self, input: NewAnime) -> Result<AnimeEntry, CatalogError>;

    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if no anime has this id
    /// - Returns [`CatalogError::Validation`] if the patch blanks the title
    /// - Returns [`CatalogError::Persistence`] if the catalog cannot be written
    async fn patch_anime(&self, id: &EntryId, patch: AnimePatch)
    -> Result<AnimeEntry, CatalogError>;

    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if no anime has this id
    /// - Returns [`CatalogError::Persistence`] if the catalog cannot be written
    async fn toggle_anime_finished(&self, id: &EntryId) -> Result<AnimeEntry, CatalogError>;

    /// Removes an anime. Unknown ids succeed without changes.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] if the catalog cannot be written.
    async fn delete_anime(&self, id: &EntryId) -> Result<(), CatalogError>;

    async fn list_manga(&self) -> Vec<MangaEntry>;

    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no manga has this id.
    async fn get_manga(&self, id: &EntryId) -> Result<MangaEntry, CatalogError>;

    /// # Errors
    ///
    /// - Returns [`CatalogError::Validation`] if the title is blank
    /// - Returns [`CatalogError::Persistence`] if the catalog cannot be written
    async fn add_manga(&self, input: NewManga) -> Result<MangaEntry, CatalogError>;

    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if no manga has this id
    /// - Returns [`CatalogError::Validation`] if the patch blanks the title
    /// - Returns [`CatalogError::Persistence`] if the catalog cannot be written
    async fn patch_manga(&self, id: &EntryId, patch: MangaPatch)
    -> Result<MangaEntry, CatalogError>;

    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if no manga has this id
    /// - Returns [`CatalogError::Persistence`] if the catalog cannot be written
    async fn toggle_manga_finished(&self, id: &EntryId) -> Result<MangaEntry, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] if the catalog cannot be written.
    async fn delete_manga(&self, id: &EntryId) -> Result<(), CatalogError>;

    /// Declared labels plus every label in use, newest first, with the
    /// fallback label last.
    async fn list_sections(&self, kind: MediaKind) -> Vec<String>;

    async fn grouped_anime(&self) -> Vec<Section<AnimeEntry>>;

    async fn grouped_manga(&self) -> Vec<Section<MangaEntry>>;

    /// Declares a section and returns the declared labels.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::Validation`] if the label is blank
    /// - Returns [`CatalogError::Persistence`] if the catalog cannot be written
    async fn declare_section(&self, kind: MediaKind, label: &str)
    -> Result<Vec<String>, CatalogError>;

    /// Deletes a section together with every entry of `kind` in it and
    /// returns how many entries were removed.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::Validation`] if the label is blank
    /// - Returns [`CatalogError::Persistence`] if the catalog cannot be written
    async fn delete_section(&self, kind: MediaKind, label: &str) -> Result<usize, CatalogError>;

    async fn top_list(&self, kind: MediaKind) -> Vec<TopListItem>;

    /// Replaces a top list, keeping the first ten items.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] if the catalog cannot be written.
    async fn set_top_list(
        &self,
        kind: MediaKind,
        items: Vec<TopListItem>,
    ) -> Result<Vec<TopListItem>, CatalogError>;

    async fn home(&self) -> HomeView;

    /// Appends a note and returns all notes.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::Validation`] if the text is blank
    /// - Returns [`CatalogError::Persistence`] if the catalog cannot be written
    async fn add_home_note(&self, text: &str) -> Result<Vec<HomeNote>, CatalogError>;

    async fn document(&self) -> CatalogDocument;

    /// Candidates from the metadata service. Failures yield an empty list.
    async fn search_remote(&self, kind: MediaKind, query: &str) -> Vec<MetadataMatch>;
}

/// Trims `title` and rejects it when nothing is left.
///
/// # Errors
///
/// Returns [`CatalogError::Validation`] for blank titles.
pub fn validate_title(title: &str) -> Result<&str, CatalogError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CatalogError::Validation("Title is required".to_string()));
    }
    Ok(title)
}

/// Trims a section label and rejects blank ones.
///
/// # Errors
///
/// Returns [`CatalogError::Validation`] for blank labels.
pub fn validate_label(label: &str) -> Result<&str, CatalogError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(CatalogError::Validation(
            "Year section label is required".to_string(),
        ));
    }
    Ok(label)
}

/// # Errors
///
/// Returns [`CatalogError::Validation`] for blank notes.
pub fn validate_note(text: &str) -> Result<&str, CatalogError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CatalogError::Validation("Note text is required".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validators_trim_and_reject_blank() {
        assert_eq!(validate_title("  Frieren ").unwrap(), "Frieren");
        assert!(matches!(
            validate_title("   "),
            Err(CatalogError::Validation(_))
        ));
        assert_eq!(validate_label(" 2024 ").unwrap(), "2024");
        assert!(validate_label("").is_err());
        assert!(validate_note("\n\t").is_err());
    }

    #[test]
    fn store_not_found_keeps_its_shape() {
        let err = CatalogError::from(StoreError::NotFound {
            kind: MediaKind::Manga,
            id: EntryId::from("abc"),
        });
        assert!(matches!(
            err,
            CatalogError::NotFound {
                kind: MediaKind::Manga,
                ..
            }
        ));
        assert_eq!(err.to_string(), "manga entry abc not found");
    }
}
