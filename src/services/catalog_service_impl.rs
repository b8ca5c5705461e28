//! [`CatalogService`] backed by the JSON document store.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::Store;
use crate::domain::{EntryId, MediaKind, Section};
use crate::models::{
    AnimeEntry, AnimePatch, CatalogDocument, CatalogEntry, EntryPatch, HomeNote, MangaEntry,
    MangaPatch, NewAnime, NewManga, TopListItem,
};
use crate::services::ImageService;
use crate::services::catalog_service::{
    CatalogError, CatalogService, HomeView, validate_label, validate_note, validate_title,
};
use crate::services::metadata::{MetadataMatch, MetadataProvider};

pub struct DocumentCatalogService {
    store: Store,
    metadata: Arc<dyn MetadataProvider>,
    images: Arc<ImageService>,
    config: Arc<RwLock<Config>>,
}

/// What a successful lookup contributes to a new entry.
struct Enrichment {
    title: String,
    mal_id: Option<i32>,
    cover: Option<Cover>,
    year: Option<i32>,
}

/// A cover found by the lookup, not yet written to the poster cache.
enum Cover {
    Remote(String),
    Fetched {
        url: String,
        key: String,
        bytes: Vec<u8>,
    },
}

fn record_mutation(kind: MediaKind, op: &'static str) {
    metrics::counter!("catalog_mutations_total", "kind" => kind.as_str(), "op" => op).increment(1);
}

impl DocumentCatalogService {
    #[must_use]
    pub fn new(
        store: Store,
        metadata: Arc<dyn MetadataProvider>,
        images: Arc<ImageService>,
        config: Arc<RwLock<Config>>,
    ) -> Self {
        Self {
            store,
            metadata,
            images,
            config,
        }
    }

    /// Looks `title` up and fetches the cover when configured. Every failure
    /// along the way degrades: no match keeps the user's title, a failed
    /// download keeps the remote URL.
    async fn enrich(&self, kind: MediaKind, title: &str) -> Enrichment {
        let Some(found) = self.metadata.lookup_or_none(kind, title).await else {
            return Enrichment {
                title: title.to_string(),
                mal_id: None,
                cover: None,
                year: None,
            };
        };

        let cover = self.fetch_cover(&found).await;
        let MetadataMatch {
            mal_id,
            title: matched_title,
            year,
            ..
        } = found;

        Enrichment {
            title: if matched_title.trim().is_empty() {
                title.to_string()
            } else {
                matched_title
            },
            mal_id,
            cover,
            year,
        }
    }

    async fn fetch_cover(&self, found: &MetadataMatch) -> Option<Cover> {
        let url = found.image_url.as_deref()?;
        if !self.config.read().await.metadata.cache_posters {
            return Some(Cover::Remote(url.to_string()));
        }

        match self.images.download(url).await {
            Ok(bytes) => Some(Cover::Fetched {
                url: url.to_string(),
                key: found
                    .mal_id
                    .map_or_else(|| EntryId::generate().to_string(), |id| id.to_string()),
                bytes,
            }),
            Err(e) => {
                warn!(url = %url, error = %e, "Poster download failed, keeping remote URL");
                Some(Cover::Remote(url.to_string()))
            }
        }
    }

    /// Writes the cover and inserts `entry` as one step with respect to
    /// poster releases.
    async fn commit_entry<E: CatalogEntry>(
        &self,
        mut entry: E,
        cover: Option<Cover>,
    ) -> Result<E, CatalogError> {
        let _gate = self.images.gate().await;

        let reference = match cover {
            None => None,
            Some(Cover::Remote(url)) => Some(url),
            Some(Cover::Fetched { url, key, bytes }) => {
                match self.images.write_poster(E::KIND, &key, &bytes).await {
                    Ok(reference) => Some(reference),
                    Err(e) => {
                        warn!(url = %url, error = %e, "Poster cache failed, keeping remote URL");
                        Some(url)
                    }
                }
            }
        };
        entry.set_cover_image(reference.clone());

        match self.store.insert_entry(entry).await {
            Ok(entry) => Ok(entry),
            Err(e) => {
                if let Some(reference) = reference
                    && !self.store.cover_referenced::<E>(&reference).await
                {
                    self.images.release_poster(&reference).await;
                }
                Err(e.into())
            }
        }
    }

    /// Deletes cached posters that no entry of kind `E` references any more.
    ///
    /// `covers` were orphaned when their entries were removed, but an add may
    /// have picked one up since, so each is checked again under the gate.
    async fn release_covers<E: CatalogEntry>(&self, covers: &[String]) {
        if covers.is_empty() {
            return;
        }

        let _gate = self.images.gate().await;
        for cover in covers {
            if self.store.cover_referenced::<E>(cover).await {
                debug!(cover = %cover, "Poster referenced again, keeping it");
                continue;
            }
            self.images.release_poster(cover).await;
        }
    }

    async fn get_entry<E: CatalogEntry>(&self, id: &EntryId) -> Result<E, CatalogError> {
        self.store
            .get_entry::<E>(id)
            .await
            .ok_or_else(|| CatalogError::NotFound {
                kind: E::KIND,
                id: id.clone(),
            })
    }

    async fn patch_entry<E: CatalogEntry>(
        &self,
        id: &EntryId,
        patch: E::Patch,
    ) -> Result<E, CatalogError> {
        if let Some(title) = patch.title() {
            validate_title(title)?;
        }
        let auto_finish = self.config.read().await.catalog.auto_finish;

        let updated = self
            .store
            .update_entry::<E, _>(id, |entry| entry.apply_patch(patch, auto_finish))
            .await?;
        record_mutation(E::KIND, "patch");
        Ok(updated)
    }

    async fn toggle_entry<E: CatalogEntry>(&self, id: &EntryId) -> Result<E, CatalogError> {
        let updated = self
            .store
            .update_entry::<E, _>(id, |entry| {
                let finished = !entry.is_finished();
                entry.set_finished(finished);
            })
            .await?;
        record_mutation(E::KIND, "toggle");
        Ok(updated)
    }

    async fn delete_entry<E: CatalogEntry>(&self, id: &EntryId) -> Result<(), CatalogError> {
        let removal = self.store.remove_entry::<E>(id).await?;
        if !removal.removed.is_empty() {
            record_mutation(E::KIND, "delete");
            info!(kind = %E::KIND, id = %id, "Entry deleted");
        }
        self.release_covers::<E>(&removal.orphaned_covers).await;
        Ok(())
    }

    async fn delete_section_of<E: CatalogEntry>(&self, label: &str) -> Result<usize, CatalogError> {
        let removal = self.store.remove_section::<E>(label).await?;
        record_mutation(E::KIND, "delete_section");
        self.release_covers::<E>(&removal.orphaned_covers).await;
        Ok(removal.removed.len())
    }
}

#[async_trait::async_trait]
impl CatalogService for DocumentCatalogService {
    async fn list_anime(&self) -> Vec<AnimeEntry> {
        self.store.list_entries().await
    }

    async fn get_anime(&self, id: &EntryId) -> Result<AnimeEntry, CatalogError> {
        self.get_entry(id).await
    }

    async fn add_anime(&self, input: NewAnime) -> Result<AnimeEntry, CatalogError> {
        let title = validate_title(&input.title)?.to_string();
        let enrichment = self.enrich(MediaKind::Anime, &title).await;

        let mut entry = AnimeEntry::create(input, enrichment.title);
        entry.mal_id = enrichment.mal_id;
        // A year typed by the user wins over the looked-up one.
        entry.year = entry.year.or(enrichment.year);

        let entry = self.commit_entry(entry, enrichment.cover).await?;
        record_mutation(MediaKind::Anime, "add");
        info!(id = %entry.id, title = %entry.title, "Anime added");
        Ok(entry)
    }

    async fn patch_anime(
        &self,
        id: &EntryId,
        patch: AnimePatch,
    ) -> Result<AnimeEntry, CatalogError> {
        self.patch_entry(id, patch).await
    }

    async fn toggle_anime_finished(&self, id: &EntryId) -> Result<AnimeEntry, CatalogError> {
        self.toggle_entry(id).await
    }

    async fn delete_anime(&self, id: &EntryId) -> Result<(), CatalogError> {
        self.delete_entry::<AnimeEntry>(id).await
    }

    async fn list_manga(&self) -> Vec<MangaEntry> {
        self.store.list_entries().await
    }

    async fn get_manga(&self, id: &EntryId) -> Result<MangaEntry, CatalogError> {
        self.get_entry(id).await
    }

    async fn add_manga(&self, input: NewManga) -> Result<MangaEntry, CatalogError> {
        let title = validate_title(&input.title)?.to_string();
        let enrichment = self.enrich(MediaKind::Manga, &title).await;

        // Manga keep only the year the user typed.
        let mut entry = MangaEntry::create(input, enrichment.title);
        entry.mal_id = enrichment.mal_id;

        let entry = self.commit_entry(entry, enrichment.cover).await?;
        record_mutation(MediaKind::Manga, "add");
        info!(id = %entry.id, title = %entry.title, "Manga added");
        Ok(entry)
    }

    async fn patch_manga(
        &self,
        id: &EntryId,
        patch: MangaPatch,
    ) -> Result<MangaEntry, CatalogError> {
        self.patch_entry(id, patch).await
    }

    async fn toggle_manga_finished(&self, id: &EntryId) -> Result<MangaEntry, CatalogError> {
        self.toggle_entry(id).await
    }

    async fn delete_manga(&self, id: &EntryId) -> Result<(), CatalogError> {
        self.delete_entry::<MangaEntry>(id).await
    }

    async fn list_sections(&self, kind: MediaKind) -> Vec<String> {
        match kind {
            MediaKind::Anime => self.store.visible_sections::<AnimeEntry>().await,
            MediaKind::Manga => self.store.visible_sections::<MangaEntry>().await,
        }
    }

    async fn grouped_anime(&self) -> Vec<Section<AnimeEntry>> {
        self.store.grouped_sections().await
    }

    async fn grouped_manga(&self) -> Vec<Section<MangaEntry>> {
        self.store.grouped_sections().await
    }

    async fn declare_section(
        &self,
        kind: MediaKind,
        label: &str,
    ) -> Result<Vec<String>, CatalogError> {
        let label = validate_label(label)?;
        let labels = self.store.declare_section(kind, label).await?;
        record_mutation(kind, "declare_section");
        Ok(labels)
    }

    async fn delete_section(&self, kind: MediaKind, label: &str) -> Result<usize, CatalogError> {
        let label = validate_label(label)?;
        match kind {
            MediaKind::Anime => self.delete_section_of::<AnimeEntry>(label).await,
            MediaKind::Manga => self.delete_section_of::<MangaEntry>(label).await,
        }
    }

    async fn top_list(&self, kind: MediaKind) -> Vec<TopListItem> {
        self.store.top_list(kind).await
    }

    async fn set_top_list(
        &self,
        kind: MediaKind,
        items: Vec<TopListItem>,
    ) -> Result<Vec<TopListItem>, CatalogError> {
        let stored = self.store.replace_top_list(kind, items).await?;
        record_mutation(kind, "top_list");
        Ok(stored)
    }

    async fn home(&self) -> HomeView {
        let document = self.store.snapshot().await;
        HomeView {
            notes: document.home_notes,
            top_anime: document.top_anime,
            top_manga: document.top_manga,
        }
    }

    async fn add_home_note(&self, text: &str) -> Result<Vec<HomeNote>, CatalogError> {
        let text = validate_note(text)?;
        let notes = self.store.append_home_note(text).await?;
        metrics::counter!("catalog_mutations_total", "kind" => "home", "op" => "note").increment(1);
        Ok(notes)
    }

    async fn document(&self) -> CatalogDocument {
        self.store.snapshot().await
    }

    async fn search_remote(&self, kind: MediaKind, query: &str) -> Vec<MetadataMatch> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let limit = self.config.read().await.metadata.search_limit;
        match self.metadata.search(kind, query, limit).await {
            Ok(mut results) => {
                results.truncate(limit);
                results
            }
            Err(e) => {
                warn!(kind = %kind, query = %query, error = %e, "Metadata search failed");
                Vec::new()
            }
        }
    }
}
