use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::CatalogDocument;
use super::lenient;
use crate::domain::{EntryId, Groupable, MediaKind};

/// Shared behaviour of catalog entries so the store and service can treat
/// anime and manga through one code path.
pub trait CatalogEntry: Groupable + Clone + Serialize + Send + Sync + 'static {
    const KIND: MediaKind;

    type Patch: EntryPatch + Send;

    fn id(&self) -> &EntryId;

    fn cover_image(&self) -> Option<&str>;

    fn set_cover_image(&mut self, cover: Option<String>);

    fn is_finished(&self) -> bool;

    fn set_finished(&mut self, finished: bool);

    /// Applies the whitelisted fields of `patch`.
    ///
    /// With `auto_finish`, an entry whose progress reaches a known total is
    /// marked finished unless the patch sets `finished` itself.
    fn apply_patch(&mut self, patch: Self::Patch, auto_finish: bool);

    fn collection(document: &CatalogDocument) -> &Vec<Self>;

    fn collection_mut(document: &mut CatalogDocument) -> &mut Vec<Self>;
}

pub trait EntryPatch {
    fn title(&self) -> Option<&str>;
}

const fn default_seasons() -> u32 {
    1
}

fn reached_total(progress: u32, total: Option<u32>) -> bool {
    total.is_some_and(|t| t > 0 && progress >= t)
}

fn normalize_section(section: Option<String>) -> Option<String> {
    section
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeEntry {
    pub id: EntryId,
    pub title: String,
    #[serde(rename = "originalTitle", default)]
    pub original_title: String,
    #[serde(default)]
    pub mal_id: Option<i32>,
    #[serde(rename = "poster", default)]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub episodes_watched: u32,
    #[serde(default, deserialize_with = "lenient::total")]
    pub total_episodes: Option<u32>,
    #[serde(default = "default_seasons", deserialize_with = "lenient::seasons")]
    pub seasons: u32,
    #[serde(default)]
    pub finished: bool,
    #[serde(default, deserialize_with = "lenient::year")]
    pub year: Option<i32>,
    #[serde(rename = "yearSection", default, deserialize_with = "lenient::label")]
    pub year_section: Option<String>,
    #[serde(rename = "addedAt", default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MangaEntry {
    pub id: EntryId,
    pub title: String,
    #[serde(rename = "originalTitle", default)]
    pub original_title: String,
    #[serde(default)]
    pub mal_id: Option<i32>,
    #[serde(rename = "cover", default)]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub chapters_read: u32,
    #[serde(default, deserialize_with = "lenient::total")]
    pub total_chapters: Option<u32>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default, deserialize_with = "lenient::year")]
    pub year: Option<i32>,
    #[serde(rename = "yearSection", default, deserialize_with = "lenient::label")]
    pub year_section: Option<String>,
    #[serde(rename = "addedAt", default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

/// Fields accepted when adding an anime.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAnime {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub episodes_watched: u32,
    #[serde(default, deserialize_with = "lenient::total")]
    pub total_episodes: Option<u32>,
    #[serde(default, deserialize_with = "lenient::total")]
    pub seasons: Option<u32>,
    #[serde(default, deserialize_with = "lenient::year")]
    pub year: Option<i32>,
    #[serde(
        rename = "yearSection",
        alias = "year_section",
        default,
        deserialize_with = "lenient::label"
    )]
    pub year_section: Option<String>,
}

/// Fields accepted when adding a manga.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewManga {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub chapters_read: u32,
    #[serde(default, deserialize_with = "lenient::total")]
    pub total_chapters: Option<u32>,
    #[serde(default, deserialize_with = "lenient::year")]
    pub year: Option<i32>,
    #[serde(
        rename = "yearSection",
        alias = "year_section",
        default,
        deserialize_with = "lenient::label"
    )]
    pub year_section: Option<String>,
}

/// Partial update for an anime. Keys not listed here are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnimePatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::patch_count")]
    pub episodes_watched: Option<u32>,
    #[serde(default, deserialize_with = "lenient::patch_total")]
    pub total_episodes: Option<Option<u32>>,
    #[serde(default, deserialize_with = "lenient::patch_count")]
    pub seasons: Option<u32>,
    pub finished: Option<bool>,
    #[serde(default, deserialize_with = "lenient::patch_year")]
    pub year: Option<Option<i32>>,
    #[serde(
        rename = "yearSection",
        alias = "year_section",
        default,
        deserialize_with = "lenient::patch_label"
    )]
    pub year_section: Option<Option<String>>,
}

/// Partial update for a manga. Keys not listed here are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MangaPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::patch_count")]
    pub chapters_read: Option<u32>,
    #[serde(default, deserialize_with = "lenient::patch_total")]
    pub total_chapters: Option<Option<u32>>,
    pub finished: Option<bool>,
    #[serde(default, deserialize_with = "lenient::patch_year")]
    pub year: Option<Option<i32>>,
    #[serde(
        rename = "yearSection",
        alias = "year_section",
        default,
        deserialize_with = "lenient::patch_label"
    )]
    pub year_section: Option<Option<String>>,
}

impl EntryPatch for AnimePatch {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl EntryPatch for MangaPatch {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl Groupable for AnimeEntry {
    fn year_section(&self) -> Option<&str> {
        self.year_section.as_deref()
    }

    fn year(&self) -> Option<i32> {
        self.year
    }
}

impl Groupable for MangaEntry {
    fn year_section(&self) -> Option<&str> {
        self.year_section.as_deref()
    }

    fn year(&self) -> Option<i32> {
        self.year
    }
}

impl CatalogEntry for AnimeEntry {
    const KIND: MediaKind = MediaKind::Anime;

    type Patch = AnimePatch;

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn cover_image(&self) -> Option<&str> {
        self.cover_image.as_deref()
    }

    fn set_cover_image(&mut self, cover: Option<String>) {
        self.cover_image = cover;
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    fn apply_patch(&mut self, patch: AnimePatch, auto_finish: bool) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(total) = patch.total_episodes {
            self.total_episodes = total;
        }
        if let Some(seasons) = patch.seasons {
            self.seasons = seasons;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(section) = patch.year_section {
            self.year_section = normalize_section(section);
        }
        if let Some(watched) = patch.episodes_watched {
            self.episodes_watched = watched;
            if auto_finish
                && patch.finished.is_none()
                && reached_total(watched, self.total_episodes)
            {
                self.finished = true;
            }
        }
        if let Some(finished) = patch.finished {
            self.finished = finished;
        }
    }

    fn collection(document: &CatalogDocument) -> &Vec<Self> {
        &document.anime
    }

    fn collection_mut(document: &mut CatalogDocument) -> &mut Vec<Self> {
        &mut document.anime
    }
}

impl CatalogEntry for MangaEntry {
    const KIND: MediaKind = MediaKind::Manga;

    type Patch = MangaPatch;

    fn id(&self) -> &EntryId {
        &self.id
    }

    fn cover_image(&self) -> Option<&str> {
        self.cover_image.as_deref()
    }

    fn set_cover_image(&mut self, cover: Option<String>) {
        self.cover_image = cover;
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    fn apply_patch(&mut self, patch: MangaPatch, auto_finish: bool) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(total) = patch.total_chapters {
            self.total_chapters = total;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(section) = patch.year_section {
            self.year_section = normalize_section(section);
        }
        if let Some(read) = patch.chapters_read {
            self.chapters_read = read;
            if auto_finish && patch.finished.is_none() && reached_total(read, self.total_chapters)
            {
                self.finished = true;
            }
        }
        if let Some(finished) = patch.finished {
            self.finished = finished;
        }
    }

    fn collection(document: &CatalogDocument) -> &Vec<Self> {
        &document.manga
    }

    fn collection_mut(document: &mut CatalogDocument) -> &mut Vec<Self> {
        &mut document.manga
    }
}

impl AnimeEntry {
    /// Builds a fresh entry from the user's input. `title` is the display
    /// title, which may differ from `input.title` after a metadata lookup.
    #[must_use]
    pub fn create(input: NewAnime, title: String) -> Self {
        Self {
            id: EntryId::generate(),
            title,
            original_title: input.title.trim().to_string(),
            mal_id: None,
            cover_image: None,
            episodes_watched: input.episodes_watched,
            total_episodes: input.total_episodes,
            seasons: input.seasons.unwrap_or_else(default_seasons),
            finished: false,
            year: input.year,
            year_section: normalize_section(input.year_section),
            added_at: Utc::now(),
        }
    }
}

impl MangaEntry {
    #[must_use]
    pub fn create(input: NewManga, title: String) -> Self {
        Self {
            id: EntryId::generate(),
            title,
            original_title: input.title.trim().to_string(),
            mal_id: None,
            cover_image: None,
            chapters_read: input.chapters_read,
            total_chapters: input.total_chapters,
            finished: false,
            year: input.year,
            year_section: normalize_section(input.year_section),
            added_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anime(total: Option<u32>) -> AnimeEntry {
        AnimeEntry::create(
            NewAnime {
                title: "Frieren".to_string(),
                total_episodes: total,
                ..Default::default()
            },
            "Frieren".to_string(),
        )
    }

    #[test]
    fn create_sets_defaults() {
        let entry = anime(None);
        assert!(!entry.finished);
        assert_eq!(entry.seasons, 1);
        assert_eq!(entry.original_title, "Frieren");
        assert!(entry.cover_image.is_none());
    }

    #[test]
    fn patch_reaching_total_auto_finishes() {
        let mut entry = anime(Some(12));
        let patch: AnimePatch = serde_json::from_str(r#"{"episodes_watched": 12}"#).unwrap();
        entry.apply_patch(patch, true);
        assert_eq!(entry.episodes_watched, 12);
        assert!(entry.finished);
    }

    #[test]
    fn auto_finish_respects_policy_flag_and_unknown_total() {
        let mut entry = anime(Some(12));
        entry.apply_patch(
            AnimePatch {
                episodes_watched: Some(12),
                ..Default::default()
            },
            false,
        );
        assert!(!entry.finished);

        let mut unknown = anime(None);
        unknown.apply_patch(
            AnimePatch {
                episodes_watched: Some(500),
                ..Default::default()
            },
            true,
        );
        assert!(!unknown.finished);
    }

    #[test]
    fn explicit_finished_wins_over_auto_finish() {
        let mut entry = anime(Some(3));
        let patch: AnimePatch =
            serde_json::from_str(r#"{"episodes_watched": 3, "finished": false}"#).unwrap();
        entry.apply_patch(patch, true);
        assert!(!entry.finished);
    }

    #[test]
    fn patch_ignores_unknown_and_protected_keys() {
        let mut entry = anime(None);
        let id = entry.id.clone();
        let added_at = entry.added_at;
        let patch: AnimePatch = serde_json::from_str(
            r#"{"id": "hijack", "addedAt": "2000-01-01T00:00:00Z", "evil": true, "seasons": 2}"#,
        )
        .unwrap();
        entry.apply_patch(patch, true);
        assert_eq!(entry.id, id);
        assert_eq!(entry.added_at, added_at);
        assert_eq!(entry.seasons, 2);
    }

    #[test]
    fn patch_null_clears_nullable_fields() {
        let mut entry = anime(Some(24));
        entry.year = Some(2023);
        entry.year_section = Some("2024".to_string());
        let patch: AnimePatch = serde_json::from_str(
            r#"{"total_episodes": null, "year": null, "yearSection": null}"#,
        )
        .unwrap();
        entry.apply_patch(patch, true);
        assert_eq!(entry.total_episodes, None);
        assert_eq!(entry.year, None);
        assert_eq!(entry.year_section, None);
    }

    #[test]
    fn manga_auto_finish_uses_total_chapters() {
        let mut entry = MangaEntry::create(
            NewManga {
                title: "Blame!".to_string(),
                total_chapters: Some(65),
                ..Default::default()
            },
            "Blame!".to_string(),
        );
        let patch: MangaPatch = serde_json::from_str(r#"{"chapters_read": 70}"#).unwrap();
        entry.apply_patch(patch, true);
        assert!(entry.finished);
    }

    #[test]
    fn legacy_document_entry_loads() {
        let json = r#"{
            "id": "1732050000000",
            "title": "Sousou no Frieren",
            "originalTitle": "frieren",
            "mal_id": 52991,
            "poster": "/posters/anime/52991.jpg",
            "episodes_watched": 5,
            "total_episodes": null,
            "finished": false,
            "year": "2023",
            "yearSection": null,
            "addedAt": "2024-11-19T21:00:00.000Z"
        }"#;
        let entry: AnimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.year, Some(2023));
        assert_eq!(entry.seasons, 1);
        assert_eq!(entry.grouping_key(), "2023");
        assert_eq!(entry.cover_image(), Some("/posters/anime/52991.jpg"));
    }

    #[test]
    fn loose_progress_values_still_load() {
        let json = r#"{
            "id": "1732050000001",
            "title": "Monster",
            "episodes_watched": 2.5,
            "total_episodes": "74",
            "seasons": null,
            "finished": false
        }"#;
        let entry: AnimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.episodes_watched, 2);
        assert_eq!(entry.total_episodes, Some(74));
        assert_eq!(entry.seasons, 1);

        let manga: MangaEntry =
            serde_json::from_str(r#"{"id": "m", "title": "Pluto", "chapters_read": -1}"#).unwrap();
        assert_eq!(manga.chapters_read, 0);
    }

    #[test]
    fn patch_accepts_prompt_style_numbers() {
        let mut entry = anime(Some(10));
        let patch: AnimePatch =
            serde_json::from_str(r#"{"episodes_watched": "10.0", "seasons": 2.7}"#).unwrap();
        entry.apply_patch(patch, true);
        assert_eq!(entry.episodes_watched, 10);
        assert_eq!(entry.seasons, 2);
        assert!(entry.finished);
    }

    #[test]
    fn serializes_with_document_field_names() {
        let entry = anime(None);
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("originalTitle").is_some());
        assert!(value.get("yearSection").is_some());
        assert!(value.get("addedAt").is_some());
        assert!(value.get("poster").is_some());
    }
}
