use serde::{Deserialize, Serialize};

use super::entry::{AnimeEntry, MangaEntry};
use super::lenient;
use crate::constants::WELCOME_NOTE;
use crate::domain::MediaKind;

/// The whole persisted catalog. It is always read and written as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDocument {
    #[serde(deserialize_with = "lenient::entries")]
    pub anime: Vec<AnimeEntry>,

    #[serde(deserialize_with = "lenient::entries")]
    pub manga: Vec<MangaEntry>,

    #[serde(rename = "topAnime")]
    pub top_anime: Vec<TopListItem>,

    #[serde(rename = "topManga")]
    pub top_manga: Vec<TopListItem>,

    #[serde(rename = "homeNotes")]
    pub home_notes: Vec<HomeNote>,

    #[serde(rename = "yearSections")]
    pub year_sections: YearSections,
}

impl CatalogDocument {
    /// Document written when no catalog file exists yet.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            home_notes: vec![HomeNote {
                id: 1,
                text: WELCOME_NOTE.to_string(),
            }],
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn top_list(&self, kind: MediaKind) -> &Vec<TopListItem> {
        match kind {
            MediaKind::Anime => &self.top_anime,
            MediaKind::Manga => &self.top_manga,
        }
    }

    pub fn top_list_mut(&mut self, kind: MediaKind) -> &mut Vec<TopListItem> {
        match kind {
            MediaKind::Anime => &mut self.top_anime,
            MediaKind::Manga => &mut self.top_manga,
        }
    }
}

/// Declared section labels per media type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearSections {
    #[serde(deserialize_with = "lenient::labels")]
    pub anime: Vec<String>,

    #[serde(deserialize_with = "lenient::labels")]
    pub manga: Vec<String>,
}

impl YearSections {
    #[must_use]
    pub const fn labels(&self, kind: MediaKind) -> &Vec<String> {
        match kind {
            MediaKind::Anime => &self.anime,
            MediaKind::Manga => &self.manga,
        }
    }

    pub fn labels_mut(&mut self, kind: MediaKind) -> &mut Vec<String> {
        match kind {
            MediaKind::Anime => &mut self.anime,
            MediaKind::Manga => &mut self.manga,
        }
    }
}

/// One ranked favourite. A denormalized copy, not a reference to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopListItem {
    pub title: String,

    #[serde(
        rename = "poster",
        alias = "cover",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeNote {
    pub id: u64,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_a_valid_document() {
        let doc: CatalogDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, CatalogDocument::default());
    }

    #[test]
    fn seeded_document_has_welcome_note() {
        let doc = CatalogDocument::seeded();
        assert_eq!(doc.home_notes.len(), 1);
        assert!(doc.anime.is_empty());
        assert!(doc.year_sections.anime.is_empty());
    }

    #[test]
    fn legacy_document_shape_loads() {
        let json = r#"{
            "anime": [],
            "manga": [],
            "topAnime": [{"title": "Mushishi", "poster": "https://img/1.jpg", "reason": "calm"}],
            "topManga": [{"title": "Vagabond", "cover": "https://img/2.jpg"}],
            "homeNotes": [{"id": 1732050000000, "text": "hello"}],
            "yearSections": {"anime": ["2024", 2023], "manga": []}
        }"#;
        let doc: CatalogDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.year_sections.anime, vec!["2024", "2023"]);
        assert_eq!(
            doc.top_manga[0].cover_image.as_deref(),
            Some("https://img/2.jpg")
        );
        assert_eq!(doc.home_notes[0].id, 1_732_050_000_000);
    }

    #[test]
    fn unreadable_entry_is_skipped_not_fatal() {
        let json = r#"{
            "anime": [
                {"id": "1", "title": "Monster", "episodes_watched": 2.5},
                {"id": "2"},
                "garbage"
            ],
            "manga": null
        }"#;
        let doc: CatalogDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.anime.len(), 1);
        assert_eq!(doc.anime[0].title, "Monster");
        assert!(doc.manga.is_empty());
    }

    #[test]
    fn top_item_omits_missing_fields() {
        let item = TopListItem {
            title: "Monster".to_string(),
            cover_image: None,
            reason: None,
        };
        assert_eq!(
            serde_json::to_string(&item).unwrap(),
            r#"{"title":"Monster"}"#
        );
    }
}
