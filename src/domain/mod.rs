//! Domain types for the catalog with strong typing.
//!
//! Entry ids are opaque strings: new entries get a UUID, while documents
//! written by older versions carry millisecond timestamps. Both are valid.

pub mod grouping;

pub use grouping::{Groupable, Section, grouping_key, group_into_sections, section_labels};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier of a catalog entry.
///
/// # Examples
///
/// ```rust
/// use tsundoku::domain::EntryId;
///
/// let id = EntryId::from("1732050000000");
/// assert_eq!(id.as_str(), "1732050000000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generates a fresh, never reused id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The two kinds of media the catalog tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Anime,
    Manga,
}

impl MediaKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Anime => "anime",
            Self::Manga => "manga",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anime" => Ok(Self::Anime),
            "manga" => Ok(Self::Manga),
            other => Err(format!(
                "Unknown media type '{other}'. Expected 'anime' or 'manga'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_parses_case_insensitively() {
        assert_eq!("Anime".parse::<MediaKind>(), Ok(MediaKind::Anime));
        assert_eq!(" manga ".parse::<MediaKind>(), Ok(MediaKind::Manga));
        assert!("novel".parse::<MediaKind>().is_err());
    }

    #[test]
    fn media_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MediaKind::Manga).unwrap();
        assert_eq!(json, "\"manga\"");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = EntryId::generate();
        let b = EntryId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn entry_id_is_transparent_in_json() {
        let id: EntryId = serde_json::from_str("\"1700000000000\"").unwrap();
        assert_eq!(id, EntryId::from("1700000000000"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1700000000000\"");
    }
}
