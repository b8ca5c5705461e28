use super::ApiError;
use crate::domain::{EntryId, MediaKind};

pub fn validate_kind(kind: &str) -> Result<MediaKind, ApiError> {
    kind.parse().map_err(ApiError::validation)
}

pub fn validate_entry_id(id: &str) -> Result<EntryId, ApiError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Entry id cannot be empty"));
    }
    Ok(EntryId::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_kind() {
        assert_eq!(validate_kind("anime").unwrap(), MediaKind::Anime);
        assert_eq!(validate_kind("Manga").unwrap(), MediaKind::Manga);
        assert!(validate_kind("novels").is_err());
    }

    #[test]
    fn test_validate_entry_id() {
        assert_eq!(validate_entry_id(" 42 ").unwrap().as_str(), "42");
        assert!(validate_entry_id("  ").is_err());
    }
}
