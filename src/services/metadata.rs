//! Title lookups against the external metadata service.
//!
//! Lookups are best effort: a single attempt, no retries. Callers that only
//! enrich data use [`MetadataProvider::lookup_or_none`], which logs and
//! swallows failures.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::clients::jikan::{JikanClient, MalEntry};
use crate::constants::limits::LOOKUP_RESULTS;
use crate::domain::MediaKind;

/// Best match for a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataMatch {
    pub mal_id: Option<i32>,
    pub title: String,
    pub image_url: Option<String>,
    pub year: Option<i32>,
}

impl From<MalEntry> for MetadataMatch {
    fn from(entry: MalEntry) -> Self {
        Self {
            mal_id: Some(entry.mal_id),
            title: entry.display_title().unwrap_or_default().to_string(),
            image_url: entry.cover_url().map(str::to_string),
            year: entry.get_start_year(),
        }
    }
}

#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Up to `limit` candidates for `query`.
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<MetadataMatch>>;

    /// Best match for `title`, or `None` when nothing matched.
    async fn lookup(&self, kind: MediaKind, title: &str) -> anyhow::Result<Option<MetadataMatch>> {
        Ok(self
            .search(kind, title, LOOKUP_RESULTS)
            .await?
            .into_iter()
            .next())
    }

    /// Like [`lookup`](Self::lookup) but failures degrade to `None`.
    async fn lookup_or_none(&self, kind: MediaKind, title: &str) -> Option<MetadataMatch> {
        match self.lookup(kind, title).await {
            Ok(found) => {
                let outcome = if found.is_some() { "match" } else { "no_match" };
                metrics::counter!("metadata_lookups_total", "outcome" => outcome).increment(1);
                debug!(kind = %kind, title = %title, outcome, "Metadata lookup finished");
                found
            }
            Err(e) => {
                metrics::counter!("metadata_lookups_total", "outcome" => "error").increment(1);
                warn!(kind = %kind, title = %title, error = %e, "Metadata lookup failed");
                None
            }
        }
    }
}

pub struct JikanMetadataProvider {
    client: Arc<JikanClient>,
}

impl JikanMetadataProvider {
    #[must_use]
    pub const fn new(client: Arc<JikanClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl MetadataProvider for JikanMetadataProvider {
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<MetadataMatch>> {
        let results = self.client.search(kind, query, limit).await?;
        Ok(results
            .into_iter()
            .filter(|r| r.display_title().is_some())
            .map(MetadataMatch::from)
            .collect())
    }
}

/// Provider used when lookups are disabled in the config.
pub struct DisabledMetadataProvider;

#[async_trait::async_trait]
impl MetadataProvider for DisabledMetadataProvider {
    async fn search(
        &self,
        _kind: MediaKind,
        _query: &str,
        _limit: usize,
    ) -> anyhow::Result<Vec<MetadataMatch>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait::async_trait]
    impl MetadataProvider for Failing {
        async fn search(
            &self,
            _kind: MediaKind,
            _query: &str,
            _limit: usize,
        ) -> anyhow::Result<Vec<MetadataMatch>> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn failing_lookup_degrades_to_none() {
        assert!(Failing.lookup(MediaKind::Anime, "x").await.is_err());
        assert_eq!(Failing.lookup_or_none(MediaKind::Anime, "x").await, None);
    }

    #[tokio::test]
    async fn disabled_provider_never_matches() {
        let found = DisabledMetadataProvider
            .lookup_or_none(MediaKind::Manga, "Berserk")
            .await;
        assert!(found.is_none());
    }

    #[test]
    fn match_from_mal_entry() {
        let entry: MalEntry = serde_json::from_str(
            r#"{"mal_id": 5, "title": "Cowboy Bebop", "year": 1998,
                "images": {"jpg": {"image_url": "https://img/5.jpg"}}}"#,
        )
        .unwrap();
        let found = MetadataMatch::from(entry);
        assert_eq!(found.mal_id, Some(5));
        assert_eq!(found.title, "Cowboy Bebop");
        assert_eq!(found.year, Some(1998));
        assert_eq!(found.image_url.as_deref(), Some("https://img/5.jpg"));
    }
}
