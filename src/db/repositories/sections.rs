use std::sync::Arc;

use tracing::info;

use super::entries::{Removal, remove_where};
use crate::constants::UNGROUPED_LABEL;
use crate::db::document_file::{DocumentFile, StoreError};
use crate::domain::{MediaKind, Section, group_into_sections, section_labels};
use crate::models::CatalogEntry;

/// Repository for declared year-section labels.
pub struct SectionRepository {
    conn: Arc<DocumentFile>,
}

impl SectionRepository {
    pub const fn new(conn: Arc<DocumentFile>) -> Self {
        Self { conn }
    }

    /// Declared labels plus every label an entry of kind `E` resolves to.
    pub async fn visible<E: CatalogEntry>(&self) -> Vec<String> {
        self.conn
            .read(|d| section_labels(d.year_sections.labels(E::KIND), E::collection(d)))
            .await
    }

    /// Entries of kind `E` bucketed by visible section, read under one lock.
    pub async fn grouped<E: CatalogEntry>(&self) -> Vec<Section<E>> {
        self.conn
            .read(|d| {
                let entries = E::collection(d);
                let labels = section_labels(d.year_sections.labels(E::KIND), entries);
                group_into_sections(labels, entries)
            })
            .await
    }

    /// Adds `label` to the declared set if absent and returns the set.
    ///
    /// The fallback label is implicit and never stored.
    pub async fn declare(&self, kind: MediaKind, label: &str) -> Result<Vec<String>, StoreError> {
        self.conn
            .mutate(|d| {
                let labels = d.year_sections.labels_mut(kind);
                if label != UNGROUPED_LABEL && !labels.iter().any(|l| l.trim() == label) {
                    labels.push(label.to_string());
                    info!(kind = %kind, label = %label, "Year section declared");
                }
                Ok(labels.clone())
            })
            .await
    }

    /// Drops `label` and every entry of kind `E` that resolves to it.
    pub async fn remove_with_entries<E: CatalogEntry>(
        &self,
        label: &str,
    ) -> Result<Removal<E>, StoreError> {
        let removal = self
            .conn
            .mutate(|d| {
                d.year_sections
                    .labels_mut(E::KIND)
                    .retain(|l| l.trim() != label);
                Ok(remove_where::<E, _>(d, |e| e.grouping_key() == label))
            })
            .await?;

        info!(
            kind = %E::KIND,
            label = %label,
            removed = removal.removed.len(),
            "Year section deleted"
        );
        Ok(removal)
    }
}
