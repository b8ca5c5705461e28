use std::sync::Arc;

use tracing::info;

use crate::constants::limits::TOP_LIST_MAX;
use crate::db::document_file::{DocumentFile, StoreError};
use crate::domain::MediaKind;
use crate::models::TopListItem;

/// Repository for the ranked favourite lists.
pub struct TopListRepository {
    conn: Arc<DocumentFile>,
}

impl TopListRepository {
    pub const fn new(conn: Arc<DocumentFile>) -> Self {
        Self { conn }
    }

    pub async fn get(&self, kind: MediaKind) -> Vec<TopListItem> {
        self.conn.read(|d| d.top_list(kind).clone()).await
    }

    /// Replaces the whole list, keeping at most the first ten items.
    pub async fn replace(
        &self,
        kind: MediaKind,
        mut items: Vec<TopListItem>,
    ) -> Result<Vec<TopListItem>, StoreError> {
        if items.len() > TOP_LIST_MAX {
            info!(
                kind = %kind,
                submitted = items.len(),
                "Top list truncated to {TOP_LIST_MAX} items"
            );
            items.truncate(TOP_LIST_MAX);
        }

        self.conn
            .mutate(move |d| {
                *d.top_list_mut(kind) = items;
                Ok(d.top_list(kind).clone())
            })
            .await
    }
}
