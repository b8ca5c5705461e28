use serde::{Deserialize, Serialize};

use crate::models::TopListItem;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeclareSectionRequest {
    #[serde(rename = "yearLabel", alias = "label", default)]
    pub year_label: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedSectionDto {
    pub label: String,
    pub removed: usize,
}

#[derive(Debug, Deserialize)]
pub struct TopListRequest {
    pub list: Vec<TopListItem>,
}

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub anime_count: usize,
    pub manga_count: usize,
    pub finished_anime: usize,
    pub finished_manga: usize,
    pub metadata_enabled: bool,
    pub data_path: String,
}
