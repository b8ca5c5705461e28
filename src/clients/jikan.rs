use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::MediaKind;

pub const JIKAN_API: &str = "https://api.jikan.moe/v4";

#[derive(Debug, Deserialize)]
struct JikanResponse<T> {
    data: T,
}

/// A search hit from `/anime` or `/manga`. Both endpoints share the fields
/// used here; anime report `aired`, manga report `published`.
#[derive(Debug, Clone, Deserialize)]
pub struct MalEntry {
    pub mal_id: i32,
    pub title: Option<String>,
    pub title_english: Option<String>,
    pub images: Option<Images>,
    pub year: Option<i32>,
    pub aired: Option<DateRange>,
    pub published: Option<DateRange>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Images {
    pub jpg: Option<ImageSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateRange {
    pub prop: Option<DateRangeProp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateRangeProp {
    pub from: Option<PartialDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartialDate {
    pub year: Option<i32>,
}

impl MalEntry {
    /// Largest available JPG cover.
    pub fn cover_url(&self) -> Option<&str> {
        let jpg = self.images.as_ref()?.jpg.as_ref()?;
        let usable: fn(&Option<String>) -> Option<&str> = |url| url.as_deref().filter(|u| !u.trim().is_empty());
        usable(&jpg.large_image_url).or_else(|| usable(&jpg.image_url))
    }

    pub fn get_start_year(&self) -> Option<i32> {
        if let Some(year) = self.year {
            return Some(year);
        }

        self.aired
            .as_ref()
            .or(self.published.as_ref())
            .and_then(|r| r.prop.as_ref())
            .and_then(|p| p.from.as_ref())
            .and_then(|f| f.year)
    }

    pub fn display_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.title_english.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Clone)]
pub struct JikanClient {
    client: Client,
    base_url: String,
}

impl JikanClient {
    pub fn with_shared_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn search(&self, kind: MediaKind, query: &str, limit: usize) -> Result<Vec<MalEntry>> {
        let url = format!(
            "{}/{}?q={}&limit={}",
            self.base_url,
            kind.as_str(),
            urlencoding::encode(query),
            limit
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Jikan API error: {} - {}", status, body));
        }

        let response: JikanResponse<Vec<MalEntry>> = response.json().await?;

        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_anime_search_payload() {
        let json = r#"{
            "data": [{
                "mal_id": 52991,
                "title": "Sousou no Frieren",
                "title_english": "Frieren: Beyond Journey's End",
                "images": {"jpg": {
                    "image_url": "https://cdn.myanimelist.net/images/anime/1015/138006.jpg",
                    "large_image_url": "https://cdn.myanimelist.net/images/anime/1015/138006l.jpg"
                }},
                "year": null,
                "aired": {"from": "2023-09-29T00:00:00+00:00", "prop": {"from": {"day": 29, "month": 9, "year": 2023}}}
            }]
        }"#;
        let response: JikanResponse<Vec<MalEntry>> = serde_json::from_str(json).unwrap();
        let hit = &response.data[0];

        assert_eq!(hit.display_title(), Some("Sousou no Frieren"));
        assert_eq!(hit.get_start_year(), Some(2023));
        assert!(hit.cover_url().unwrap().ends_with("138006l.jpg"));
    }

    #[test]
    fn parses_manga_payload_with_published_year() {
        let json = r#"{
            "mal_id": 2,
            "title": "Berserk",
            "images": {"jpg": {"image_url": "https://img/2.jpg", "large_image_url": null}},
            "published": {"prop": {"from": {"year": 1989}}}
        }"#;
        let hit: MalEntry = serde_json::from_str(json).unwrap();
        assert_eq!(hit.get_start_year(), Some(1989));
        assert_eq!(hit.cover_url(), Some("https://img/2.jpg"));
    }

    #[test]
    fn empty_large_image_falls_back_to_regular() {
        let json = r#"{
            "mal_id": 1,
            "title": "Cowboy Bebop",
            "images": {"jpg": {"image_url": "https://img/1.jpg", "large_image_url": ""}}
        }"#;
        let hit: MalEntry = serde_json::from_str(json).unwrap();
        assert_eq!(hit.cover_url(), Some("https://img/1.jpg"));
    }

    #[test]
    fn missing_images_yield_no_cover() {
        let hit: MalEntry = serde_json::from_str(r#"{"mal_id": 1, "title": " "}"#).unwrap();
        assert_eq!(hit.cover_url(), None);
        assert_eq!(hit.display_title(), None);
    }
}
