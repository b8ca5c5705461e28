use super::open_catalog;
use crate::config::Config;
use crate::domain::MediaKind;
use crate::models::{NewAnime, NewManga};

pub async fn cmd_add(
    config: &Config,
    kind: MediaKind,
    title: &str,
    section: Option<String>,
    progress: u32,
) -> anyhow::Result<()> {
    let catalog = open_catalog(config).await?;
    println!("Looking up: {title}");

    let (id, stored_title, mal_id, cover) = match kind {
        MediaKind::Anime => {
            let entry = catalog
                .add_anime(NewAnime {
                    title: title.to_string(),
                    episodes_watched: progress,
                    year_section: section,
                    ..Default::default()
                })
                .await?;
            (entry.id, entry.title, entry.mal_id, entry.cover_image)
        }
        MediaKind::Manga => {
            let entry = catalog
                .add_manga(NewManga {
                    title: title.to_string(),
                    chapters_read: progress,
                    year_section: section,
                    ..Default::default()
                })
                .await?;
            (entry.id, entry.title, entry.mal_id, entry.cover_image)
        }
    };

    println!("✓ Added {kind}: {stored_title}");
    println!("  ID: {id}");
    match mal_id {
        Some(mal_id) => println!("  MyAnimeList: #{mal_id}"),
        None => println!("  No metadata match, kept the title as typed."),
    }
    if let Some(cover) = cover {
        println!("  Cover: {cover}");
    }

    Ok(())
}
