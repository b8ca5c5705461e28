//! List entries command handler

use super::{open_catalog, progress_line};
use crate::config::Config;
use crate::domain::MediaKind;

pub async fn cmd_list(config: &Config, kind: MediaKind) -> anyhow::Result<()> {
    let catalog = open_catalog(config).await?;

    let rows: Vec<(String, String, bool, String)> = match kind {
        MediaKind::Anime => catalog
            .list_anime()
            .await
            .into_iter()
            .map(|a| {
                let progress = progress_line(a.episodes_watched, a.total_episodes);
                (a.id.to_string(), a.title, a.finished, progress)
            })
            .collect(),
        MediaKind::Manga => catalog
            .list_manga()
            .await
            .into_iter()
            .map(|m| {
                let progress = progress_line(m.chapters_read, m.total_chapters);
                (m.id.to_string(), m.title, m.finished, progress)
            })
            .collect(),
    };

    if rows.is_empty() {
        println!("No {kind} tracked yet.");
        println!();
        println!("Add one with: tsundoku add {kind} \"title\"");
        return Ok(());
    }

    println!("Tracked {kind} ({} total)", rows.len());
    println!("{:-<70}", "");

    for (id, title, finished, progress) in rows {
        let indicator = if finished { "✓" } else { "•" };
        println!("{indicator} {title} [{progress}]");
        println!("  ID: {id}");
    }

    Ok(())
}
