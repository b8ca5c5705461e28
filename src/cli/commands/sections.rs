use super::open_catalog;
use crate::config::Config;
use crate::domain::MediaKind;

pub async fn cmd_sections(config: &Config, kind: MediaKind) -> anyhow::Result<()> {
    let catalog = open_catalog(config).await?;

    let sections: Vec<(String, Vec<String>)> = match kind {
        MediaKind::Anime => catalog
            .grouped_anime()
            .await
            .into_iter()
            .map(|s| (s.label, s.entries.into_iter().map(|e| e.title).collect()))
            .collect(),
        MediaKind::Manga => catalog
            .grouped_manga()
            .await
            .into_iter()
            .map(|s| (s.label, s.entries.into_iter().map(|e| e.title).collect()))
            .collect(),
    };

    if sections.is_empty() {
        println!("No {kind} sections yet.");
        return Ok(());
    }

    for (label, titles) in sections {
        println!("{label} ({})", titles.len());
        for title in titles {
            println!("  {title}");
        }
    }

    Ok(())
}
