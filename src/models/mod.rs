pub mod document;
pub mod entry;
pub mod lenient;

pub use document::{CatalogDocument, HomeNote, TopListItem, YearSections};
pub use entry::{
    AnimeEntry, AnimePatch, CatalogEntry, EntryPatch, MangaEntry, MangaPatch, NewAnime, NewManga,
};
