pub mod entries;
pub mod notes;
pub mod sections;
pub mod top_lists;
