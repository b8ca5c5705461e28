/// Label an entry falls back to when it has neither a year section nor a year.
pub const UNGROUPED_LABEL: &str = "Ungrouped";

pub mod limits {

    pub const TOP_LIST_MAX: usize = 10;

    pub const LOOKUP_RESULTS: usize = 1;

    pub const DEFAULT_SEARCH_RESULTS: usize = 6;
}

pub mod posters {

    /// URL prefix under which cached posters are served.
    pub const PUBLIC_PREFIX: &str = "/posters";

    pub const FILE_EXTENSION: &str = "jpg";
}

pub const WELCOME_NOTE: &str =
    "Add your 'about me' paragraphs from the Home page UI by clicking the 'Add note' button.";
