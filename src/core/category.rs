//! File category definitions.

/// Category of a changed path, determines how the watcher reacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    /// Note with a recognized extension under the notes directory
    Document,
    /// The configured stylesheet - reload, then drop every artifact
    Style,
    /// The converter settings file - reload, then drop every artifact
    Settings,
    /// Anything else in a watched directory - ignored
    Other,
}

impl FileCategory {
    pub fn name(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Style => "style",
            Self::Settings => "settings",
            Self::Other => "other",
        }
    }
}
