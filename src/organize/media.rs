use std::fmt;
use std::path::{Path, PathBuf};

use crate::organize::config::OrganizeConfig;

/// File classification by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Subtitle,
    Other,
}

/// A file inside the library root or one of its folders.
#[derive(Debug, Clone)]
pub struct MediaItem {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub file_name: String,
    pub stem: String,
    /// Extension with its original casing, without the leading dot.
    pub extension: String,
}

impl MediaKind {
    /// Video or subtitle.
    #[must_use]
    pub const fn is_media(self) -> bool {
        matches!(self, Self::Video | Self::Subtitle)
    }

    /// Icon shown in action log lines.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Video => "🎬",
            Self::Subtitle => "💬",
            Self::Other => "📄",
        }
    }
}

impl MediaItem {
    #[must_use]
    pub fn new(path: PathBuf, config: &OrganizeConfig) -> Self {
        let kind = config.media_kind(&path);
        let file_name = crate::path_to_filename_string(&path);
        let (stem, extension) = crate::get_normalized_file_name_and_extension(&path)
            .unwrap_or_else(|_| (crate::path_to_file_stem_string(&path), String::new()));
        Self {
            path,
            kind,
            file_name,
            stem,
            extension,
        }
    }

    /// File name this item gets when it is named after the given base name.
    #[must_use]
    pub fn name_with_base(&self, base_name: &str) -> String {
        if self.extension.is_empty() {
            base_name.to_string()
        } else {
            format!("{base_name}.{}", self.extension)
        }
    }

    #[must_use]
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Video => "video",
            Self::Subtitle => "subtitle",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}
