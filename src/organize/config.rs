//! Configuration for the media organizer.

use std::path::{Path, PathBuf};
use std::{fmt, fs};

use anyhow::Context;
use itertools::Itertools;
use serde::Deserialize;

use crate::organize::media::MediaKind;

/// Video extensions recognized by default.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov"];
/// Subtitle extensions recognized by default.
pub const DEFAULT_SUBTITLE_EXTENSIONS: &[&str] = &["srt", "sub", "idx"];
/// IMDb suggestion API used for year lookups.
pub const DEFAULT_LOOKUP_URL: &str = "https://v3.sg.media-imdb.com/suggestion";
/// Year lookup timeout in seconds.
pub const DEFAULT_LOOKUP_TIMEOUT: u64 = 10;

/// Config from the user config file.
#[derive(Debug, Default, Deserialize)]
pub struct MediaTidyConfig {
    #[serde(default)]
    pub auto: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub dryrun: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub lookup_timeout: Option<u64>,
    #[serde(default)]
    pub lookup_url: Option<String>,
    #[serde(default)]
    pub match_folders: bool,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default)]
    pub reveal: bool,
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub subtitle_extensions: Vec<String>,
    #[serde(default)]
    pub trash: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub video_extensions: Vec<String>,
}

/// Wrapper needed for parsing the config section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    mtidy: MediaTidyConfig,
}

/// Final config created from CLI arguments and user config file.
#[derive(Debug, Clone)]
pub struct OrganizeConfig {
    /// Ask nothing: skip names without a year, keep the first of multiple videos.
    pub auto: bool,
    pub debug: bool,
    /// Only print what would be done.
    pub dryrun: bool,
    pub log_file: Option<PathBuf>,
    pub lookup_timeout: u64,
    pub lookup_url: String,
    /// Match loose files without a year to existing folders by title.
    pub match_folders: bool,
    /// Skip online year lookups.
    pub offline: bool,
    pub overwrite: bool,
    /// Open the folder in the file manager before asking which video to keep.
    pub reveal: bool,
    pub root: PathBuf,
    pub subtitle_extensions: Vec<String>,
    /// Move deleted videos to the trash instead of removing them.
    pub trash: bool,
    pub verbose: bool,
    pub video_extensions: Vec<String>,
}

impl MediaTidyConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    pub fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = crate::config::CONFIG_PATH.as_deref() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.mtidy)
            .with_context(|| "Failed to parse config TOML")
    }
}

impl OrganizeConfig {
    /// Default config for the given library root.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            auto: false,
            debug: false,
            dryrun: false,
            log_file: None,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            match_folders: false,
            offline: false,
            overwrite: false,
            reveal: false,
            root,
            subtitle_extensions: normalize_extensions(DEFAULT_SUBTITLE_EXTENSIONS),
            trash: false,
            verbose: false,
            video_extensions: normalize_extensions(DEFAULT_VIDEO_EXTENSIONS),
        }
    }

    /// Classify a file by its lowercase extension.
    #[must_use]
    pub fn media_kind(&self, path: &Path) -> MediaKind {
        let extension = crate::path_to_file_extension_string(path);
        if extension.is_empty() {
            MediaKind::Other
        } else if self.video_extensions.contains(&extension) {
            MediaKind::Video
        } else if self.subtitle_extensions.contains(&extension) {
            MediaKind::Subtitle
        } else {
            MediaKind::Other
        }
    }
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

/// Lowercase extensions without a leading dot, empty and repeated values removed.
///
/// ```rust
/// use media_tidy::organize::normalize_extensions;
///
/// assert_eq!(normalize_extensions(&[".MKV", "mp4", " mkv "]), vec!["mkv", "mp4"]);
/// ```
pub fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    extensions
        .iter()
        .map(|extension| extension.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|extension| !extension.is_empty())
        .unique()
        .collect()
}

impl fmt::Display for OrganizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config:")?;
        writeln!(f, "  root: {}", self.root.display())?;
        writeln!(f, "  video_extensions: {:?}", self.video_extensions)?;
        writeln!(f, "  subtitle_extensions: {:?}", self.subtitle_extensions)?;
        writeln!(f, "  auto: {}", self.auto)?;
        writeln!(f, "  dryrun: {}", self.dryrun)?;
        writeln!(f, "  offline: {}", self.offline)?;
        writeln!(f, "  overwrite: {}", self.overwrite)?;
        writeln!(f, "  trash: {}", self.trash)?;
        writeln!(f, "  reveal: {}", self.reveal)?;
        writeln!(f, "  match_folders: {}", self.match_folders)?;
        writeln!(f, "  lookup_url: {}", self.lookup_url)?;
        writeln!(f, "  lookup_timeout: {}s", self.lookup_timeout)?;
        if let Some(ref log_file) = self.log_file {
            writeln!(f, "  log_file: {}", log_file.display())?;
        }
        write!(f, "  verbose: {}", self.verbose)
    }
}
