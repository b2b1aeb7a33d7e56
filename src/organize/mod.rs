//! Media library organizer.
//!
//! Normalizes a directory of loose and half-sorted movie files into one folder per title,
//! named `Title (Year)`, holding a single video and its subtitles named after the folder.
//! The work happens in four passes over the library root:
//! grouping loose files, canonicalizing folder names, merging duplicate folders,
//! and finalizing the contents of every folder.

mod canonicalize;
mod config;
mod console;
mod finalize;
mod fs_ops;
mod group;
mod lookup;
mod media;
mod merge;
mod organizer;
mod parse;
mod ports;
mod report;
mod resolve;
mod select;
#[cfg(test)]
mod test_support;

pub use config::{
    DEFAULT_LOOKUP_TIMEOUT, DEFAULT_LOOKUP_URL, DEFAULT_SUBTITLE_EXTENSIONS, DEFAULT_VIDEO_EXTENSIONS, MediaTidyConfig,
    OrganizeConfig, normalize_extensions,
};
pub use console::{AutoPolicy, ConsolePrompt};
pub use fs_ops::{Action, ActionKind, ActionLog, Conflict, FileOps, list_directories, list_files};
pub use group::match_existing_folder;
pub use lookup::{ImdbLookup, NoLookup};
pub use media::{MediaItem, MediaKind};
pub use merge::{DuplicateGroup, find_duplicate_groups};
pub use organizer::Organizer;
pub use parse::{CanonicalKey, canonical_name, normalize_separators, parse_title_year};
pub use ports::{Interaction, VideoChoice, YearLookup};
pub use report::{PhaseStats, RunSummary};
pub use resolve::resolve_key;
