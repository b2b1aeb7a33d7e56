//! Seams to the outside world: online year lookup and operator prompts.

use std::path::Path;

/// Finds the release year for a movie title.
pub trait YearLookup {
    /// Look up the year for a title.
    ///
    /// Implementations must not fail: errors are reported and returned as `None`.
    fn lookup_year(&self, title: &str) -> Option<String>;
}

/// Operator answer when a folder has more than one video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoChoice {
    /// Keep the video at this zero-based index.
    Keep(usize),
    /// Move one of the videos to a new folder.
    Split,
    /// Unparseable answer.
    Invalid,
}

/// Decisions that need an operator.
pub trait Interaction {
    /// Ask for the year of something that could not be resolved automatically.
    fn ask_year(&mut self, context: &str) -> Option<String>;

    /// Choose which of the listed videos in a folder to keep.
    fn choose_video(&mut self, folder: &str, options: &[String]) -> VideoChoice;

    /// Ask for the title of the movie to split into its own folder.
    fn ask_new_title(&mut self) -> Option<String>;

    /// Choose the zero-based index of the video to move into the new folder.
    fn choose_split_file(&mut self, options: &[String]) -> Option<usize>;

    /// Show the folder to the operator before a decision about its contents.
    fn reveal_folder(&mut self, _folder: &Path) {}
}
