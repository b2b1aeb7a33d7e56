use std::path::{Path, PathBuf};

use crate::organize::fs_ops::Conflict;
use crate::organize::media::MediaItem;
use crate::organize::organizer::Organizer;
use crate::organize::ports::VideoChoice;
use crate::organize::report::PhaseStats;
use crate::{print_error, print_warning};

impl Organizer {
    /// Ask which of several videos in a folder is the primary one.
    ///
    /// Returns `None` when the operator split a video into its own folder instead;
    /// the folder is then left as is until the next run.
    /// An invalid or out-of-range answer keeps the first video.
    pub(crate) fn select_primary_video(
        &mut self,
        folder: &Path,
        videos: &[MediaItem],
        stats: &mut PhaseStats,
    ) -> Option<PathBuf> {
        let first = videos.first()?;
        let folder_name = crate::path_to_filename_string(folder);
        let options: Vec<String> = videos.iter().map(|video| video.file_name.clone()).collect();

        self.interaction.reveal_folder(folder);
        match self.interaction.choose_video(&folder_name, &options) {
            VideoChoice::Keep(index) if index < videos.len() => Some(videos[index].path.clone()),
            VideoChoice::Split => {
                *stats += self.split_video(videos);
                None
            }
            VideoChoice::Keep(_) | VideoChoice::Invalid => {
                print_warning!("Invalid choice, keeping {}", first.file_name);
                Some(first.path.clone())
            }
        }
    }

    /// Move one of the videos into a new folder for a different movie.
    fn split_video(&mut self, videos: &[MediaItem]) -> PhaseStats {
        let mut stats = PhaseStats::default();

        let Some(title) = self
            .interaction
            .ask_new_title()
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
        else {
            return stats;
        };

        let context = format!("'{title}'");
        let Some(key) = self.resolve(&title, &context) else {
            print_warning!("No year for {title}, nothing moved");
            return stats;
        };

        let options: Vec<String> = videos.iter().map(|video| video.file_name.clone()).collect();
        let Some(video) = self
            .interaction
            .choose_split_file(&options)
            .and_then(|index| videos.get(index))
        else {
            return stats;
        };

        let folder_name = key.folder_name();
        let target_dir = self.root.join(&folder_name);
        match self.ops.create_dir(&target_dir) {
            Ok(true) => stats.folders_created += 1,
            Ok(false) => {}
            Err(error) => {
                print_error!("{error:#}");
                stats.skipped += 1;
                return stats;
            }
        }

        let moved = match self.ops.move_into(&video.path, &target_dir, Conflict::Skip) {
            Ok(Some(path)) => {
                stats.files_moved += 1;
                path
            }
            Ok(None) => {
                stats.skipped += 1;
                return stats;
            }
            Err(error) => {
                print_error!("{error:#}");
                stats.skipped += 1;
                return stats;
            }
        };

        match self.ops.rename(&moved, &video.name_with_base(&folder_name), Conflict::Skip) {
            Ok(Some(path)) if path != moved => stats.files_renamed += 1,
            Ok(Some(_)) => {}
            Ok(None) => stats.skipped += 1,
            Err(error) => {
                print_error!("{error:#}");
                stats.skipped += 1;
            }
        }

        stats
    }
}
