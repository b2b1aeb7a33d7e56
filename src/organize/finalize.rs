use std::path::Path;

use crate::organize::fs_ops::{Conflict, list_directories, list_files};
use crate::organize::media::{MediaItem, MediaKind};
use crate::organize::organizer::Organizer;
use crate::organize::report::PhaseStats;
use crate::print_error;

impl Organizer {
    /// Reduce every folder to one video and name its contents after the folder.
    pub fn finalize_folders(&mut self) -> PhaseStats {
        let mut stats = PhaseStats::default();
        let folders = match list_directories(&self.root) {
            Ok(folders) => folders,
            Err(error) => {
                print_error!("{error:#}");
                return stats;
            }
        };

        for folder in folders {
            stats += self.finalize_folder(&folder);
        }

        stats
    }

    /// Finalize a single folder.
    ///
    /// With more than one video the operator picks the primary one and the rest are deleted.
    /// All remaining files with an extension are renamed to `{folder name}.{extension}`.
    pub(crate) fn finalize_folder(&mut self, folder: &Path) -> PhaseStats {
        let mut stats = PhaseStats::default();
        let files = match list_files(folder) {
            Ok(files) => files,
            Err(error) => {
                print_error!("{error:#}");
                stats.skipped += 1;
                return stats;
            }
        };

        let items: Vec<MediaItem> = files.into_iter().map(|path| MediaItem::new(path, &self.config)).collect();
        let (videos, others): (Vec<MediaItem>, Vec<MediaItem>) =
            items.into_iter().partition(|item| item.kind == MediaKind::Video);

        let mut to_rename = others;
        if videos.len() > 1 {
            let Some(primary) = self.select_primary_video(folder, &videos, &mut stats) else {
                return stats;
            };
            for video in videos {
                if video.path == primary {
                    to_rename.push(video);
                    continue;
                }
                match self.ops.delete_file(&video.path) {
                    Ok(()) => stats.files_deleted += 1,
                    Err(error) => {
                        print_error!("{error:#}");
                        stats.skipped += 1;
                    }
                }
            }
        } else {
            to_rename.extend(videos);
        }

        let folder_name = crate::path_to_filename_string(folder);
        for item in to_rename {
            if item.extension.is_empty() {
                continue;
            }
            let new_name = item.name_with_base(&folder_name);
            if item.file_name == new_name {
                continue;
            }
            if self.config.verbose {
                println!("{} {}", item.kind.icon(), item.file_name);
            }
            match self.ops.rename(&item.path, &new_name, Conflict::Skip) {
                Ok(Some(_)) => stats.files_renamed += 1,
                Ok(None) => stats.skipped += 1,
                Err(error) => {
                    print_error!("{error:#}");
                    stats.skipped += 1;
                }
            }
        }

        stats
    }
}
