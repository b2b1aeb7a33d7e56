use itertools::Itertools;

use crate::organize::fs_ops::{Conflict, list_directories, list_files};
use crate::organize::media::MediaItem;
use crate::organize::organizer::Organizer;
use crate::organize::parse::{normalize_separators, parse_title_year};
use crate::organize::report::PhaseStats;
use crate::print_error;

/// Existing folder that loose files can be matched against by title.
#[derive(Debug, Clone)]
struct FolderTitle {
    /// Lowercase title without the year.
    title: String,
    name: String,
}

impl Organizer {
    /// Move video and subtitle files lying directly in the root into their title folders.
    pub fn group_loose_files(&mut self) -> PhaseStats {
        let mut stats = PhaseStats::default();
        let files = match list_files(&self.root) {
            Ok(files) => files,
            Err(error) => {
                print_error!("{error:#}");
                return stats;
            }
        };

        let folders = if self.config.match_folders {
            self.folder_titles()
        } else {
            Vec::new()
        };

        for path in files {
            let item = MediaItem::new(path, &self.config);
            if !item.kind.is_media() {
                continue;
            }

            let Some(folder_name) = self.folder_for_loose_file(&item, &folders) else {
                self.ops.skip(&item.path, "no year found");
                stats.skipped += 1;
                continue;
            };

            let target_dir = self.root.join(&folder_name);
            match self.ops.create_dir(&target_dir) {
                Ok(true) => stats.folders_created += 1,
                Ok(false) => {}
                Err(error) => {
                    print_error!("{error:#}");
                    stats.skipped += 1;
                    continue;
                }
            }

            match self.ops.move_into(&item.path, &target_dir, Conflict::Skip) {
                Ok(Some(_)) => stats.files_moved += 1,
                Ok(None) => stats.skipped += 1,
                Err(error) => {
                    print_error!("{error:#}");
                    stats.skipped += 1;
                }
            }
        }

        stats
    }

    /// Folder name for a loose file, or `None` if it stays where it is.
    fn folder_for_loose_file(&mut self, item: &MediaItem, folders: &[FolderTitle]) -> Option<String> {
        if let Some(key) = parse_title_year(&item.stem) {
            return Some(key.folder_name());
        }
        if let Some(name) = match_existing_folder(&item.stem, folders.iter().map(|f| (f.title.as_str(), f.name.as_str())))
        {
            if self.config.verbose {
                println!("Matched {} to existing folder {name}", item.file_name);
            }
            return Some(name);
        }
        let context = format!("'{}'", item.file_name);
        self.resolve(&item.stem, &context).map(|key| key.folder_name())
    }

    /// Titles of the folders in the root that already have a year.
    fn folder_titles(&self) -> Vec<FolderTitle> {
        list_directories(&self.root)
            .unwrap_or_default()
            .iter()
            .filter_map(|path| {
                let name = crate::get_normalized_dir_name(path).ok()?;
                let key = parse_title_year(&name)?;
                Some(FolderTitle {
                    title: key.title.to_lowercase(),
                    name,
                })
            })
            .collect()
    }
}

/// Find the folder whose title appears in the file name, ignoring case.
///
/// This is an approximate heuristic: a short title like "Up" matches many names.
/// The longest matching title wins.
///
/// ```rust
/// use media_tidy::organize::match_existing_folder;
///
/// let folders = [("alien", "Alien (1979)"), ("aliens", "Aliens (1986)")];
/// assert_eq!(
///     match_existing_folder("aliens_subs_english", folders).as_deref(),
///     Some("Aliens (1986)")
/// );
/// assert_eq!(match_existing_folder("predator", folders), None);
/// ```
pub fn match_existing_folder<'a>(
    file_stem: &str,
    folders: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Option<String> {
    let normalized = normalize_separators(&file_stem.replace('_', " ")).to_lowercase();
    folders
        .into_iter()
        .filter(|(title, _)| !title.is_empty() && normalized.contains(&title.to_lowercase()))
        .sorted_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.1.cmp(b.1)))
        .map(|(_, name)| name.to_string())
        .next()
}
