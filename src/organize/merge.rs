use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::organize::fs_ops::{Conflict, list_directories, list_files};
use crate::organize::media::MediaItem;
use crate::organize::organizer::Organizer;
use crate::organize::parse::{CanonicalKey, parse_title_year};
use crate::organize::report::PhaseStats;
use crate::print_error;

/// Folders that share a canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Merge target: the folder with the lexicographically smallest name.
    pub original: PathBuf,
    pub duplicates: Vec<PathBuf>,
}

/// Group folders whose names parse to the same canonical key.
///
/// Only the title and year parser is used; folders without a parseable year are ignored.
/// Only groups with at least one duplicate are returned, ordered by their original.
#[must_use]
pub fn find_duplicate_groups(folders: &[PathBuf]) -> Vec<DuplicateGroup> {
    let mut sorted: Vec<(String, &PathBuf)> = folders
        .iter()
        .filter_map(|path| Some((crate::get_normalized_dir_name(path).ok()?, path)))
        .collect();
    sorted.sort();

    let mut index: HashMap<CanonicalKey, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    for (name, path) in sorted {
        let Some(key) = parse_title_year(&name) else {
            continue;
        };
        if let Some(&position) = index.get(&key) {
            groups[position].duplicates.push(path.clone());
        } else {
            index.insert(key, groups.len());
            groups.push(DuplicateGroup {
                original: path.clone(),
                duplicates: Vec::new(),
            });
        }
    }

    groups.retain(|group| !group.duplicates.is_empty());
    groups
}

impl Organizer {
    /// Merge folders that share a canonical key despite differently spelled names,
    /// then finalize each merge target.
    pub fn merge_duplicates(&mut self) -> PhaseStats {
        let mut stats = PhaseStats::default();
        let folders = match list_directories(&self.root) {
            Ok(folders) => folders,
            Err(error) => {
                print_error!("{error:#}");
                return stats;
            }
        };

        for group in find_duplicate_groups(&folders) {
            if self.config.verbose {
                println!(
                    "Found {} duplicate(s) of {}",
                    group.duplicates.len(),
                    crate::path_to_filename_string(&group.original)
                );
            }
            for duplicate in &group.duplicates {
                stats += self.merge_folder(duplicate, &group.original);
            }
            stats += self.finalize_folder(&group.original);
        }

        stats
    }

    /// Move the video and subtitle files of `duplicate` into `original` and remove `duplicate`.
    fn merge_folder(&mut self, duplicate: &Path, original: &Path) -> PhaseStats {
        let mut stats = PhaseStats::default();
        let files = match list_files(duplicate) {
            Ok(files) => files,
            Err(error) => {
                print_error!("{error:#}");
                stats.skipped += 1;
                return stats;
            }
        };

        let mut moved = 0;
        for path in files {
            let item = MediaItem::new(path, &self.config);
            if !item.kind.is_media() {
                continue;
            }
            match self.ops.move_into(&item.path, original, Conflict::Increment) {
                Ok(Some(_)) => moved += 1,
                Ok(None) => stats.skipped += 1,
                Err(error) => {
                    print_error!("{error:#}");
                    stats.skipped += 1;
                }
            }
        }
        stats.files_moved += moved;

        let removed = self.ops.remove_dir_if_empty(duplicate);
        if moved > 0 || removed {
            self.ops.record_merge(duplicate, original);
            stats.folders_merged += 1;
        }
        stats
    }
}


#[cfg(test)]
mod merge_duplicates_tests {
    use super::*;

    use tempfile::TempDir;

    use crate::organize::fs_ops::ActionKind;
    use crate::organize::ports::VideoChoice;
    use crate::organize::test_support::{Scripted, create_dir, create_file, entry_names, make_organizer};

    #[test]
    fn merges_case_variants_and_finalizes() {
        let temp = TempDir::new().unwrap();
        let original = create_dir(temp.path(), "Matrix (1999)");
        create_file(&original, "matrix.a.mkv");
        let duplicate = create_dir(temp.path(), "matrix (1999)");
        create_file(&duplicate, "matrix.b.mkv");

        let interaction = Scripted {
            choices: [VideoChoice::Keep(0)].into(),
            ..Default::default()
        };
        let mut organizer = make_organizer(&temp, interaction);
        let stats = organizer.merge_duplicates();

        assert_eq!(stats.folders_merged, 1);
        assert_eq!(stats.files_moved, 1);
        assert_eq!(stats.files_deleted, 1);
        assert_eq!(stats.files_renamed, 1);
        assert_eq!(entry_names(temp.path()), vec!["Matrix (1999)"]);
        assert_eq!(entry_names(&original), vec!["Matrix (1999).mkv"]);
    }

    #[test]
    fn clashing_names_are_incremented() {
        let temp = TempDir::new().unwrap();
        let original = create_dir(temp.path(), "Heat (1995)");
        create_file(&original, "Heat (1995).srt");
        let duplicate = create_dir(temp.path(), "heat (1995)");
        create_file(&duplicate, "Heat (1995).srt");

        let mut organizer = make_organizer(&temp, Scripted::default());
        let stats = organizer.merge_duplicates();

        assert_eq!(stats.folders_merged, 1);
        assert_eq!(entry_names(temp.path()), vec!["Heat (1995)"]);
        assert_eq!(entry_names(&original), vec!["Heat (1995).2.srt", "Heat (1995).srt"]);
    }

    #[test]
    fn other_files_keep_duplicate_folder() {
        let temp = TempDir::new().unwrap();
        create_dir(temp.path(), "Heat (1995)");
        let duplicate = create_dir(temp.path(), "heat (1995)");
        create_file(&duplicate, "heat.mkv");
        create_file(&duplicate, "notes.txt");

        let mut organizer = make_organizer(&temp, Scripted::default());
        let stats = organizer.merge_duplicates();

        assert_eq!(stats.folders_merged, 1);
        assert_eq!(entry_names(&duplicate), vec!["notes.txt"]);
        assert_eq!(entry_names(&temp.path().join("Heat (1995)")), vec!["Heat (1995).mkv"]);
    }

    #[test]
    fn no_duplicates_does_nothing() {
        let temp = TempDir::new().unwrap();
        let folder = create_dir(temp.path(), "Alien (1979)");
        create_file(&folder, "alien.mkv");

        let mut organizer = make_organizer(&temp, Scripted::default());
        let stats = organizer.merge_duplicates();

        assert_eq!(stats, PhaseStats::default());
        assert_eq!(entry_names(&folder), vec!["alien.mkv"]);
    }

    #[test]
    fn duplicate_without_media_is_not_merged() {
        let temp = TempDir::new().unwrap();
        let original = create_dir(temp.path(), "Heat (1995)");
        create_file(&original, "Heat (1995).mkv");
        let duplicate = create_dir(temp.path(), "heat (1995)");
        create_file(&duplicate, "notes.txt");

        let mut organizer = make_organizer(&temp, Scripted::default());
        let stats = organizer.merge_duplicates();

        assert_eq!(stats.folders_merged, 0);
        assert_eq!(organizer.ops.log().count(ActionKind::Merged), 0);
        assert_eq!(entry_names(&duplicate), vec!["notes.txt"]);
    }
}
