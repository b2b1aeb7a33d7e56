use std::collections::HashSet;
use std::path::Path;

use crate::organize::fs_ops::{Conflict, list_directories, list_files};
use crate::organize::organizer::Organizer;
use crate::organize::report::PhaseStats;
use crate::print_error;

impl Organizer {
    /// Rename every folder in the root to its canonical `Title (Year)` name.
    ///
    /// A folder whose canonical name is already used by another folder
    /// is merged into it as is, without choosing a video.
    pub fn canonicalize_folders(&mut self) -> PhaseStats {
        let mut stats = PhaseStats::default();
        let folders = match list_directories(&self.root) {
            Ok(folders) => folders,
            Err(error) => {
                print_error!("{error:#}");
                return stats;
            }
        };

        // Current NFC folder names, kept in sync with the renames and merges below
        let mut names: HashSet<String> = folders
            .iter()
            .filter_map(|path| crate::get_normalized_dir_name(path).ok())
            .collect();

        for folder in folders {
            let name = match crate::get_normalized_dir_name(&folder) {
                Ok(name) => name,
                Err(error) => {
                    print_error!("{error:#}");
                    stats.skipped += 1;
                    continue;
                }
            };

            let context = format!("folder '{name}'");
            let Some(key) = self.resolve(&name, &context) else {
                self.ops.skip(&folder, "no year found");
                stats.skipped += 1;
                continue;
            };

            let canonical = key.folder_name();
            let current = name;
            if current == canonical {
                continue;
            }

            let target = self.root.join(&canonical);
            let case_only = current.to_lowercase() == canonical.to_lowercase();
            let taken = names.contains(&canonical) || (target.exists() && !case_only);

            if taken {
                if is_same_directory(&folder, &target) {
                    continue;
                }
                stats += self.blind_merge(&folder, &target);
                names.remove(&current);
                continue;
            }

            match self.ops.rename(&folder, &canonical, Conflict::Skip) {
                Ok(Some(_)) => {
                    stats.folders_renamed += 1;
                    names.remove(&current);
                    names.insert(canonical);
                }
                Ok(None) => stats.skipped += 1,
                Err(error) => {
                    print_error!("{error:#}");
                    stats.skipped += 1;
                }
            }
        }

        stats
    }

    /// Move every entry of `source` into `target` and remove `source` if it ends up empty.
    fn blind_merge(&mut self, source: &Path, target: &Path) -> PhaseStats {
        let mut stats = PhaseStats::default();
        let entries = match (list_files(source), list_directories(source)) {
            (Ok(files), Ok(dirs)) => files.into_iter().chain(dirs),
            (Err(error), _) | (_, Err(error)) => {
                print_error!("{error:#}");
                stats.skipped += 1;
                return stats;
            }
        };

        let mut moved = 0;
        for entry in entries {
            match self.ops.move_into(&entry, target, Conflict::Increment) {
                Ok(Some(_)) => moved += 1,
                Ok(None) => stats.skipped += 1,
                Err(error) => {
                    print_error!("{error:#}");
                    stats.skipped += 1;
                }
            }
        }
        stats.files_moved += moved;

        let removed = self.ops.remove_dir_if_empty(source);
        if moved > 0 || removed {
            self.ops.record_merge(source, target);
            stats.folders_merged += 1;
        }
        stats
    }
}

/// Both paths point to the same directory, for example NFD and NFC spellings
/// of one name on a normalization-insensitive file system.
fn is_same_directory(first: &Path, second: &Path) -> bool {
    match (dunce::canonicalize(first), dunce::canonicalize(second)) {
        (Ok(first), Ok(second)) => first == second,
        _ => false,
    }
}

#[cfg(test)]
mod canonicalize_folders_tests {
    use super::*;

    use std::collections::HashMap;

    use tempfile::TempDir;

    use crate::organize::fs_ops::ActionKind;
    use crate::organize::test_support::{
        Scripted, TableLookup, create_dir, create_file, entry_names, make_dryrun_organizer, make_organizer,
        make_organizer_with_lookup,
    };

    #[test]
    fn renames_folder_with_junk() {
        let temp = TempDir::new().unwrap();
        let folder = create_dir(temp.path(), "Inception.2010.1080p.BluRay");
        create_file(&folder, "movie.mkv");

        let mut organizer = make_organizer(&temp, Scripted::default());
        let stats = organizer.canonicalize_folders();

        assert_eq!(stats.folders_renamed, 1);
        assert_eq!(entry_names(temp.path()), vec!["Inception (2010)"]);
        assert_eq!(entry_names(&temp.path().join("Inception (2010)")), vec!["movie.mkv"]);
    }

    #[test]
    fn canonical_folder_is_untouched() {
        let temp = TempDir::new().unwrap();
        create_dir(temp.path(), "Alien (1979)");

        let mut organizer = make_organizer(&temp, Scripted::default());
        let stats = organizer.canonicalize_folders();

        assert_eq!(stats, PhaseStats::default());
        assert!(organizer.actions().is_empty());
    }

    #[test]
    fn manual_year_renames_folder() {
        let temp = TempDir::new().unwrap();
        let folder = create_dir(temp.path(), "Unknown Film");
        create_file(&folder, "film.avi");

        let interaction = Scripted {
            years: ["1999".to_string()].into(),
            ..Default::default()
        };
        let mut organizer = make_organizer(&temp, interaction);
        let stats = organizer.canonicalize_folders();

        assert_eq!(stats.folders_renamed, 1);
        assert_eq!(entry_names(temp.path()), vec!["Unknown Film (1999)"]);
    }

    #[test]
    fn lookup_year_renames_folder() {
        let temp = TempDir::new().unwrap();
        create_dir(temp.path(), "Mr.Nobody");

        let lookup = TableLookup(HashMap::from([("Mr Nobody".to_string(), "2009".to_string())]));
        let mut organizer = make_organizer_with_lookup(&temp, lookup, Scripted::default());
        organizer.canonicalize_folders();

        assert_eq!(entry_names(temp.path()), vec!["Mr Nobody (2009)"]);
    }

    #[test]
    fn declined_prompt_skips_folder() {
        let temp = TempDir::new().unwrap();
        create_dir(temp.path(), "Extras");

        let mut organizer = make_organizer(&temp, Scripted::default());
        let stats = organizer.canonicalize_folders();

        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.changes(), 0);
        assert_eq!(entry_names(temp.path()), vec!["Extras"]);
    }

    #[test]
    fn taken_name_is_blind_merged() {
        let temp = TempDir::new().unwrap();
        let target = create_dir(temp.path(), "Heat (1995)");
        create_file(&target, "Heat (1995).mkv");
        let source = create_dir(temp.path(), "Heat.1995.DVDRip");
        create_file(&source, "Heat (1995).mkv");
        create_file(&source, "Heat.1995.srt");

        let mut organizer = make_organizer(&temp, Scripted::default());
        let stats = organizer.canonicalize_folders();

        assert_eq!(stats.folders_merged, 1);
        assert_eq!(stats.files_moved, 2);
        assert_eq!(entry_names(temp.path()), vec!["Heat (1995)"]);
        assert_eq!(
            entry_names(&target),
            vec!["Heat (1995).2.mkv", "Heat (1995).mkv", "Heat.1995.srt"]
        );
    }

    #[test]
    fn keeps_title_capitalization() {
        let temp = TempDir::new().unwrap();
        let folder = create_dir(temp.path(), "heat.1995");
        create_file(&folder, "heat.mkv");

        let mut organizer = make_organizer(&temp, Scripted::default());
        organizer.canonicalize_folders();
        assert_eq!(entry_names(temp.path()), vec!["heat (1995)"]);
    }

    #[test]
    fn dryrun_keeps_folders() {
        let temp = TempDir::new().unwrap();
        create_dir(temp.path(), "Inception.2010");

        let mut organizer = make_dryrun_organizer(&temp, Scripted::default());
        let stats = organizer.canonicalize_folders();

        assert_eq!(stats.folders_renamed, 1);
        assert_eq!(entry_names(temp.path()), vec!["Inception.2010"]);
    }

    #[test]
    fn decomposed_canonical_name_is_untouched() {
        let temp = TempDir::new().unwrap();
        let folder = create_dir(temp.path(), "Ame\u{301}lie (2001)");
        create_file(&folder, "Ame\u{301}lie (2001).mkv");

        let mut organizer = make_organizer(&temp, Scripted::default());
        let stats = organizer.canonicalize_folders();

        assert_eq!(stats, PhaseStats::default());
        assert!(organizer.actions().is_empty());
        assert_eq!(entry_names(&folder), vec!["Ame\u{301}lie (2001).mkv"]);
    }

    #[test]
    fn same_directory_is_never_merged_into_itself() {
        let temp = TempDir::new().unwrap();
        let folder = create_dir(temp.path(), "Heat (1995)");
        assert!(is_same_directory(&folder, &temp.path().join("Heat (1995)")));
        assert!(!is_same_directory(&folder, &temp.path().join("Heat (1996)")));
    }

    #[test]
    fn failed_merge_is_not_counted() {
        let temp = TempDir::new().unwrap();
        create_file(temp.path(), "Heat (1995)");
        let source = create_dir(temp.path(), "Heat.1995.DVDRip");
        create_file(&source, "heat.mkv");

        let mut organizer = make_organizer(&temp, Scripted::default());
        let stats = organizer.canonicalize_folders();

        assert_eq!(stats.folders_merged, 0);
        assert_eq!(stats.files_moved, 0);
        assert_eq!(organizer.ops.log().count(ActionKind::Merged), 0);
        assert_eq!(entry_names(&source), vec!["heat.mkv"]);
    }
}
