//! Filesystem primitives used by all passes.
//!
//! Every change goes through [`FileOps`] so it is logged before it executes
//! and skipped entirely in dryrun mode.

use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use colored::{ColoredString, Colorize};
use walkdir::WalkDir;

use crate::organize::config::OrganizeConfig;
use crate::print_warning;

/// Kind of change made to the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Created,
    Moved,
    Renamed,
    Merged,
    Deleted,
    Skipped,
}

/// One logged change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    /// Path relative to the library root.
    pub subject: String,
    /// Destination for moves, renames and merges, or the reason for a skip.
    pub detail: Option<String>,
}

/// Line-oriented record of every action taken during a run.
#[derive(Debug)]
pub struct ActionLog {
    actions: Vec<Action>,
    writer: Option<BufWriter<File>>,
    dryrun: bool,
}

/// What to do when the destination name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// Leave the source where it is.
    Skip,
    /// Append a running index to the destination name.
    Increment,
}

/// Move, rename, create and delete primitives with logging.
#[derive(Debug)]
pub struct FileOps {
    root: PathBuf,
    dryrun: bool,
    overwrite: bool,
    trash: bool,
    verbose: bool,
    log: ActionLog,
    /// Directories a dryrun would have created.
    planned_dirs: HashSet<PathBuf>,
    /// Paths a dryrun would have moved away or deleted.
    planned_removals: HashSet<PathBuf>,
}

impl ActionKind {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Moved => "moved",
            Self::Renamed => "renamed",
            Self::Merged => "merged",
            Self::Deleted => "deleted",
            Self::Skipped => "skipped",
        }
    }

    fn colored_tag(self) -> ColoredString {
        let tag = format!("{:<10}", format!("[{}]", self.tag()));
        match self {
            Self::Created => tag.cyan(),
            Self::Moved => tag.green(),
            Self::Renamed => tag.blue(),
            Self::Merged => tag.magenta(),
            Self::Deleted => tag.red().bold(),
            Self::Skipped => tag.yellow(),
        }
    }
}

impl Action {
    #[must_use]
    pub fn new(kind: ActionKind, subject: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            detail,
        }
    }
}

impl ActionLog {
    /// Create a log that optionally also appends to the given file.
    ///
    /// # Errors
    /// Returns an error if the log file cannot be opened.
    pub fn new(log_file: Option<&Path>, dryrun: bool) -> Result<Self> {
        let writer = match log_file {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).context("Failed to create log directory")?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?;
                Some(BufWriter::new(file))
            }
            None => None,
        };

        Ok(Self {
            actions: Vec::new(),
            writer,
            dryrun,
        })
    }

    /// Print the action, append it to the log file and keep it for the summary.
    pub fn record(&mut self, action: Action) {
        let suffix = if self.dryrun { " (dryrun)".dimmed().to_string() } else { String::new() };
        println!("{} {action}{suffix}", action.kind.colored_tag());

        if let Some(writer) = self.writer.as_mut() {
            let _ = writeln!(
                writer,
                "[{}] {:<8} {action}{}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                action.kind.tag().to_uppercase(),
                if self.dryrun { " (dryrun)" } else { "" }
            );
            let _ = writer.flush();
        }

        self.actions.push(action);
    }

    /// Write a free-form line to the log file only.
    pub fn note(&mut self, message: &str) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writeln!(writer, "[{}] {message}", Local::now().format("%Y-%m-%d %H:%M:%S"));
            let _ = writer.flush();
        }
    }

    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Number of recorded actions of the given kind.
    #[must_use]
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|action| action.kind == kind).count()
    }
}

impl FileOps {
    /// Create file operations for the configured library root.
    ///
    /// # Errors
    /// Returns an error if the log file cannot be opened.
    pub fn new(config: &OrganizeConfig) -> Result<Self> {
        Ok(Self {
            root: config.root.clone(),
            dryrun: config.dryrun,
            overwrite: config.overwrite,
            trash: config.trash,
            verbose: config.verbose,
            log: ActionLog::new(config.log_file.as_deref(), config.dryrun)?,
            planned_dirs: HashSet::new(),
            planned_removals: HashSet::new(),
        })
    }

    #[must_use]
    pub const fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ActionLog {
        &mut self.log
    }

    fn display(&self, path: &Path) -> String {
        crate::get_relative_path_or_filename(path, &self.root)
    }

    /// Create the directory unless it already exists.
    /// Returns `true` if a new directory was created.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn create_dir(&mut self, dir: &Path) -> Result<bool> {
        if dir.is_dir() || self.planned_dirs.contains(dir) {
            return Ok(false);
        }
        let action = Action::new(ActionKind::Created, self.display(dir), None);
        self.log.record(action);
        if self.dryrun {
            self.planned_dirs.insert(dir.to_path_buf());
        } else {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        Ok(true)
    }

    /// Move a file or directory into the target directory keeping its name.
    /// Returns the new path, or `None` if the move was skipped.
    ///
    /// # Errors
    /// Returns an error if the move fails.
    pub fn move_into(&mut self, source: &Path, target_dir: &Path, conflict: Conflict) -> Result<Option<PathBuf>> {
        let name = source.file_name().context("Failed to get file name")?;
        let Some(destination) = self.resolve_destination(source, target_dir.join(name), conflict)? else {
            return Ok(None);
        };

        let action = Action::new(
            ActionKind::Moved,
            self.display(source),
            Some(self.display(&destination)),
        );
        self.log.record(action);
        if self.dryrun {
            self.planned_removals.insert(source.to_path_buf());
        } else {
            fs::rename(source, &destination)
                .with_context(|| format!("Failed to move {} to {}", source.display(), destination.display()))?;
        }
        Ok(Some(destination))
    }

    /// Rename a file or directory within its parent directory.
    /// Returns the new path, or `None` if the rename was skipped.
    ///
    /// # Errors
    /// Returns an error if the rename fails.
    pub fn rename(&mut self, source: &Path, new_name: &str, conflict: Conflict) -> Result<Option<PathBuf>> {
        let old_name = crate::path_to_filename_string(source);
        let destination = source.with_file_name(new_name);
        if old_name == new_name {
            return Ok(Some(destination));
        }

        // Case-insensitive file systems report the new name as existing
        let capitalization_change_only =
            old_name.to_lowercase() == new_name.to_lowercase() && !exact_name_exists(&destination);
        let destination = if capitalization_change_only {
            destination
        } else {
            let Some(destination) = self.resolve_destination(source, destination, conflict)? else {
                return Ok(None);
            };
            destination
        };

        if self.verbose {
            crate::show_diff(&old_name, &crate::path_to_filename_string(&destination));
        }
        let action = Action::new(
            ActionKind::Renamed,
            self.display(source),
            Some(crate::path_to_filename_string(&destination)),
        );
        self.log.record(action);
        if !self.dryrun {
            let result = if capitalization_change_only {
                rename_with_temp_file(source, &destination)
            } else {
                fs::rename(source, &destination)
            };
            result.with_context(|| format!("Failed to rename {} to {}", source.display(), destination.display()))?;
        }
        Ok(Some(destination))
    }

    /// Delete a file, or move it to the trash if configured.
    ///
    /// # Errors
    /// Returns an error if the file cannot be removed.
    pub fn delete_file(&mut self, path: &Path) -> Result<()> {
        let detail = self.trash.then(|| "moved to trash".to_string());
        let action = Action::new(ActionKind::Deleted, self.display(path), detail);
        self.log.record(action);
        if self.dryrun {
            self.planned_removals.insert(path.to_path_buf());
            return Ok(());
        }
        if self.trash {
            trash::delete(path).with_context(|| format!("Failed to move {} to trash", path.display()))
        } else {
            fs::remove_file(path).with_context(|| format!("Failed to delete {}", path.display()))
        }
    }

    /// Remove a directory left empty by a merge.
    /// Failure is reported and tolerated; returns `true` if the directory is gone.
    pub fn remove_dir_if_empty(&mut self, dir: &Path) -> bool {
        let action = Action::new(ActionKind::Deleted, self.display(dir), None);
        let empty = if self.dryrun {
            self.would_be_empty(dir)
        } else {
            crate::is_directory_empty(dir)
        };
        if !empty {
            print_warning!("Leaving non-empty directory for manual cleanup: {}", dir.display());
            self.skip(dir, "directory not empty");
            return false;
        }
        if self.dryrun {
            self.log.record(action);
            self.planned_removals.insert(dir.to_path_buf());
            return true;
        }
        match fs::remove_dir(dir) {
            Ok(()) => {
                self.log.record(action);
                true
            }
            Err(error) => {
                print_warning!("Could not remove directory {}: {error}", dir.display());
                self.skip(dir, "could not remove directory");
                false
            }
        }
    }

    /// Dryrun emptiness: every entry is already planned to be moved away or deleted.
    fn would_be_empty(&self, dir: &Path) -> bool {
        fs::read_dir(dir).is_ok_and(|entries| {
            entries
                .filter_map(Result::ok)
                .all(|entry| self.planned_removals.contains(&entry.path()))
        })
    }

    /// Record a merge of one folder into another.
    pub fn record_merge(&mut self, source: &Path, target: &Path) {
        let action = Action::new(ActionKind::Merged, self.display(source), Some(self.display(target)));
        self.log.record(action);
    }

    /// Record an item left unprocessed.
    pub fn skip(&mut self, path: &Path, reason: &str) {
        let action = Action::new(ActionKind::Skipped, self.display(path), Some(reason.to_string()));
        self.log.record(action);
    }

    /// Decide the final destination path, or `None` to skip.
    fn resolve_destination(&mut self, source: &Path, destination: PathBuf, conflict: Conflict) -> Result<Option<PathBuf>> {
        if !destination.exists() {
            return Ok(Some(destination));
        }
        if self.overwrite && destination.is_file() && source.is_file() {
            return Ok(Some(destination));
        }
        match conflict {
            Conflict::Increment => get_incremented_path(&destination).map(Some),
            Conflict::Skip => {
                print_warning!("Skipping, destination already exists: {}", destination.display());
                let reason = format!("{} already exists", self.display(&destination));
                self.skip(source, &reason);
                Ok(None)
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.detail) {
            (ActionKind::Skipped | ActionKind::Deleted, Some(detail)) => write!(f, "{} ({detail})", self.subject),
            (_, Some(detail)) => write!(f, "{} → {detail}", self.subject),
            (_, None) => write!(f, "{}", self.subject),
        }
    }
}

/// List directories directly under the given directory, sorted by name.
/// Hidden directories are ignored.
///
/// # Errors
/// Returns an error if the path is not a readable directory.
pub fn list_directories(dir: &Path) -> Result<Vec<PathBuf>> {
    list_entries(dir, |entry| entry.file_type().is_dir())
}

/// List files directly under the given directory, sorted by name.
/// Hidden files are ignored.
///
/// # Errors
/// Returns an error if the path is not a readable directory.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    list_entries(dir, |entry| entry.file_type().is_file())
}

/// Materialize the listing so later changes do not affect iteration.
fn list_entries(dir: &Path, predicate: impl Fn(&walkdir::DirEntry) -> bool) -> Result<Vec<PathBuf>> {
    fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;
    Ok(WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !crate::is_hidden(entry))
        .filter_map(Result::ok)
        .filter(|entry| predicate(entry))
        .map(walkdir::DirEntry::into_path)
        .collect())
}

/// Check for an entry with exactly this name, ignoring case-insensitive matches.
fn exact_name_exists(path: &Path) -> bool {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return false;
    };
    fs::read_dir(parent).is_ok_and(|entries| entries.filter_map(Result::ok).any(|entry| entry.file_name() == name))
}

/// Rename through an intermediate name to work around case-insensitive file systems.
fn rename_with_temp_file(path: &Path, new_path: &Path) -> std::io::Result<()> {
    let temp_path = crate::append_extension_to_path(new_path.to_path_buf(), "tmp");
    fs::rename(path, &temp_path)?;
    fs::rename(&temp_path, new_path)
}

/// Append a running index to a taken name: `name.2.ext`, `name.3.ext`, ...
fn get_incremented_path(original: &Path) -> Result<PathBuf> {
    let parent = original.parent().unwrap_or_else(|| Path::new(""));
    let (name, extension) = if original.is_dir() {
        (crate::path_to_filename_string(original), String::new())
    } else {
        crate::get_normalized_file_name_and_extension(original)?
    };
    let mut index = 2;
    loop {
        let file_name = if extension.is_empty() {
            format!("{name}.{index}")
        } else {
            format!("{name}.{index}.{extension}")
        };
        let new_path = parent.join(file_name);
        if !new_path.exists() {
            return Ok(new_path);
        }
        index += 1;
    }
}
