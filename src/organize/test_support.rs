//! Scripted lookup and prompts for filesystem tests.

use std::collections::{HashMap, VecDeque};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::organize::config::OrganizeConfig;
use crate::organize::organizer::Organizer;
use crate::organize::ports::{Interaction, VideoChoice, YearLookup};

/// Lookup answering from a fixed title to year table.
#[derive(Debug, Default)]
pub struct TableLookup(pub HashMap<String, String>);

impl YearLookup for TableLookup {
    fn lookup_year(&self, title: &str) -> Option<String> {
        self.0.get(title).cloned()
    }
}

/// Prompts answered from queues; an empty queue means the operator pressed Enter.
#[derive(Debug, Default)]
pub struct Scripted {
    pub years: VecDeque<String>,
    pub choices: VecDeque<VideoChoice>,
    pub titles: VecDeque<String>,
    pub split_files: VecDeque<usize>,
}

impl Interaction for Scripted {
    fn ask_year(&mut self, _context: &str) -> Option<String> {
        self.years.pop_front()
    }

    fn choose_video(&mut self, _folder: &str, _options: &[String]) -> VideoChoice {
        self.choices.pop_front().unwrap_or(VideoChoice::Invalid)
    }

    fn ask_new_title(&mut self) -> Option<String> {
        self.titles.pop_front()
    }

    fn choose_split_file(&mut self, _options: &[String]) -> Option<usize> {
        self.split_files.pop_front()
    }
}

pub fn create_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).expect("Failed to create test file");
    path
}

pub fn create_dir(parent: &Path, name: &str) -> PathBuf {
    let path = parent.join(name);
    fs::create_dir_all(&path).expect("Failed to create test directory");
    path
}

/// Sorted names of the entries in a directory.
pub fn entry_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

pub fn make_organizer(temp: &TempDir, interaction: Scripted) -> Organizer {
    make_organizer_with_lookup(temp, TableLookup::default(), interaction)
}

pub fn make_organizer_with_lookup(temp: &TempDir, lookup: TableLookup, interaction: Scripted) -> Organizer {
    let config = OrganizeConfig::new(temp.path().to_path_buf());
    Organizer::with_ports(config, Box::new(lookup), Box::new(interaction)).expect("Failed to create organizer")
}

pub fn make_dryrun_organizer(temp: &TempDir, interaction: Scripted) -> Organizer {
    let mut config = OrganizeConfig::new(temp.path().to_path_buf());
    config.dryrun = true;
    Organizer::with_ports(config, Box::new(TableLookup::default()), Box::new(interaction))
        .expect("Failed to create organizer")
}
