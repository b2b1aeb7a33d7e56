use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

use crate::organize::config::OrganizeConfig;
use crate::organize::console::{AutoPolicy, ConsolePrompt};
use crate::organize::fs_ops::{Action, FileOps};
use crate::organize::lookup::{ImdbLookup, NoLookup};
use crate::organize::parse::CanonicalKey;
use crate::organize::ports::{Interaction, YearLookup};
use crate::organize::report::{PhaseStats, RunSummary};
use crate::organize::resolve::resolve_key;
use crate::print_bold;

/// Runs the four organizing passes over a library root.
pub struct Organizer {
    pub(crate) root: PathBuf,
    pub(crate) config: OrganizeConfig,
    pub(crate) lookup: Box<dyn YearLookup>,
    pub(crate) interaction: Box<dyn Interaction>,
    pub(crate) ops: FileOps,
}

impl Organizer {
    /// Create an organizer with the lookup and prompts selected by the config.
    ///
    /// # Errors
    /// Returns an error if the root is not a directory,
    /// the HTTP client cannot be built or the log file cannot be opened.
    pub fn new(config: OrganizeConfig) -> Result<Self> {
        let lookup: Box<dyn YearLookup> = if config.offline {
            Box::new(NoLookup)
        } else {
            Box::new(ImdbLookup::new(
                &config.lookup_url,
                Duration::from_secs(config.lookup_timeout),
                config.verbose,
            )?)
        };
        let interaction: Box<dyn Interaction> = if config.auto {
            Box::new(AutoPolicy)
        } else {
            Box::new(ConsolePrompt::new(config.reveal))
        };
        Self::with_ports(config, lookup, interaction)
    }

    /// Create an organizer with explicit lookup and interaction implementations.
    ///
    /// # Errors
    /// Returns an error if the root is not a directory or the log file cannot be opened.
    pub fn with_ports(
        config: OrganizeConfig,
        lookup: Box<dyn YearLookup>,
        interaction: Box<dyn Interaction>,
    ) -> Result<Self> {
        if !config.root.is_dir() {
            anyhow::bail!("Library root is not a directory: {}", config.root.display());
        }
        let ops = FileOps::new(&config)?;
        Ok(Self {
            root: config.root.clone(),
            config,
            lookup,
            interaction,
            ops,
        })
    }

    /// Run all passes in order and print the summary.
    pub fn run(&mut self) -> RunSummary {
        self.ops.log_mut().note(&format!("START \"{}\"", self.root.display()));

        print_bold!("\n📂 Grouping loose files");
        let grouped = self.group_loose_files();
        self.print_phase_done(&grouped);

        print_bold!("\n🏷️  Renaming folders");
        let canonicalized = self.canonicalize_folders();
        self.print_phase_done(&canonicalized);

        print_bold!("\n📦 Merging duplicate folders");
        let merged = self.merge_duplicates();
        self.print_phase_done(&merged);

        print_bold!("\n🎞️  Finalizing folders");
        let finalized = self.finalize_folders();
        self.print_phase_done(&finalized);

        let summary = RunSummary {
            grouped,
            canonicalized,
            merged,
            finalized,
        };
        summary.print_summary(self.config.dryrun);

        let total = summary.total();
        self.ops.log_mut().note(&format!(
            "END files moved: {}, folders renamed: {}, folders merged: {}, files deleted: {}",
            total.files_moved, total.folders_renamed, total.folders_merged, total.files_deleted
        ));
        summary
    }

    /// Every action taken so far.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        self.ops.log().actions()
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a name with parser, lookup and prompt.
    pub(crate) fn resolve(&mut self, raw_name: &str, context: &str) -> Option<CanonicalKey> {
        resolve_key(raw_name, context, self.lookup.as_ref(), self.interaction.as_mut())
    }

    fn print_phase_done(&self, stats: &PhaseStats) {
        if self.config.verbose {
            println!("{} change(s), {} skipped", stats.changes(), stats.skipped);
        } else if stats.changes() == 0 {
            println!("Nothing to do");
        }
    }
}

impl fmt::Display for Organizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Root: {}", self.root.display())?;
        write!(f, "{}", self.config)
    }
}
