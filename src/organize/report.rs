use std::ops::AddAssign;

use colored::Colorize;

/// Counters returned by each pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStats {
    pub files_moved: usize,
    pub files_renamed: usize,
    pub files_deleted: usize,
    pub folders_created: usize,
    pub folders_renamed: usize,
    pub folders_merged: usize,
    pub skipped: usize,
}

/// Result of a full run, one entry per pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub grouped: PhaseStats,
    pub canonicalized: PhaseStats,
    pub merged: PhaseStats,
    pub finalized: PhaseStats,
}

impl PhaseStats {
    /// Number of changes made to the library.
    #[must_use]
    pub const fn changes(&self) -> usize {
        self.files_moved
            + self.files_renamed
            + self.files_deleted
            + self.folders_created
            + self.folders_renamed
            + self.folders_merged
    }
}

impl AddAssign for PhaseStats {
    fn add_assign(&mut self, other: Self) {
        self.files_moved += other.files_moved;
        self.files_renamed += other.files_renamed;
        self.files_deleted += other.files_deleted;
        self.folders_created += other.folders_created;
        self.folders_renamed += other.folders_renamed;
        self.folders_merged += other.folders_merged;
        self.skipped += other.skipped;
    }
}

impl RunSummary {
    /// Sum of all passes.
    #[must_use]
    pub fn total(&self) -> PhaseStats {
        let mut total = self.grouped;
        total += self.canonicalized;
        total += self.merged;
        total += self.finalized;
        total
    }

    pub fn print_summary(&self, dryrun: bool) {
        let total = self.total();
        let header = if dryrun { "\n--- Summary (dryrun) ---" } else { "\n--- Summary ---" };
        println!("{}", header.bold().magenta());
        println!("📦 Files moved:        {}", total.files_moved);
        println!("🔁 Folders renamed:    {}", total.folders_renamed);
        println!("🗂️  Folders merged:     {}", total.folders_merged);
        println!("📁 Folders created:    {}", total.folders_created);
        println!("✏️  Files renamed:      {}", total.files_renamed);
        println!(
            "🗑️  Files deleted:      {}",
            if total.files_deleted > 0 {
                total.files_deleted.to_string().red()
            } else {
                "0".normal()
            }
        );
        println!(
            "⏭️  Skipped:            {}",
            if total.skipped > 0 {
                total.skipped.to_string().yellow()
            } else {
                "0".normal()
            }
        );
        if total.changes() == 0 {
            println!("{}", "Library is already organized".green());
        }
    }
}
