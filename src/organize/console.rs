//! Interactive and non-interactive operator implementations.

use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use colored::Colorize;

use crate::organize::ports::{Interaction, VideoChoice};
use crate::{print_error, print_warning};

/// Asks the operator on the terminal.
#[derive(Debug, Default)]
pub struct ConsolePrompt {
    /// Open folders in the system file manager before asking about their videos.
    reveal: bool,
}

/// Never asks anything: names without a year are skipped,
/// the first of multiple videos is kept and nothing is split.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoPolicy;

impl ConsolePrompt {
    #[must_use]
    pub const fn new(reveal: bool) -> Self {
        Self { reveal }
    }

    /// Print the prompt and read one trimmed line.
    /// Returns `None` when stdin is closed or cannot be read.
    fn read_input(prompt: &str) -> Option<String> {
        print!("{}", prompt.magenta());
        if let Err(error) = io::stdout().flush() {
            print_error!("Failed to flush stdout: {error}");
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input.trim().to_string()),
            Err(error) => {
                print_error!("Failed to read input: {error}");
                None
            }
        }
    }

    fn print_options(options: &[String]) {
        let width = options.len().checked_ilog10().map_or(1, |d| d as usize + 1);
        for (index, option) in options.iter().enumerate() {
            println!("  [{:>width$}] 🎬 {option}", index + 1);
        }
    }
}

impl Interaction for ConsolePrompt {
    fn ask_year(&mut self, context: &str) -> Option<String> {
        Self::read_input(&format!("Enter year for {context} (or press Enter to skip): "))
            .filter(|answer| !answer.is_empty())
    }

    fn choose_video(&mut self, folder: &str, options: &[String]) -> VideoChoice {
        println!("\n{} {}", "Multiple video files in:".bold(), folder.cyan().bold());
        Self::print_options(options);
        let Some(answer) = Self::read_input("Choose the number to keep, or type 'new' to split a movie: ") else {
            return VideoChoice::Invalid;
        };
        parse_video_choice(&answer)
    }

    fn ask_new_title(&mut self) -> Option<String> {
        Self::read_input("Enter the name of the movie you want to move: ").filter(|answer| !answer.is_empty())
    }

    fn choose_split_file(&mut self, options: &[String]) -> Option<usize> {
        println!("Select file to move into the new folder:");
        Self::print_options(options);
        Self::read_input("Enter number: ")
            .and_then(|answer| answer.parse::<usize>().ok())
            .and_then(|number| number.checked_sub(1))
    }

    fn reveal_folder(&mut self, folder: &Path) {
        if self.reveal {
            reveal_in_file_manager(folder);
        }
    }
}

impl Interaction for AutoPolicy {
    fn ask_year(&mut self, _context: &str) -> Option<String> {
        None
    }

    fn choose_video(&mut self, _folder: &str, _options: &[String]) -> VideoChoice {
        VideoChoice::Keep(0)
    }

    fn ask_new_title(&mut self) -> Option<String> {
        None
    }

    fn choose_split_file(&mut self, _options: &[String]) -> Option<usize> {
        None
    }
}

/// Parse the answer to the video selection prompt.
///
/// Numbers are one-based as printed. `new` requests a split.
#[must_use]
pub(crate) fn parse_video_choice(answer: &str) -> VideoChoice {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("new") {
        return VideoChoice::Split;
    }
    answer
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .map_or(VideoChoice::Invalid, VideoChoice::Keep)
}

/// Open the folder in the platform file manager without waiting for it.
fn reveal_in_file_manager(folder: &Path) {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    };

    if let Err(error) = Command::new(opener).arg(folder).spawn() {
        print_warning!("Could not open {} with {opener}: {error}", folder.display());
    }
}
