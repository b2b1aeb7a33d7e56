mod config;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use media_tidy::organize::Organizer;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Organize movie files into one \"Title (Year)\" folder per movie"
)]
pub struct Args {
    /// Optional library root directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Do not ask anything: skip names without a year and keep the first video
    #[arg(short = 'a', long)]
    auto: bool,

    /// Enable debug prints
    #[arg(short = 'D', long)]
    debug: bool,

    /// Overwrite existing files
    #[arg(short = 'f', long)]
    force: bool,

    /// Append all actions to a log file
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    log: Option<PathBuf>,

    /// Match files without a year to existing folders by title
    #[arg(short = 'm', long)]
    match_folders: bool,

    /// Skip online year lookups
    #[arg(short = 'o', long)]
    offline: bool,

    /// Only print changes without moving or renaming files
    #[arg(short = 'p', long)]
    print: bool,

    /// Open the folder in the file manager before choosing a video
    #[arg(short = 'r', long)]
    reveal: bool,

    /// Additional subtitle file extension
    #[arg(short = 's', long, num_args = 1, action = clap::ArgAction::Append, value_name = "EXTENSION")]
    subtitle_ext: Vec<String>,

    /// Move deleted videos to the trash
    #[arg(short = 't', long)]
    trash: bool,

    /// Year lookup timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Additional video file extension
    #[arg(short = 'x', long, num_args = 1, action = clap::ArgAction::Append, value_name = "EXTENSION")]
    video_ext: Vec<String>,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        return media_tidy::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"));
    }

    let config = config::from_args(args)?;
    if config.debug {
        println!("{config}");
    }
    Organizer::new(config)?.run();
    Ok(())
}

#[cfg(test)]
mod cli_args_tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from(["test", "-a", "-p", "-o", "-t", "-m"]).expect("should parse");
        assert!(args.auto);
        assert!(args.print);
        assert!(args.offline);
        assert!(args.trash);
        assert!(args.match_folders);
        assert!(!args.force);
        assert!(!args.reveal);
    }

    #[test]
    fn parses_multiple_extension_args() {
        let args = Args::try_parse_from(["test", "-x", "m4v", "-x", "wmv", "-s", "ass"]).expect("should parse");
        assert_eq!(args.video_ext, vec!["m4v", "wmv"]);
        assert_eq!(args.subtitle_ext, vec!["ass"]);
    }

    #[test]
    fn parses_path_timeout_and_log() {
        let args = Args::try_parse_from(["test", "/movies", "--timeout", "3", "--log", "/tmp/mtidy.log"])
            .expect("should parse");
        assert_eq!(args.path, Some(PathBuf::from("/movies")));
        assert_eq!(args.timeout, Some(3));
        assert_eq!(args.log, Some(PathBuf::from("/tmp/mtidy.log")));
    }

    #[test]
    fn rejects_invalid_timeout() {
        assert!(Args::try_parse_from(["test", "--timeout", "soon"]).is_err());
    }

    #[test]
    fn command_is_valid() {
        Args::command().debug_assert();
    }
}
