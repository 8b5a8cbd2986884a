//! Sticky headings - Entry Point

use clap::Parser;
use sticky_headings::model::DisplayMode;
use std::path::PathBuf;
use tracing::info;

/// Sticky headings - read markdown with the current section pinned on top
#[derive(Parser, Debug)]
#[command(name = "sticky")]
#[command(version)]
#[command(about = "Markdown reader that keeps the headings of the current section in view")]
pub struct Args {
    /// Markdown files to open, one pane each
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Display mode: ancestors plus earlier siblings, or ancestors only
    #[arg(short, long, value_parser = ["default", "concise"])]
    pub mode: Option<String>,

    /// Maximum number of pinned headings (0 = unlimited)
    #[arg(long)]
    pub max: Option<usize>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn display_mode(&self) -> Option<DisplayMode> {
        self.mode.as_deref().map(|mode| match mode {
            "concise" => DisplayMode::Concise,
            _ => DisplayMode::Default,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = sticky_headings::config::load_config_with_precedence(args.config.clone())?;
        let merged = sticky_headings::config::merge_config(config_file);
        let with_env = sticky_headings::config::apply_env_overrides(merged);
        sticky_headings::config::apply_cli_overrides(with_env, args.display_mode(), args.max)
    };

    sticky_headings::logging::init(&config.log_file_path)?;

    info!(config = ?config, files = ?args.files, "Configuration loaded and resolved");

    // Settings changes are written back to the file they were read from
    let config_path = sticky_headings::config::resolve_config_path(args.config.clone());

    sticky_headings::view::run(&args.files, config, config_path, args.no_color)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["sticky", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["sticky", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_files_are_required() {
        let err = Args::try_parse_from(["sticky"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let args = Args::parse_from(["sticky", "notes.md"]);
        assert_eq!(args.files, vec![PathBuf::from("notes.md")]);
        assert_eq!(args.display_mode(), None);
        assert_eq!(args.max, None);
        assert!(!args.no_color);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_multiple_files() {
        let args = Args::parse_from(["sticky", "a.md", "b.md"]);
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn test_mode_and_max_overrides() {
        let args = Args::parse_from(["sticky", "--mode", "concise", "--max", "3", "a.md"]);
        assert_eq!(args.display_mode(), Some(DisplayMode::Concise));
        assert_eq!(args.max, Some(3));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = Args::try_parse_from(["sticky", "--mode", "verbose", "a.md"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_config_path() {
        let args = Args::parse_from(["sticky", "--config", "/tmp/sticky.toml", "a.md"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/sticky.toml")));
    }
}
