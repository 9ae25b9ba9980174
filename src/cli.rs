use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "talk-gallery",
    version,
    about = "Browse a ted2zim TED talk archive",
    long_about = "Talk Gallery opens a ted2zim build directory and shows its talks as a paginated grid that can be filtered by subtitle language.\n\nExamples:\n  talk-gallery ./build\n  talk-gallery ./build --print --language fr --page 2\n  talk-gallery ./build --languages"
)]
pub struct CliArgs {
    #[arg(value_name = "ARCHIVE_DIR", help = "ted2zim build directory (contains assets/data.js).")]
    pub archive: Option<PathBuf>,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to config file (defaults to conf/config.toml)."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "catalog",
        value_name = "FILE",
        help = "Catalog database to use instead of the one in the user data directory."
    )]
    pub catalog: Option<PathBuf>,

    #[arg(
        short = 'l',
        long = "language",
        value_name = "TAG",
        help = "Start filtered to this language (\"lang-all\" for every language)."
    )]
    pub language: Option<String>,

    #[arg(
        short = 'p',
        long = "page",
        value_name = "N",
        default_value_t = 1,
        help_heading = "Headless",
        help = "Page to print with --print (1-based)."
    )]
    pub page: usize,

    #[arg(
        long = "page-size",
        value_name = "N",
        help = "Talks per page (overrides the config)."
    )]
    pub page_size: Option<usize>,

    #[arg(
        long = "print",
        help_heading = "Headless",
        help = "Print one page as text instead of opening the window."
    )]
    pub print: bool,

    #[arg(
        long = "languages",
        help_heading = "Headless",
        help = "List the archive's languages with talk counts and exit."
    )]
    pub languages: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("--page must be at least 1")]
    InvalidPage,

    #[error("--page-size must be at least 1")]
    InvalidPageSize,

    #[error("{flag} needs an ARCHIVE_DIR (or archive_dir in the config)")]
    MissingArchive { flag: &'static str },
}

impl CliArgs {
    pub fn validate(&self) -> Result<(), CliError> {
        if self.page == 0 {
            return Err(CliError::InvalidPage);
        }
        if self.page_size == Some(0) {
            return Err(CliError::InvalidPageSize);
        }
        Ok(())
    }

    /// Whether this run stays in the terminal
    pub fn headless(&self) -> bool {
        self.print || self.languages
    }
}
