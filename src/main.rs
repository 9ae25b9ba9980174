//! Entry point for the talk gallery.
//!
//! - Parse command-line arguments and load `conf/config.toml`.
//! - Either print to the terminal (`--print`, `--languages`) or open the
//!   window with the resolved archive and catalog.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

use talk_gallery::app::{self, LaunchOptions};
use talk_gallery::archive::LoadRequest;
use talk_gallery::cli::{CliArgs, CliError};
use talk_gallery::config::{load_config, DEFAULT_CONFIG_PATH};
use talk_gallery::headless;
use talk_gallery::state::library::Library;

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = CliArgs::parse();
    args.validate()?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = load_config(&config_path);
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if std::env::var_os("RUST_LOG").is_none() {
        set_log_level(reload_handle, config.log_level.as_filter_str());
    }

    let archive_dir = args.archive.clone().or_else(|| config.archive_dir.clone());
    let catalog_path = args
        .catalog
        .clone()
        .or_else(|| config.catalog_path.clone())
        .or_else(Library::default_db_path);
    if catalog_path.is_none() {
        warn!("No data directory found; using an in-memory catalog");
    }

    info!(
        config = %config_path.display(),
        page_size = config.page_size,
        level = %config.log_level,
        theme = %config.theme,
        "Starting talk gallery"
    );

    if args.headless() {
        let flag = if args.languages { "--languages" } else { "--print" };
        let archive_dir = archive_dir.ok_or(CliError::MissingArchive { flag })?;
        let request = LoadRequest {
            generation: 1,
            archive_dir,
            catalog_path,
        };
        let stdout = io::stdout().lock();
        let _stdout = if args.languages {
            headless::print_languages(&request, stdout)?
        } else {
            headless::print_page(&request, &config, args.language.as_deref(), args.page, stdout)?
        };
        return Ok(());
    }

    app::run(LaunchOptions {
        config,
        archive_dir,
        catalog_path,
        language: args.language,
    })
    .context("Failed to start the GUI")?;
    Ok(())
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}
