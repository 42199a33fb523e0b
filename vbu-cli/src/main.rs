//! vbu - video batch uploader configuration tool
//!
//! Migrates stored configuration to the current format and renders presets
//! into per-video metadata.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use vbu_cli::commands::{self, RenderOptions};
use vbu_cli::FsDocumentStore;
use vbu_common::config::{
    default_config_path, load_toml_config_or_default, LoggingConfig, RootFolderResolver, TomlConfig,
};
use vbu_common::templating::MetadataMarkerMode;

/// Command-line arguments for vbu
#[derive(Parser, Debug)]
#[command(name = "vbu")]
#[command(about = "Configuration migration and preset rendering for the video batch uploader")]
#[command(version)]
struct Cli {
    /// Root folder holding the configuration documents
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Bootstrap config file (default: <config dir>/vbu/config.toml)
    #[arg(short, long, global = true, env = "VBU_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upgrade every stored document to the latest format
    Migrate {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Render a preset for a batch of video files (JSON on stdout)
    Render {
        /// Preset name
        #[arg(short, long)]
        preset: String,

        /// Episode number of the first file
        #[arg(short, long)]
        start: Option<u64>,

        /// Render on all cores
        #[arg(long)]
        parallel: bool,

        /// `substitute` or `key-list`
        #[arg(long)]
        metadata_markers: Option<MetadataMarkerMode>,

        /// Video files or directories, in batch order
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => default_config_path()?,
    };
    let toml_config = if matches!(cli.command, Command::InitConfig { .. }) {
        TomlConfig::default()
    } else {
        load_toml_config_or_default(&config_path)
    };

    init_tracing(&toml_config.logging)?;
    info!("Starting vbu v{}", env!("CARGO_PKG_VERSION"));

    if let Command::InitConfig { force } = cli.command {
        return commands::init_config(&config_path, force);
    }

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(cli.root)
        .with_toml_config(&toml_config)
        .resolve();
    info!("Root folder: {}", root_folder.display());
    let store = FsDocumentStore::new(root_folder);

    match cli.command {
        Command::Migrate { dry_run } => {
            let report = commands::migrate(&store, dry_run);
            println!("{}", report.summary());
            if !report.is_success() {
                anyhow::bail!("{} domain(s) failed to migrate", report.failed.len());
            }
        }
        Command::Render {
            preset,
            start,
            parallel,
            metadata_markers,
            paths,
        } => {
            let templating = &toml_config.templating;
            let options = RenderOptions {
                preset,
                starting_number: start.unwrap_or(templating.starting_number),
                parallel: parallel || templating.parallel,
                metadata_markers: metadata_markers.unwrap_or(templating.metadata_markers),
                inputs: paths,
            };
            let rendered = commands::render(&store, &options)?;

            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &rendered)?;
            writeln!(stdout)?;
        }
        Command::InitConfig { .. } => {}
    }

    Ok(())
}

/// Log to stderr (or the configured file); `RUST_LOG` overrides the level
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            BoxMakeWriter::new(std::sync::Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();
    Ok(())
}
