//! Command implementations
//!
//! Kept out of `main.rs` so they can be driven from tests with a temporary
//! root folder.

use crate::fs_store::FsDocumentStore;
use crate::metadata_extractor::MetadataExtractor;
use crate::scanner::VideoScanner;
use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use vbu_common::config::{write_toml_config, TomlConfig};
use vbu_common::loader::{ConfigurationLoader, LoadedConfiguration};
use vbu_common::templating::{check_numbering_range, MetadataMarkerMode, TemplatingPipeline};
use vbu_common::{ConcreteVideoMetadata, Domain};

/// Outcome of `migrate`
#[derive(Debug)]
pub struct MigrationReport {
    pub migrated: Vec<Domain>,
    /// Domain and error message for every domain that failed
    pub failed: Vec<(Domain, String)>,
    pub dry_run: bool,
}

impl MigrationReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Human-readable summary, one line per domain
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for domain in Domain::ALL {
            let status = if let Some((_, error)) = self.failed.iter().find(|(d, _)| *d == domain) {
                format!("FAILED: {}", error)
            } else if self.migrated.contains(&domain) {
                if self.dry_run {
                    "would migrate".to_string()
                } else {
                    "migrated".to_string()
                }
            } else {
                "up to date".to_string()
            };
            lines.push(format!("{:<11} {}", domain, status));
        }
        lines.join("\n")
    }
}

/// Load every domain and, unless `dry_run`, write upgraded documents back
pub fn migrate(store: &FsDocumentStore, dry_run: bool) -> MigrationReport {
    info!(
        "Checking configuration in {}{}",
        store.root().display(),
        if dry_run { " (dry run)" } else { "" }
    );

    let loaded = ConfigurationLoader::new(store).write_back(!dry_run).load();
    MigrationReport {
        migrated: loaded.migrated.clone(),
        failed: loaded
            .failures
            .iter()
            .map(|f| (f.domain, f.error.to_string()))
            .collect(),
        dry_run,
    }
}

/// Options of `render`
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub preset: String,
    pub starting_number: u64,
    pub parallel: bool,
    pub metadata_markers: MetadataMarkerMode,
    pub inputs: Vec<PathBuf>,
}

/// Render one preset over the video files found under `inputs`
pub fn render(store: &FsDocumentStore, options: &RenderOptions) -> Result<Vec<ConcreteVideoMetadata>> {
    let loaded = ConfigurationLoader::new(store).load();
    for failure in &loaded.failures {
        warn!("{} configuration unavailable: {}", failure.domain, failure.error);
    }

    let preset = find_preset(&loaded, &options.preset)?.clone();

    let paths = VideoScanner::new().scan(&options.inputs)?;
    if paths.is_empty() {
        bail!("No video files found");
    }
    check_numbering_range(options.starting_number, paths.len())?;
    let files = MetadataExtractor::new().extract_all(&paths);

    let mut pipeline = TemplatingPipeline::standard(
        preset,
        options.starting_number,
        &loaded.playlists,
        options.metadata_markers,
    );

    let rendered = if options.parallel {
        pipeline.render_batch_parallel(&files)
    } else {
        pipeline.render_batch(&files)
    };

    info!("Rendered preset '{}' for {} files", options.preset, rendered.len());
    Ok(rendered)
}

fn find_preset<'l>(loaded: &'l LoadedConfiguration, name: &str) -> Result<&'l vbu_common::Preset> {
    if let Some(preset) = loaded.preset(name) {
        return Ok(preset);
    }
    match loaded.failure(Domain::Presets) {
        Some(failure) => Err(anyhow!(
            "Preset '{}' unavailable: presets failed to load: {}",
            name,
            failure.error
        )),
        None => Err(anyhow!("Preset '{}' not found", name)),
    }
}

/// Write a default `config.toml`
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    write_toml_config(&TomlConfig::default(), path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("✓ Wrote default configuration to {}", path.display());
    Ok(())
}
