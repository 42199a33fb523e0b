//! Configuration load cycle
//!
//! Reads every domain from a [`DocumentStore`], parses legacy text where
//! needed, migrates to the latest version and decodes the typed models.
//! A failing domain is reported and skipped; the other domains still load.
//!
//! Order matters in one place only: legacy settings carry the category
//! region/language, so settings are read before categories are migrated,
//! and presets are parsed last so their playlist/category names can be
//! resolved against the freshly loaded registries.
//!
//! Write-back happens after all four domains are read. A domain whose
//! legacy migration consumed data from another domain is only saved when
//! that other domain loaded too; otherwise the legacy text stays on disk and
//! the upgrade is retried next time.

use crate::document::{detect_shape, Domain, DocumentShape, VersionedDocument};
use crate::legacy::{self, LegacyLookups};
use crate::lookup::{CategoryRegistry, PlaylistRegistry};
use crate::migrations::categories::category_locale_from_legacy_settings;
use crate::migrations::{MigrationContext, MigrationLadder};
use crate::models::{CategoriesDocument, PlaylistsDocument, Preset, PresetsDocument, Settings};
use crate::store::DocumentStore;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

/// A domain that could not be loaded
#[derive(Debug)]
pub struct DomainFailure {
    pub domain: Domain,
    pub error: Error,
}

/// Result of one load cycle
#[derive(Debug, Default)]
pub struct LoadedConfiguration {
    pub settings: Settings,
    pub categories: CategoryRegistry,
    pub playlists: PlaylistRegistry,
    pub presets: Vec<Preset>,
    /// Domains that failed to load (others are still usable)
    pub failures: Vec<DomainFailure>,
    /// Domains whose stored document was older than the latest version
    pub migrated: Vec<Domain>,
}

impl LoadedConfiguration {
    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn failure(&self, domain: Domain) -> Option<&DomainFailure> {
        self.failures.iter().find(|f| f.domain == domain)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Domains whose upgrade reads data owned by another domain
///
/// Legacy settings hand the category locale to the categories migration;
/// legacy presets resolve category and playlist names to ids.
fn save_depends_on(domain: Domain) -> &'static [Domain] {
    match domain {
        Domain::Settings => &[Domain::Categories],
        Domain::Presets => &[Domain::Categories, Domain::Playlists],
        Domain::Categories | Domain::Playlists => &[],
    }
}

/// Upgraded document waiting to be saved
struct PendingSave {
    domain: Domain,
    version: u64,
    document: Value,
}

/// Runs load cycles against a store
pub struct ConfigurationLoader<'s, S: DocumentStore + ?Sized> {
    store: &'s S,
    write_back: bool,
}

impl<'s, S: DocumentStore + ?Sized> ConfigurationLoader<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            write_back: false,
        }
    }

    /// Save upgraded documents back to the store
    pub fn write_back(mut self, enabled: bool) -> Self {
        self.write_back = enabled;
        self
    }

    pub fn load(&self) -> LoadedConfiguration {
        let mut loaded = LoadedConfiguration::default();
        let mut pending = Vec::new();
        let no_categories = CategoryRegistry::default();
        let no_playlists = PlaylistRegistry::default();
        let no_lookups = LegacyLookups {
            categories: &no_categories,
            playlists: &no_playlists,
        };

        let settings_doc = self.read(Domain::Settings, no_lookups);
        let ctx = MigrationContext {
            category_locale: settings_doc
                .as_ref()
                .ok()
                .and_then(Option::as_ref)
                .and_then(category_locale_from_legacy_settings),
        };

        if let Some(settings) =
            self.finish::<Settings>(Domain::Settings, settings_doc, &ctx, &mut loaded, &mut pending)
        {
            loaded.settings = settings;
        }

        let categories_doc = self.read(Domain::Categories, no_lookups);
        if let Some(categories) =
            self.finish::<CategoriesDocument>(Domain::Categories, categories_doc, &ctx, &mut loaded, &mut pending)
        {
            loaded.categories = CategoryRegistry::new(categories);
        }

        let playlists_doc = self.read(Domain::Playlists, no_lookups);
        if let Some(playlists) =
            self.finish::<PlaylistsDocument>(Domain::Playlists, playlists_doc, &ctx, &mut loaded, &mut pending)
        {
            loaded.playlists = PlaylistRegistry::from(playlists);
        }

        let presets_doc = self.read(
            Domain::Presets,
            LegacyLookups {
                categories: &loaded.categories,
                playlists: &loaded.playlists,
            },
        );
        if let Some(presets) =
            self.finish::<PresetsDocument>(Domain::Presets, presets_doc, &ctx, &mut loaded, &mut pending)
        {
            loaded.presets = presets.presets;
        }

        if self.write_back {
            self.flush(pending, &mut loaded);
        }

        info!(
            "Configuration loaded: {} presets, {} playlists, {} categories ({} migrated, {} failed)",
            loaded.presets.len(),
            loaded.playlists.len(),
            loaded.categories.len(),
            loaded.migrated.len(),
            loaded.failures.len()
        );
        loaded
    }

    /// Stored document of a domain in structured form
    fn read(&self, domain: Domain, lookups: LegacyLookups<'_>) -> Result<Option<VersionedDocument>> {
        let Some(raw) = self.store.load(domain)? else {
            return Ok(None);
        };

        match detect_shape(&raw) {
            DocumentShape::Versioned(value) => VersionedDocument::from_value(domain, value).map(Some),
            DocumentShape::Legacy => {
                info!("{} configuration is in the legacy format", domain);
                legacy::parse(domain, &raw, lookups).map(Some)
            }
        }
    }

    /// Migrate and decode, recording failures instead of propagating them
    fn finish<T: DeserializeOwned>(
        &self,
        domain: Domain,
        document: Result<Option<VersionedDocument>>,
        ctx: &MigrationContext,
        loaded: &mut LoadedConfiguration,
        pending: &mut Vec<PendingSave>,
    ) -> Option<T> {
        let result = document.and_then(|doc| match doc {
            None => Ok(None),
            Some(doc) => self.upgrade(doc, ctx, loaded, pending).map(Some),
        });

        match result {
            Ok(None) => {
                debug!("No stored {} configuration - using defaults", domain);
                None
            }
            Ok(Some(typed)) => Some(typed),
            Err(error) => {
                warn!("Failed to load {} configuration: {}", domain, error);
                loaded.failures.push(DomainFailure { domain, error });
                None
            }
        }
    }

    fn upgrade<T: DeserializeOwned>(
        &self,
        doc: VersionedDocument,
        ctx: &MigrationContext,
        loaded: &mut LoadedConfiguration,
        pending: &mut Vec<PendingSave>,
    ) -> Result<T> {
        let domain = doc.domain();
        let latest = MigrationLadder::for_domain(domain).migrate(&doc, ctx)?;
        let typed: T = latest.decode()?;

        if latest.version() != doc.version() {
            loaded.migrated.push(domain);
            if self.write_back {
                pending.push(PendingSave {
                    domain,
                    version: latest.version(),
                    document: latest.to_value(),
                });
            }
        }

        Ok(typed)
    }

    /// Save upgraded documents whose inputs all loaded
    fn flush(&self, pending: Vec<PendingSave>, loaded: &mut LoadedConfiguration) {
        for save in pending {
            let blocked_by: Vec<Domain> = save_depends_on(save.domain)
                .iter()
                .copied()
                .filter(|dep| loaded.failure(*dep).is_some())
                .collect();
            if !blocked_by.is_empty() {
                warn!(
                    "Not saving migrated {} configuration while {:?} failed to load",
                    save.domain, blocked_by
                );
                continue;
            }

            match self.store.save(save.domain, &save.document) {
                Ok(()) => info!("Saved {} configuration as v{}", save.domain, save.version),
                Err(error) => {
                    warn!("Could not save migrated {} configuration: {}", save.domain, error);
                    loaded.failures.push(DomainFailure {
                        domain: save.domain,
                        error,
                    });
                }
            }
        }
    }
}
