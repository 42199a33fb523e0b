//! Configuration document migrations
//!
//! Every domain has a ladder of numbered upgrade steps. Step `N` takes a
//! document from version `N` to `N + 1`; the ladder applies the remaining
//! steps in ascending order until the latest version is reached.
//!
//! # Migration Guidelines
//!
//! 1. **Never modify existing steps** - documents written by old builds must
//!    keep upgrading the same way
//! 2. **Always add new steps** - bump [`LATEST_VERSION`] and register one more
//!    step per domain; existing links stay untouched
//! 3. **Steps are pure** - they borrow the input and return a new document;
//!    the ladder stamps the new version
//! 4. **Fail closed** - documents newer than [`LATEST_VERSION`] are refused,
//!    never downgraded
//!
//! # Example Step
//!
//! ```rust,ignore
//! fn migrate_v3(doc: &VersionedDocument, _ctx: &MigrationContext) -> Result<VersionedDocument> {
//!     let mut fields = doc.fields().clone();
//!     fields.insert("newField".to_string(), Value::Bool(false));
//!     Ok(VersionedDocument::new(doc.domain(), doc.version(), fields))
//! }
//! ```

pub mod categories;
pub mod playlists;
pub mod presets;
pub mod settings;

use crate::document::{Domain, VersionedDocument};
use crate::{Error, Result};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Latest known format version, shared by every domain
///
/// **IMPORTANT:** Increment this when adding new migration steps
pub const LATEST_VERSION: u64 = 3;

/// Category region used when legacy settings carried none
pub const DEFAULT_CATEGORY_COUNTRY: &str = "US";
/// Category language used when legacy settings carried none
pub const DEFAULT_CATEGORY_LANGUAGE: &str = "en";

/// Region/language the legacy category list was fetched for
///
/// Lived in the legacy settings file; handed to the category migration once
/// during the upgrade from the legacy format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLocale {
    pub country: String,
    pub language: String,
}

/// Inputs a step may need from outside its own document
#[derive(Debug, Clone, Default)]
pub struct MigrationContext {
    pub category_locale: Option<CategoryLocale>,
}

/// Upgrade function taking a document from version N to N + 1
pub type StepFn = fn(&VersionedDocument, &MigrationContext) -> Result<VersionedDocument>;

/// One link of a migration ladder
#[derive(Clone, Copy)]
pub struct MigrationStep {
    /// Version this step upgrades from
    pub from: u64,
    pub description: &'static str,
    pub apply: StepFn,
}

/// Ordered upgrade steps for one domain
pub struct MigrationLadder {
    domain: Domain,
    latest: u64,
    steps: Vec<MigrationStep>,
}

impl MigrationLadder {
    pub fn new(domain: Domain, latest: u64, steps: Vec<MigrationStep>) -> Self {
        Self {
            domain,
            latest,
            steps,
        }
    }

    /// Ladder registered for a domain
    pub fn for_domain(domain: Domain) -> Self {
        let steps = match domain {
            Domain::Categories => categories::steps(),
            Domain::Playlists => playlists::steps(),
            Domain::Presets => presets::steps(),
            Domain::Settings => settings::steps(),
        };
        Self::new(domain, LATEST_VERSION, steps)
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn latest_version(&self) -> u64 {
        self.latest
    }

    fn step_for(&self, version: u64) -> Option<&MigrationStep> {
        self.steps.iter().find(|step| step.from == version)
    }

    /// Bring a document to the latest version
    ///
    /// The input is never modified. Returns it unchanged (cloned) when it is
    /// already current.
    pub fn migrate(
        &self,
        doc: &VersionedDocument,
        ctx: &MigrationContext,
    ) -> Result<VersionedDocument> {
        if doc.domain() != self.domain {
            return Err(Error::InvalidInput(format!(
                "{} document handed to the {} migration ladder",
                doc.domain(),
                self.domain
            )));
        }

        let current_version = doc.version();

        if current_version > self.latest {
            return Err(Error::VersionTooNew {
                domain: self.domain,
                found: current_version,
                latest: self.latest,
            });
        }

        if current_version == self.latest {
            debug!("{} document is up to date (v{})", self.domain, current_version);
            return Ok(doc.clone());
        }

        info!(
            "Migrating {} document: v{} -> v{}",
            self.domain, current_version, self.latest
        );

        let mut upgraded = doc.clone();
        while upgraded.version() < self.latest {
            let version = upgraded.version();
            let step = self.step_for(version).ok_or(Error::MissingMigrationStep {
                domain: self.domain,
                version,
            })?;

            debug!("Running {} migration v{}: {}", self.domain, version + 1, step.description);
            upgraded = (step.apply)(&upgraded, ctx)?.with_version(version + 1);
            info!("✓ {} migration v{} completed", self.domain, version + 1);
        }

        Ok(upgraded)
    }
}

/// Reserved version number with no content change
fn reserved(doc: &VersionedDocument, _ctx: &MigrationContext) -> Result<VersionedDocument> {
    Ok(doc.clone())
}

/// Steps 1 -> 2 -> 3 shared by every domain
fn reserved_steps() -> [MigrationStep; 2] {
    [
        MigrationStep {
            from: 1,
            description: "reserved version 2",
            apply: reserved,
        },
        MigrationStep {
            from: 2,
            description: "reserved version 3",
            apply: reserved,
        },
    ]
}

/// Array field of a document; absent means empty
fn list_field<'d>(doc: &'d VersionedDocument, key: &str) -> Result<&'d [Value]> {
    match doc.field(key) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(Error::format(
            doc.domain(),
            format!("field '{}' should be a list, found {}", key, other),
        )),
    }
}

/// Optional string member of a record
fn string_member<'r>(
    domain: Domain,
    record: &'r Map<String, Value>,
    key: &str,
) -> Result<Option<&'r str>> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(Error::format(
            domain,
            format!("field '{}' should be a string, found {}", key, other),
        )),
    }
}

/// Required string member of a record
fn required_string<'r>(
    domain: Domain,
    record: &'r Map<String, Value>,
    key: &str,
) -> Result<&'r str> {
    string_member(domain, record, key)?
        .ok_or_else(|| Error::format(domain, format!("record is missing '{}'", key)))
}

/// Record (object) entry of a list
fn as_record(domain: Domain, item: &Value) -> Result<&Map<String, Value>> {
    item.as_object()
        .ok_or_else(|| Error::format(domain, format!("list entry is not an object: {}", item)))
}

/// Legacy boolean text: `true` / `false` in any case, empty means false
fn parse_flag(domain: Domain, key: &str, value: Option<&str>) -> Result<bool> {
    match value.map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(Error::format(
            domain,
            format!("field '{}' should be true or false, found '{}'", key, v),
        )),
    }
}
