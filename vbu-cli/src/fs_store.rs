//! Document store backed by the root folder
//!
//! Each domain lives in `<root>/<domain>.json`. Installations that predate
//! versioned documents have `<root>/<domain>.txt` instead; that file is read
//! until the first save writes the JSON file next to it.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;
use vbu_common::store::DocumentStore;
use vbu_common::{Domain, Result};

pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a domain's versioned document
    pub fn document_path(&self, domain: Domain) -> PathBuf {
        self.root.join(format!("{}.json", domain.as_str()))
    }

    /// Location of a domain's legacy text file
    pub fn legacy_path(&self, domain: Domain) -> PathBuf {
        self.root.join(format!("{}.txt", domain.as_str()))
    }
}

impl DocumentStore for FsDocumentStore {
    fn load(&self, domain: Domain) -> Result<Option<String>> {
        for path in [self.document_path(domain), self.legacy_path(domain)] {
            if path.is_file() {
                debug!("Reading {} configuration from {}", domain, path.display());
                return Ok(Some(std::fs::read_to_string(&path)?));
            }
        }
        Ok(None)
    }

    fn save(&self, domain: Domain, document: &Value) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;

        let path = self.document_path(domain);
        let temp_path = path.with_extension("json.tmp");
        let mut text = serde_json::to_string_pretty(document)?;
        text.push('\n');

        std::fs::write(&temp_path, text)?;
        if let Err(e) = std::fs::rename(&temp_path, &path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!("Wrote {}", path.display());
        Ok(())
    }
}
