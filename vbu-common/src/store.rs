//! Document store capability
//!
//! The core never decides where configuration lives; callers inject a store.

use crate::document::Domain;
use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Load/save capability for configuration documents
pub trait DocumentStore {
    /// Raw stored text for a domain, `None` when it was never written
    fn load(&self, domain: Domain) -> Result<Option<String>>;

    /// Persist a domain's document in its latest structured form
    fn save(&self, domain: Domain, document: &Value) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<Domain, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a domain with raw text (legacy or JSON)
    pub fn with_raw(self, domain: Domain, raw: impl Into<String>) -> Self {
        self.put_raw(domain, raw);
        self
    }

    pub fn put_raw(&self, domain: Domain, raw: impl Into<String>) {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(domain, raw.into());
    }

    /// Current raw text of a domain
    pub fn raw(&self, domain: Domain) -> Option<String> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&domain)
            .cloned()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, domain: Domain) -> Result<Option<String>> {
        Ok(self.raw(domain))
    }

    fn save(&self, domain: Domain, document: &Value) -> Result<()> {
        let text = serde_json::to_string_pretty(document)?;
        self.put_raw(domain, text);
        Ok(())
    }
}
