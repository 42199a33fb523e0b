//! # VBU Common Library
//!
//! Offline core of the video batch uploader:
//! - Configuration documents and their on-disk version field
//! - Legacy text parsers for every configuration domain
//! - Per-domain migration ladders
//! - Configuration load cycle over an injected document store
//! - Category/playlist lookup registries
//! - Preset templating pipeline
//! - Bootstrap configuration loading

pub mod config;
pub mod document;
pub mod error;
pub mod legacy;
pub mod loader;
pub mod lookup;
pub mod migrations;
pub mod models;
pub mod store;
pub mod templating;

pub use document::{Domain, VersionedDocument, VERSION_KEY};
pub use error::{Error, Result};
pub use models::{ConcreteVideoMetadata, Preset, TargetFile, Visibility};
