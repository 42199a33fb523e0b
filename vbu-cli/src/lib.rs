//! vbu command-line driver
//!
//! Wires the offline core in `vbu-common` to the file system: the root
//! folder document store, video discovery and media metadata extraction.

pub mod commands;
pub mod fs_store;
pub mod metadata_extractor;
pub mod scanner;

pub use fs_store::FsDocumentStore;
