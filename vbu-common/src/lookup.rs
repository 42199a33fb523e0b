//! Category and playlist lookup capabilities
//!
//! Legacy parsing and templating only need to find an entity by display name
//! or by id. The registries here implement that over migrated documents;
//! callers may supply their own implementations.

use crate::models::{CategoriesDocument, Category, Playlist, PlaylistsDocument};

/// Find categories by name or id
pub trait CategoryLookup: Send + Sync {
    fn find_by_name(&self, name: &str) -> Option<&Category>;
    fn find_by_id(&self, id: &str) -> Option<&Category>;
}

/// Find playlists by name or id
pub trait PlaylistLookup: Send + Sync {
    fn find_by_name(&self, name: &str) -> Option<&Playlist>;
    fn find_by_id(&self, id: &str) -> Option<&Playlist>;

    /// Public page of a playlist
    fn url_of(&self, playlist: &Playlist) -> String {
        playlist.url()
    }
}

/// Categories known to this installation
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    document: CategoriesDocument,
}

impl CategoryRegistry {
    pub fn new(document: CategoriesDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &CategoriesDocument {
        &self.document
    }

    pub fn len(&self) -> usize {
        self.document.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.categories.is_empty()
    }
}

impl CategoryLookup for CategoryRegistry {
    fn find_by_name(&self, name: &str) -> Option<&Category> {
        self.document.categories.iter().find(|c| c.name == name)
    }

    fn find_by_id(&self, id: &str) -> Option<&Category> {
        self.document.categories.iter().find(|c| c.id == id)
    }
}

/// Playlists known to this installation
#[derive(Debug, Clone, Default)]
pub struct PlaylistRegistry {
    playlists: Vec<Playlist>,
}

impl PlaylistRegistry {
    pub fn new(playlists: Vec<Playlist>) -> Self {
        Self { playlists }
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }
}

impl From<PlaylistsDocument> for PlaylistRegistry {
    fn from(document: PlaylistsDocument) -> Self {
        Self::new(document.playlists)
    }
}

impl PlaylistLookup for PlaylistRegistry {
    fn find_by_name(&self, name: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.name == name)
    }

    fn find_by_id(&self, id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }
}
