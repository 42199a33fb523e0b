//! Legacy playlist list: one `isOwned:id:name` record per line

use super::{list_document, records, split_fields};
use crate::document::{Domain, VersionedDocument};
use crate::{Error, Result};
use serde_json::json;

pub fn parse(raw: &str) -> Result<VersionedDocument> {
    let mut playlists = Vec::new();

    for (line_no, line) in records(raw) {
        let fields = split_fields(Domain::Playlists, line_no, line, 3)?;
        let (is_owned, id, name) = (fields[0], fields[1], fields[2]);
        if id.trim().is_empty() {
            return Err(Error::malformed(Domain::Playlists, line_no, line, "empty id"));
        }
        playlists.push(json!({
            "isOwned": is_owned.trim(),
            "id": id.trim(),
            "name": name,
        }));
    }

    Ok(list_document(Domain::Playlists, "playlists", playlists))
}
