//! Legacy category list: one `name:id` record per line

use super::{list_document, records, split_fields};
use crate::document::{Domain, VersionedDocument};
use crate::{Error, Result};
use serde_json::json;

pub fn parse(raw: &str) -> Result<VersionedDocument> {
    let mut categories = Vec::new();

    for (line_no, line) in records(raw) {
        let fields = split_fields(Domain::Categories, line_no, line, 2)?;
        let (name, id) = (fields[0], fields[1]);
        if id.trim().is_empty() {
            return Err(Error::malformed(Domain::Categories, line_no, line, "empty id"));
        }
        categories.push(json!({ "name": name, "id": id.trim() }));
    }

    Ok(list_document(Domain::Categories, "categories", categories))
}
