//! Resource map and key resolution.
//!
//! Resources are opaque keyed blobs supplied by the collaborator: fonts,
//! images, audio. Resolution is format dispatch only; content is never
//! validated here.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry in the collaborator's resource map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Human-readable name.
    pub name: String,
    /// MIME-ish category, e.g. `image` or `audio`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Format extension, e.g. `svg`, `png`, `mp3`.
    pub ext: String,
    /// Base64 payload, or raw text for vector markup.
    pub buffer: String,
}

/// Resource keys to entries.
pub type ResourceMap = HashMap<String, ResourceEntry>;

/// What a resource key resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedResource {
    /// Scheme-prefixed reference; fetched by the host, not by us.
    RemoteUrl(String),
    /// Inline vector markup (`ext == "svg"`), raw text.
    VectorMarkup(String),
    /// Decoded raster/audio bytes with a MIME type.
    Raster { mime: String, data: Vec<u8> },
    /// Unknown key; render nothing, never an error.
    NotFound,
}

/// Resolve a resource key against the supplied map.
///
/// Precedence: remote URL > vector extension > any other extension
/// (base64 payload) > not found.
pub fn resolve(key: &str, resources: &ResourceMap) -> ResolvedResource {
    if key.starts_with("https://") || key.starts_with("http://") {
        return ResolvedResource::RemoteUrl(key.to_string());
    }
    let Some(entry) = resources.get(key) else {
        log::debug!("resource key not in map: {key}");
        return ResolvedResource::NotFound;
    };
    if entry.ext.eq_ignore_ascii_case("svg") {
        return ResolvedResource::VectorMarkup(entry.buffer.clone());
    }
    match STANDARD.decode(entry.buffer.as_bytes()) {
        Ok(data) => ResolvedResource::Raster {
            mime: mime_for(&entry.kind, &entry.ext),
            data,
        },
        Err(err) => {
            log::warn!("resource {key} has undecodable payload: {err}");
            ResolvedResource::NotFound
        }
    }
}

/// MIME type from the entry's category and extension.
fn mime_for(kind: &str, ext: &str) -> String {
    let ext = ext.to_ascii_lowercase();
    let category = match kind {
        "audio" => "audio",
        _ => "image",
    };
    match ext.as_str() {
        "jpg" => format!("{category}/jpeg"),
        other => format!("{category}/{other}"),
    }
}
