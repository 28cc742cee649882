//! Hashing - SHA-256 digests and the build manifest hash
//!
//! Two builds of the same corpus and configuration hash identically.

use serde::{Deserialize, Serialize};
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::archive::DocumentSet;

/// SHA-256 of bytes as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Canonical JSON (sorted keys, no whitespace).
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// What went into one package: identity, settings and a digest per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    pub engine_version: String,
    pub package_id: String,
    pub filename: String,
    pub script: String,
    pub font: String,
    pub layout: String,
    pub modified: String,
    /// Archive path to SHA-256 of its bytes.
    pub documents: BTreeMap<String, String>,
}

/// Digest of every entry in a document set.
pub fn document_digests(documents: &DocumentSet) -> BTreeMap<String, String> {
    documents
        .iter()
        .map(|(path, bytes)| (path.to_string(), sha256_hex(bytes)))
        .collect()
}

pub fn compute_manifest_hash<T: Serialize>(manifest: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(manifest)?;
    Ok(sha256_hex(canonical.as_bytes()))
}
