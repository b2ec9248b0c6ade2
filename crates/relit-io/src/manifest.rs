// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The asset manifest: headerless `folder,uid` rows.
//!
//! An entry resolves to `<dataset_root>/<folder>/<uid>.<extension>`.

use crate::error::{ensure_parent, IoError, IoResult};
use crate::metadata::read_json;
use rand::seq::index;
use relit_core::sampling::scene_rng;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub folder: String,
    pub uid: String,
}

impl ManifestEntry {
    pub fn new(folder: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            uid: uid.into(),
        }
    }

    pub fn asset_path(&self, dataset_root: &Path, extension: &str) -> PathBuf {
        dataset_root
            .join(&self.folder)
            .join(format!("{}.{}", self.uid, extension.trim_start_matches('.')))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetManifest {
    entries: Vec<ManifestEntry>,
}

impl AssetManifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries `[start, end)`, both clamped to the manifest length.
    pub fn range(&self, start: usize, end: Option<usize>) -> &[ManifestEntry] {
        let end = end.unwrap_or(self.entries.len()).min(self.entries.len());
        let start = start.min(end);
        &self.entries[start..end]
    }
}

/// Parses a manifest. Blank lines are skipped; every other line needs two non-empty fields.
pub fn read_manifest(path: &Path) -> IoResult<AssetManifest> {
    let text = std::fs::read_to_string(path).map_err(IoError::io(path))?;
    let mut entries = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split(',').map(str::trim);
        match (fields.next(), fields.next()) {
            (Some(folder), Some(uid)) if !folder.is_empty() && !uid.is_empty() => {
                entries.push(ManifestEntry::new(folder, uid));
            }
            _ => {
                return Err(IoError::Manifest {
                    path: path.to_path_buf(),
                    line: number + 1,
                    reason: format!("expected 'folder,uid', found '{line}'"),
                })
            }
        }
    }
    Ok(AssetManifest::new(entries))
}

pub fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> IoResult<()> {
    ensure_parent(path)?;
    let mut text = String::new();
    for entry in entries {
        let _ = writeln!(text, "{},{}", entry.folder, entry.uid);
    }
    std::fs::write(path, text).map_err(IoError::io(path))
}

/// Samples `count` entries from an object-path map (`uid -> "glbs/<folder>/<uid>.glb"`).
///
/// Keys are sorted before sampling so a seed always selects the same uids.
/// Paths with fewer than three components are skipped with a warning.
pub fn sample_object_paths(json_path: &Path, count: usize, seed: u64) -> IoResult<Vec<ManifestEntry>> {
    let objects: BTreeMap<String, String> = read_json(json_path)?;
    let uids: Vec<&String> = objects.keys().collect();
    let amount = count.min(uids.len());
    let mut rng = scene_rng(Some(seed));
    let mut sampled = Vec::with_capacity(amount);
    for i in index::sample(&mut rng, uids.len(), amount) {
        let uid = uids[i];
        let parts: Vec<&str> = objects[uid].split('/').collect();
        if parts.len() >= 3 {
            sampled.push(ManifestEntry::new(parts[1], uid.as_str()));
        } else {
            log::warn!("Cannot derive a folder from '{}' for uid {uid}", objects[uid]);
        }
    }
    log::info!("Sampled {} of {} object(s)", sampled.len(), uids.len());
    Ok(sampled)
}

/// `existing` followed by `added`, keeping the first entry of each uid.
pub fn merge_manifest(existing: &[ManifestEntry], added: &[ManifestEntry]) -> Vec<ManifestEntry> {
    let mut seen = HashSet::new();
    existing
        .iter()
        .chain(added)
        .filter(|e| seen.insert(e.uid.clone()))
        .cloned()
        .collect()
}
