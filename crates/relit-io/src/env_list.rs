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

//! Environment map lists and texture directories.

use crate::error::{IoError, IoResult};
use crate::metadata::read_json;
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TEXTURE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Reads environment map names from a JSON array, or from the keys of a JSON object.
pub fn load_env_list(path: &Path) -> IoResult<Vec<String>> {
    let value: Value = read_json(path)?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(name) => Ok(name),
                other => Err(IoError::Manifest {
                    path: path.to_path_buf(),
                    line: 0,
                    reason: format!("expected an environment map name, found {other}"),
                }),
            })
            .collect(),
        Value::Object(map) => {
            let mut names: Vec<String> = map.keys().cloned().collect();
            names.sort();
            Ok(names)
        }
        other => Err(IoError::Manifest {
            path: path.to_path_buf(),
            line: 0,
            reason: format!("expected an array or object of environment maps, found {other}"),
        }),
    }
}

/// Image files under `dir`, sorted by path so random picks are reproducible.
pub fn list_textures(dir: &Path) -> IoResult<Vec<PathBuf>> {
    let mut textures = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            IoError::Io {
                path,
                source: e.into(),
            }
        })?;
        let is_texture = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| TEXTURE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if entry.file_type().is_file() && is_texture {
            textures.push(entry.into_path());
        }
    }
    textures.sort();
    log::debug!("Found {} texture(s) under '{}'", textures.len(), dir.display());
    Ok(textures)
}
