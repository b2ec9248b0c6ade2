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

//! Asset importers and the registry that dispatches on file extension.

mod gltf_importer;
mod obj_importer;

pub use gltf_importer::GltfImporter;
pub use obj_importer::ObjImporter;

use relit_core::{AssetImporter, ImportError, ImportedAsset};
use std::path::Path;

/// Importers keyed by the extensions they declare. Later registrations win.
#[derive(Default)]
pub struct ImporterRegistry {
    importers: Vec<Box<dyn AssetImporter + Send + Sync>>,
}

impl ImporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the OBJ and glTF/GLB importers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ObjImporter);
        registry.register(GltfImporter);
        registry
    }

    pub fn register<I: AssetImporter + Send + Sync + 'static>(&mut self, importer: I) {
        self.importers.push(Box::new(importer));
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.find(extension).is_some()
    }

    fn find(&self, extension: &str) -> Option<&(dyn AssetImporter + Send + Sync)> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self.importers
            .iter()
            .rev()
            .find(|i| i.extensions().contains(&extension.as_str()))
            .map(|i| i.as_ref())
    }
}

impl AssetImporter for ImporterRegistry {
    fn extensions(&self) -> &[&'static str] {
        &[]
    }

    fn import(&self, path: &Path, asset_id: &str) -> Result<ImportedAsset, ImportError> {
        if !path.is_file() {
            return Err(ImportError::NotFound(path.to_path_buf()));
        }
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let importer = self
            .find(extension)
            .ok_or_else(|| ImportError::UnsupportedFormat(extension.to_string()))?;
        let asset = importer.import(path, asset_id)?;
        log::debug!(
            "Imported '{}' from '{}': {} node(s), {} triangle(s)",
            asset.id,
            path.display(),
            asset.nodes.len(),
            asset.triangle_count()
        );
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_dispatch_errors() {
        let registry = ImporterRegistry::with_defaults();
        assert!(registry.supports("GLB"));
        assert!(registry.supports(".obj"));
        assert!(!registry.supports("fbx"));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.obj");
        assert!(matches!(registry.import(&missing, "x"), Err(ImportError::NotFound(_))));

        let fbx = dir.path().join("model.fbx");
        std::fs::write(&fbx, b"").unwrap();
        assert!(matches!(registry.import(&fbx, "x"), Err(ImportError::UnsupportedFormat(ext)) if ext == "fbx"));
    }
}
