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

//! Wavefront OBJ import through `tobj`.

use relit_core::math::{LinearRgba, Vec3};
use relit_core::{AssetImporter, ImportError, ImportedAsset, MeshNode};
use std::path::Path;

/// One mesh node per OBJ model, triangulated, colored from the material's diffuse term.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjImporter;

impl AssetImporter for ObjImporter {
    fn extensions(&self) -> &[&'static str] {
        &["obj"]
    }

    fn import(&self, path: &Path, asset_id: &str) -> Result<ImportedAsset, ImportError> {
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|e| ImportError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // A missing .mtl is not fatal; meshes fall back to white.
        let materials = materials.unwrap_or_else(|e| {
            log::warn!("Ignoring materials of '{}': {e}", path.display());
            Vec::new()
        });

        let nodes = models
            .into_iter()
            .map(|model| {
                let positions = model
                    .mesh
                    .positions
                    .chunks_exact(3)
                    .map(|v| Vec3::new(v[0], v[1], v[2]))
                    .collect();
                let mut node = MeshNode::new(model.name, positions, model.mesh.indices);
                if let Some([r, g, b]) = model
                    .mesh
                    .material_id
                    .and_then(|id| materials.get(id))
                    .and_then(|m| m.diffuse)
                {
                    node.base_color = LinearRgba::rgb(r, g, b);
                }
                node
            })
            .collect();

        let mut asset = ImportedAsset::new(asset_id, nodes);
        asset.source = Some(path.to_path_buf());
        Ok(asset)
    }
}
