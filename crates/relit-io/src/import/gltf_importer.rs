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

//! glTF 2.0 and GLB import through `gltf::import`.
//!
//! The node hierarchy of the default scene is flattened: every mesh primitive
//! becomes a [`MeshNode`] carrying its composed node-to-asset transform.

use gltf::{mesh::Mode, Buffer};
use relit_core::math::{LinearRgba, Mat4, Vec3, Vec4};
use relit_core::{AssetImporter, ImportError, ImportedAsset, MeshNode};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct GltfImporter;

impl AssetImporter for GltfImporter {
    fn extensions(&self) -> &[&'static str] {
        &["glb", "gltf"]
    }

    fn import(&self, path: &Path, asset_id: &str) -> Result<ImportedAsset, ImportError> {
        let malformed = |reason: String| ImportError::Malformed {
            path: path.to_path_buf(),
            reason,
        };
        let (document, buffers, _images) = gltf::import(path).map_err(|e| malformed(e.to_string()))?;
        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| malformed("the file contains no scene".into()))?;

        let buffer_data = |buffer: Buffer<'_>| buffers.get(buffer.index()).map(|data| data.0.as_slice());
        let mut nodes = Vec::new();
        let mut stack: Vec<(gltf::Node<'_>, Mat4)> = scene.nodes().map(|n| (n, Mat4::IDENTITY)).collect();
        while let Some((node, parent)) = stack.pop() {
            let world = parent * node_matrix(&node);
            if let Some(mesh) = node.mesh() {
                for (index, primitive) in mesh.primitives().enumerate() {
                    if primitive.mode() != Mode::Triangles {
                        log::debug!("Skipping non-triangle primitive {index} of mesh '{:?}'", mesh.name());
                        continue;
                    }
                    let reader = primitive.reader(buffer_data);
                    let Some(positions) = reader.read_positions() else {
                        continue;
                    };
                    let positions: Vec<Vec3> = positions.map(|[x, y, z]| Vec3::new(x, y, z)).collect();
                    let indices: Vec<u32> = match reader.read_indices() {
                        Some(indices) => indices.into_u32().collect(),
                        None => (0..positions.len() as u32).collect(),
                    };
                    let [r, g, b, a] = primitive.material().pbr_metallic_roughness().base_color_factor();
                    let name = format!("{}#{index}", node.name().or(mesh.name()).unwrap_or("mesh"));
                    let mut mesh_node = MeshNode::new(name, positions, indices).with_transform(world);
                    mesh_node.base_color = LinearRgba::new(r, g, b, a);
                    nodes.push(mesh_node);
                }
            }
            stack.extend(node.children().map(|child| (child, world)));
        }

        let mut asset = ImportedAsset::new(asset_id, nodes);
        asset.source = Some(path.to_path_buf());
        Ok(asset)
    }
}

/// The node's local transform; glTF stores it column-major.
fn node_matrix(node: &gltf::Node<'_>) -> Mat4 {
    let m = node.transform().matrix();
    let col = |c: [f32; 4]| Vec4::new(c[0], c[1], c[2], c[3]);
    Mat4::from_cols(col(m[0]), col(m[1]), col(m[2]), col(m[3]))
}
