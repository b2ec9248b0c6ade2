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

//! Imported mesh geometry and the importer contract.

use crate::error::ImportError;
use crate::math::{Aabb, LinearRgba, Mat4, Vec3};
use std::path::{Path, PathBuf};

/// A triangle mesh attached to a node of an asset hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub name: String,
    /// Vertex positions in node-local space.
    pub positions: Vec<Vec3>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
    /// Node-to-asset transform, already composed through the hierarchy.
    pub transform: Mat4,
    pub base_color: LinearRgba,
}

impl MeshNode {
    /// A white mesh with an identity transform.
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            positions,
            indices,
            transform: Mat4::IDENTITY,
            base_color: LinearRgba::WHITE,
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn local_bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Triangles in the space given by `to_world`. Out-of-range indices are skipped.
    pub fn triangles<'a>(&'a self, to_world: Mat4) -> impl Iterator<Item = [Vec3; 3]> + 'a {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let p = |i: u32| self.positions.get(i as usize).map(|v| to_world.transform_point3(*v));
            Some([p(tri[0])?, p(tri[1])?, p(tri[2])?])
        })
    }
}

/// An asset as returned by an importer: a flat list of mesh nodes under one root.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedAsset {
    /// Stable identifier (the manifest uid, or a generated name).
    pub id: String,
    pub source: Option<PathBuf>,
    pub nodes: Vec<MeshNode>,
    /// Root transform applied on top of every node; composition edits only this.
    pub root: Mat4,
    /// Optional texture image for the whole asset.
    pub texture: Option<PathBuf>,
}

impl ImportedAsset {
    pub fn new(id: impl Into<String>, nodes: Vec<MeshNode>) -> Self {
        Self {
            id: id.into(),
            source: None,
            nodes,
            root: Mat4::IDENTITY,
            texture: None,
        }
    }

    /// Full node-to-world transform.
    pub fn node_world(&self, node: &MeshNode) -> Mat4 {
        self.root * node.transform
    }

    /// World-space bounds over all mesh-bearing nodes, `None` if there is no geometry.
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.nodes
            .iter()
            .filter_map(|node| node.local_bounds().map(|b| b.transform(&self.node_world(node))))
            .reduce(|a, b| a.merge(&b))
    }

    /// Every triangle of every node in world space.
    pub fn world_triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.nodes
            .iter()
            .flat_map(move |node| node.triangles(self.node_world(node)))
    }

    /// Every vertex in world space.
    pub fn world_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.nodes.iter().flat_map(move |node| {
            let to_world = self.node_world(node);
            node.positions.iter().map(move |p| to_world.transform_point3(*p))
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.nodes.iter().map(|n| n.indices.len() / 3).sum()
    }
}

/// The asset-import collaborator: reads a file into mesh nodes with transforms.
pub trait AssetImporter {
    /// Lower-case file extensions this importer accepts.
    fn extensions(&self) -> &[&'static str];

    /// Imports the file at `path` under the id `asset_id`.
    fn import(&self, path: &Path, asset_id: &str) -> Result<ImportedAsset, ImportError>;
}
