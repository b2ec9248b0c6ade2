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

//! Composed scenes and the record persisted for them.

use crate::asset::ImportedAsset;
use crate::math::{Mat4, Vec3};
use std::path::PathBuf;

/// The uniform scale and translation that bring an asset into the unit frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub scale: f32,
    pub offset: Vec3,
}

impl Normalization {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Vec3::ZERO,
    };
}

impl Default for Normalization {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Analytic shape of an asset generated during composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Cylinder along its local Z axis, `depth` long.
    Cylinder { radius: f32, depth: f32 },
}

/// Where one asset ended up in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPlacement {
    pub asset_id: String,
    /// Normalization scale applied before placement.
    pub scale: f32,
    /// World translation of the asset root after placement.
    pub translation: Vec3,
    /// XYZ euler angles in radians, applied before the translation.
    pub rotation: Vec3,
    /// Dimensions of a generated asset; `None` for imported ones.
    pub primitive: Option<Primitive>,
    /// Bounds of the normalized asset before the placement transform.
    pub local_bbox_min: Vec3,
    pub local_bbox_max: Vec3,
    /// False when collision avoidance gave up and kept the last attempt.
    pub resolved: bool,
}

impl AssetPlacement {
    /// The transform composed on top of the normalized asset: rotation first, then translation.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_euler_xyz(self.rotation)
    }
}

/// A textured ground plane centered at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundPlane {
    /// Edge length.
    pub size: f32,
    pub texture: Option<PathBuf>,
    pub rotation_z: f32,
}

/// Everything persisted about a scene's composition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneRecord {
    pub placements: Vec<AssetPlacement>,
    pub ground: Option<GroundPlane>,
    pub normalization: Normalization,
}

impl SceneRecord {
    /// Multi-object scenes additionally get a `scene_info.json`.
    pub fn is_multi_object(&self) -> bool {
        self.ground.is_some() || self.placements.len() > 1
    }
}

/// Transformed assets ready to load into a renderer, plus their record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComposedScene {
    pub assets: Vec<ImportedAsset>,
    pub record: SceneRecord,
}
