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

use super::{choose_texture, expect_count, CompositionStrategy};
use crate::scene_lane::primitives::{cylinder_mesh, CYLINDER_SEGMENTS};
use crate::scene_lane::{normalize, place_avoiding};
use relit_core::math::{Mat4, Vec3, TAU};
use relit_core::physics::MeshCollider;
use relit_core::sampling::{uniform, SceneRng, UpAxis};
use relit_core::{AssetPlacement, ComposeError, ComposedScene, ImportedAsset, Primitive, SceneRecord};
use std::path::PathBuf;

/// Asset id given to the generated occluder.
pub const OBSTACLE_ASSET_ID: &str = "cylinder";

/// One normalized asset plus a randomly sized and oriented cylinder placed
/// in a ring around it without touching it.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleStrategy {
    pub target_radius: f32,
    pub radius_range: (f32, f32),
    pub depth_range: (f32, f32),
    /// The ring starts at `inner_margin + cylinder radius`.
    pub inner_margin: f32,
    pub outer_radius: f32,
    pub max_attempts: usize,
    pub textures: Vec<PathBuf>,
    pub up_axis: UpAxis,
}

impl Default for ObstacleStrategy {
    fn default() -> Self {
        Self {
            target_radius: 0.5,
            radius_range: (0.1, 0.4),
            depth_range: (0.5, 1.5),
            inner_margin: 0.6,
            outer_radius: 2.0,
            max_attempts: 50,
            textures: Vec::new(),
            up_axis: UpAxis::Z,
        }
    }
}

impl CompositionStrategy for ObstacleStrategy {
    fn strategy_name(&self) -> &'static str {
        "obstacle"
    }

    fn assets_per_scene(&self) -> usize {
        1
    }

    fn compose(&self, mut assets: Vec<ImportedAsset>, rng: &mut SceneRng) -> Result<ComposedScene, ComposeError> {
        expect_count(self.strategy_name(), 1, &assets)?;
        let subject = &mut assets[0];
        let outcome = normalize(subject, self.target_radius);
        if outcome.is_empty() {
            return Err(ComposeError::EmptyAsset(subject.id.clone()));
        }
        let normalization = outcome.normalization();
        let subject_bounds = subject
            .world_bounds()
            .ok_or_else(|| ComposeError::EmptyAsset(subject.id.clone()))?;
        let fixed = MeshCollider::from_asset(subject).ok_or_else(|| ComposeError::EmptyAsset(subject.id.clone()))?;
        let subject_placement = AssetPlacement {
            asset_id: subject.id.clone(),
            scale: normalization.scale,
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            primitive: None,
            local_bbox_min: subject_bounds.min,
            local_bbox_max: subject_bounds.max,
            resolved: true,
        };

        let radius = uniform(rng, self.radius_range.0, self.radius_range.1);
        let depth = uniform(rng, self.depth_range.0, self.depth_range.1);
        let euler = Vec3::new(uniform(rng, 0.0, TAU), uniform(rng, 0.0, TAU), uniform(rng, 0.0, TAU));
        let mut obstacle = ImportedAsset::new(OBSTACLE_ASSET_ID, vec![cylinder_mesh(radius, depth, CYLINDER_SEGMENTS)]);
        obstacle.root = Mat4::from_euler_xyz(euler);
        obstacle.texture = choose_texture(&self.textures, rng);
        let obstacle_bounds = obstacle
            .world_bounds()
            .ok_or_else(|| ComposeError::EmptyAsset(obstacle.id.clone()))?;

        let inner = self.inner_margin + radius;
        let outer = self.outer_radius.max(inner);
        let up = self.up_axis;
        let avoid = place_avoiding(&mut obstacle, &[fixed], self.max_attempts, rng, |rng| {
            let distance = uniform(rng, inner, outer);
            let azimuth = uniform(rng, 0.0, TAU);
            let planar = Vec3::new(distance * azimuth.cos(), distance * azimuth.sin(), 0.0);
            Mat4::from_translation(up.remap(planar))
        })?;
        log::info!(
            "SceneComposer: obstacle r={radius:.3} depth={depth:.3} placed after {} attempt(s)",
            avoid.attempts
        );

        let obstacle_placement = AssetPlacement {
            asset_id: obstacle.id.clone(),
            scale: 1.0,
            translation: avoid.transform.translation(),
            rotation: euler,
            primitive: Some(Primitive::Cylinder { radius, depth }),
            local_bbox_min: obstacle_bounds.min,
            local_bbox_max: obstacle_bounds.max,
            resolved: avoid.resolved,
        };
        assets.push(obstacle);
        Ok(ComposedScene {
            assets,
            record: SceneRecord {
                placements: vec![subject_placement, obstacle_placement],
                ground: None,
                normalization,
            },
        })
    }
}
