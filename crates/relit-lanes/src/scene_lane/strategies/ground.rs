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

use super::{choose_texture, CompositionStrategy};
use crate::scene_lane::{place_multi, PlacementParams};
use relit_core::math::TAU;
use relit_core::sampling::{uniform, SceneRng};
use relit_core::{ComposeError, ComposedScene, GroundPlane, ImportedAsset, Normalization, SceneRecord};
use std::path::PathBuf;

/// Optional textured ground under a multi-object scene.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundSpec {
    pub size: f32,
    /// Candidate textures, one is picked per scene. Empty means untextured.
    pub textures: Vec<PathBuf>,
}

impl Default for GroundSpec {
    fn default() -> Self {
        Self {
            size: 50.0,
            textures: Vec::new(),
        }
    }
}

/// Several independently normalized assets scattered on a shared ground plane.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundSceneStrategy {
    pub objects_per_scene: usize,
    pub target_radius: f32,
    pub placement: PlacementParams,
    pub ground: Option<GroundSpec>,
}

impl Default for GroundSceneStrategy {
    fn default() -> Self {
        Self {
            objects_per_scene: 3,
            target_radius: 0.5,
            placement: PlacementParams::default(),
            ground: Some(GroundSpec::default()),
        }
    }
}

impl CompositionStrategy for GroundSceneStrategy {
    fn strategy_name(&self) -> &'static str {
        "ground"
    }

    fn assets_per_scene(&self) -> usize {
        self.objects_per_scene
    }

    fn compose(&self, mut assets: Vec<ImportedAsset>, rng: &mut SceneRng) -> Result<ComposedScene, ComposeError> {
        if assets.is_empty() {
            return Err(ComposeError::AssetCount {
                strategy: self.strategy_name(),
                expected: self.objects_per_scene,
                actual: 0,
            });
        }
        // The ground is drawn before the objects.
        let ground = self.ground.as_ref().map(|spec| {
            let texture = choose_texture(&spec.textures, rng);
            GroundPlane {
                size: spec.size,
                texture,
                rotation_z: uniform(rng, 0.0, TAU),
            }
        });
        let placements = place_multi(&mut assets, self.target_radius, &self.placement, rng)?;
        log::info!(
            "SceneComposer: placed {} object(s) on {}",
            placements.len(),
            if ground.is_some() { "a ground plane" } else { "an empty floor" }
        );
        Ok(ComposedScene {
            assets,
            record: SceneRecord {
                placements,
                ground,
                normalization: Normalization::IDENTITY,
            },
        })
    }
}
