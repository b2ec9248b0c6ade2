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

use super::{expect_count, CompositionStrategy};
use crate::scene_lane::normalize;
use relit_core::math::Vec3;
use relit_core::sampling::SceneRng;
use relit_core::{AssetPlacement, ComposeError, ComposedScene, ImportedAsset, SceneRecord};

/// One asset, normalized and centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleAssetStrategy {
    pub target_radius: f32,
}

impl Default for SingleAssetStrategy {
    fn default() -> Self {
        Self { target_radius: 0.5 }
    }
}

impl CompositionStrategy for SingleAssetStrategy {
    fn strategy_name(&self) -> &'static str {
        "single"
    }

    fn assets_per_scene(&self) -> usize {
        1
    }

    fn compose(&self, mut assets: Vec<ImportedAsset>, _rng: &mut SceneRng) -> Result<ComposedScene, ComposeError> {
        expect_count(self.strategy_name(), 1, &assets)?;
        let asset = &mut assets[0];
        let outcome = normalize(asset, self.target_radius);
        if outcome.is_empty() {
            return Err(ComposeError::EmptyAsset(asset.id.clone()));
        }
        let normalization = outcome.normalization();
        let bounds = asset
            .world_bounds()
            .ok_or_else(|| ComposeError::EmptyAsset(asset.id.clone()))?;
        let placement = AssetPlacement {
            asset_id: asset.id.clone(),
            scale: normalization.scale,
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            primitive: None,
            local_bbox_min: bounds.min,
            local_bbox_max: bounds.max,
            resolved: true,
        };
        Ok(ComposedScene {
            assets,
            record: SceneRecord {
                placements: vec![placement],
                ground: None,
                normalization,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_lane::primitives::box_mesh;
    use relit_core::sampling::scene_rng;

    #[test]
    fn test_single_asset_record() {
        let asset = ImportedAsset::new("chair", vec![box_mesh(Vec3::new(2.0, 1.0, 1.0))]);
        let scene = SingleAssetStrategy::default()
            .compose(vec![asset], &mut scene_rng(Some(0)))
            .unwrap();
        assert_eq!(scene.record.normalization.scale, 0.25);
        assert!(!scene.record.is_multi_object());
        assert_eq!(scene.record.placements[0].asset_id, "chair");
        assert_eq!(scene.record.placements[0].local_bbox_max, Vec3::new(0.5, 0.25, 0.25));
    }

    #[test]
    fn test_single_rejects_wrong_count() {
        let err = SingleAssetStrategy::default()
            .compose(vec![], &mut scene_rng(Some(0)))
            .unwrap_err();
        assert!(matches!(err, ComposeError::AssetCount { expected: 1, actual: 0, .. }));
    }
}
