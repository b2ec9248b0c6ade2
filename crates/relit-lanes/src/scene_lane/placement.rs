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

use super::normalize::normalize;
use rand::Rng;
use relit_core::math::{Mat4, Vec3, TAU};
use relit_core::physics::MeshCollider;
use relit_core::sampling::{uniform, UpAxis};
use relit_core::{AssetPlacement, ComposeError, ImportedAsset, Normalization};

/// Parameters for scattering assets on a ground plane through the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementParams {
    /// Assets land within this planar distance of the origin.
    pub arena_radius: f32,
    /// Gap between the asset's lowest vertex and the ground.
    pub min_ground_clearance: f32,
    pub up_axis: UpAxis,
    /// Draw a yaw in `[0, 2pi)` for every asset.
    pub random_yaw: bool,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            arena_radius: 2.0,
            min_ground_clearance: 0.0,
            up_axis: UpAxis::Z,
            random_yaw: true,
        }
    }
}

/// XYZ euler angles of a rotation by `angle` about the up axis.
fn yaw_euler(up_axis: UpAxis, angle: f32) -> Vec3 {
    match up_axis {
        UpAxis::Z => Vec3::new(0.0, 0.0, angle),
        UpAxis::Y => Vec3::new(0.0, angle, 0.0),
    }
}

/// Drops a normalized asset at a random planar position with its lowest vertex on the ground.
///
/// Draw order: planar radius, azimuth, yaw.
pub fn place_on_ground<R: Rng + ?Sized>(
    asset: &mut ImportedAsset,
    normalization: Normalization,
    params: &PlacementParams,
    rng: &mut R,
) -> Result<AssetPlacement, ComposeError> {
    let local = asset
        .world_bounds()
        .ok_or_else(|| ComposeError::EmptyAsset(asset.id.clone()))?;
    let up = params.up_axis;

    let r = uniform(rng, 0.0, params.arena_radius);
    let azimuth = uniform(rng, 0.0, TAU);
    let lowest = asset
        .world_points()
        .map(|p| up.height(p))
        .fold(f32::INFINITY, f32::min);
    let planar = up.remap(Vec3::new(r * azimuth.cos(), r * azimuth.sin(), 0.0));
    let translation = up.with_height(planar, -lowest + params.min_ground_clearance);
    let yaw = if params.random_yaw { uniform(rng, 0.0, TAU) } else { 0.0 };

    let placement = AssetPlacement {
        asset_id: asset.id.clone(),
        scale: normalization.scale,
        translation,
        rotation: yaw_euler(up, yaw),
        primitive: None,
        local_bbox_min: local.min,
        local_bbox_max: local.max,
        resolved: true,
    };
    asset.root = placement.transform() * asset.root;
    Ok(placement)
}

/// Normalizes every asset to `target_radius` and scatters them on the ground.
///
/// Overlap between the scattered assets is allowed.
pub fn place_multi<R: Rng + ?Sized>(
    assets: &mut [ImportedAsset],
    target_radius: f32,
    params: &PlacementParams,
    rng: &mut R,
) -> Result<Vec<AssetPlacement>, ComposeError> {
    assets
        .iter_mut()
        .map(|asset| {
            let outcome = normalize(asset, target_radius);
            if outcome.is_empty() {
                return Err(ComposeError::EmptyAsset(asset.id.clone()));
            }
            place_on_ground(asset, outcome.normalization(), params, &mut *rng)
        })
        .collect()
}

/// Result of [`place_avoiding`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvoidOutcome {
    /// The transform applied on top of the asset's original root.
    pub transform: Mat4,
    /// Attempts used, including the accepted one.
    pub attempts: usize,
    /// False when every attempt collided and the last one was kept.
    pub resolved: bool,
}

/// Moves `moving` by transforms from `propose` until it overlaps none of `obstacles`.
///
/// After `max_attempts` collisions the last attempt is kept and the outcome is
/// marked unresolved; this is logged, not fatal.
pub fn place_avoiding<R, F>(
    moving: &mut ImportedAsset,
    obstacles: &[MeshCollider],
    max_attempts: usize,
    rng: &mut R,
    mut propose: F,
) -> Result<AvoidOutcome, ComposeError>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> Mat4,
{
    let base = moving.root;
    let max_attempts = max_attempts.max(1);
    let mut last = Mat4::IDENTITY;
    for attempt in 1..=max_attempts {
        last = propose(rng);
        moving.root = last * base;
        let collider =
            MeshCollider::from_asset(moving).ok_or_else(|| ComposeError::EmptyAsset(moving.id.clone()))?;
        if obstacles.iter().all(|o| !o.intersects(&collider)) {
            log::debug!("SceneComposer: placed '{}' after {attempt} attempt(s)", moving.id);
            return Ok(AvoidOutcome {
                transform: last,
                attempts: attempt,
                resolved: true,
            });
        }
    }
    log::warn!(
        "SceneComposer: '{}' still collides after {max_attempts} attempts, keeping the last placement",
        moving.id
    );
    Ok(AvoidOutcome {
        transform: last,
        attempts: max_attempts,
        resolved: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_lane::primitives::box_mesh;
    use approx::assert_abs_diff_eq;
    use relit_core::sampling::scene_rng;

    fn cube(id: &str, half: f32) -> ImportedAsset {
        ImportedAsset::new(id, vec![box_mesh(Vec3::splat(half))])
    }

    #[test]
    fn test_place_multi_rests_on_ground_inside_arena() {
        let mut assets = vec![cube("a", 2.0), cube("b", 0.3), cube("c", 10.0)];
        let params = PlacementParams::default();
        let placements = place_multi(&mut assets, 0.5, &params, &mut scene_rng(Some(4))).unwrap();
        assert_eq!(placements.len(), 3);
        for (asset, placement) in assets.iter().zip(&placements) {
            let b = asset.world_bounds().unwrap();
            assert_abs_diff_eq!(b.min.z, 0.0, epsilon = 1e-5);
            let planar = Vec3::new(placement.translation.x, placement.translation.y, 0.0).length();
            assert!(planar <= params.arena_radius);
            assert!((0.0..TAU).contains(&placement.rotation.z));
            assert_eq!((placement.rotation.x, placement.rotation.y), (0.0, 0.0));
            assert!(placement.resolved);
        }
    }

    #[test]
    fn test_place_multi_fails_on_empty_asset() {
        let mut assets = vec![cube("a", 1.0), ImportedAsset::new("hollow", vec![])];
        let err = place_multi(&mut assets, 0.5, &PlacementParams::default(), &mut scene_rng(Some(0))).unwrap_err();
        assert_eq!(err, ComposeError::EmptyAsset("hollow".into()));
    }

    #[test]
    fn test_y_up_ground_uses_y() {
        let mut assets = vec![cube("a", 1.0)];
        let params = PlacementParams {
            up_axis: UpAxis::Y,
            ..PlacementParams::default()
        };
        place_multi(&mut assets, 0.5, &params, &mut scene_rng(Some(2))).unwrap();
        assert_abs_diff_eq!(assets[0].world_bounds().unwrap().min.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_place_avoiding_accepts_free_spot() {
        let obstacle = MeshCollider::from_asset(&cube("fixed", 0.5)).unwrap();
        let mut moving = cube("moving", 0.2);
        let mut calls = 0;
        let outcome = place_avoiding(&mut moving, &[obstacle], 10, &mut scene_rng(Some(0)), |_| {
            calls += 1;
            // First proposal overlaps, second is clear.
            let x = if calls == 1 { 0.3 } else { 3.0 };
            Mat4::from_translation(Vec3::new(x, 0.0, 0.0))
        });
        let outcome = outcome.unwrap();
        assert!(outcome.resolved);
        assert_eq!(outcome.attempts, 2);
        assert_abs_diff_eq!(moving.world_bounds().unwrap().center().x, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_place_avoiding_keeps_last_attempt_when_exhausted() {
        let obstacle = MeshCollider::from_asset(&cube("fixed", 1.0)).unwrap();
        let mut moving = cube("moving", 0.2);
        let outcome = place_avoiding(&mut moving, &[obstacle], 5, &mut scene_rng(Some(0)), |rng| {
            Mat4::from_translation(Vec3::new(uniform(rng, -0.5, 0.5), 0.0, 0.0))
        })
        .unwrap();
        assert!(!outcome.resolved);
        assert_eq!(outcome.attempts, 5);
        assert_eq!(moving.root, outcome.transform);
    }
}
