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

use relit_core::math::{Mat4, Vec3};
use relit_core::{ImportedAsset, Normalization};

/// Half-extents below this are treated as a point; such assets keep scale 1.
const MIN_HALF_EXTENT: f32 = 1e-6;

/// Result of [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizeOutcome {
    /// The asset was rescaled and recentered.
    Normalized(Normalization),
    /// The asset has no mesh geometry and was left untouched.
    Empty,
}

impl NormalizeOutcome {
    /// The applied normalization; identity for empty assets.
    pub fn normalization(&self) -> Normalization {
        match self {
            NormalizeOutcome::Normalized(n) => *n,
            NormalizeOutcome::Empty => Normalization::IDENTITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, NormalizeOutcome::Empty)
    }
}

/// Scales `asset` so its largest world half-extent equals `target_radius`, then
/// translates it so its bounding box is centered on the origin.
///
/// `scale = target_radius / max(half_extent)`, `offset = -(center * scale)`.
/// Both are folded into `asset.root`.
pub fn normalize(asset: &mut ImportedAsset, target_radius: f32) -> NormalizeOutcome {
    let Some(bounds) = asset.world_bounds() else {
        return NormalizeOutcome::Empty;
    };
    let half = bounds.half_extents().max_element();
    let scale = if half < MIN_HALF_EXTENT { 1.0 } else { target_radius / half };
    let offset = -(bounds.center() * scale);

    asset.root = Mat4::from_translation(offset) * Mat4::from_scale(Vec3::splat(scale)) * asset.root;
    log::debug!(
        "SceneComposer: normalized '{}' with scale {scale:.6} offset {:?}",
        asset.id,
        offset.to_array()
    );
    NormalizeOutcome::Normalized(Normalization { scale, offset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use relit_core::MeshNode;

    fn box_asset(min: Vec3, max: Vec3) -> ImportedAsset {
        ImportedAsset::new("box", vec![MeshNode::new("b", vec![min, max], vec![])])
    }

    #[test]
    fn test_normalize_fits_target_radius() {
        let mut asset = box_asset(Vec3::new(1.0, 2.0, 3.0), Vec3::new(5.0, 4.0, 4.0));
        let n = normalize(&mut asset, 0.5).normalization();
        assert_abs_diff_eq!(n.scale, 0.25, epsilon = 1e-6);

        let b = asset.world_bounds().unwrap();
        assert_abs_diff_eq!(b.half_extents().max_element(), 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(b.center().length(), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(n.offset.x, -0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut asset = box_asset(Vec3::new(-3.0, 7.0, 1.0), Vec3::new(9.0, 8.0, 2.5));
        normalize(&mut asset, 0.5);
        let second = normalize(&mut asset, 0.5).normalization();
        assert_abs_diff_eq!(second.scale, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(second.offset.length(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_empty_asset_is_flagged() {
        let mut asset = ImportedAsset::new("nothing", vec![]);
        let outcome = normalize(&mut asset, 0.5);
        assert!(outcome.is_empty());
        assert_eq!(outcome.normalization(), Normalization::IDENTITY);
        assert_eq!(asset.root, Mat4::IDENTITY);
    }

    #[test]
    fn test_point_asset_keeps_unit_scale() {
        let p = Vec3::new(2.0, 2.0, 2.0);
        let mut asset = box_asset(p, p);
        let n = normalize(&mut asset, 0.5).normalization();
        assert_eq!(n.scale, 1.0);
        assert_eq!(n.offset, -p);
    }
}
