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

//! Fans one base seed out into independent per-scene, per-purpose streams.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// The generator behind every sampled quantity. PCG gives portable output.
pub type SceneRng = Pcg64Mcg;

/// Spacing between consecutive scenes' seed blocks.
///
/// Larger than the number of [`SeedStream`]s, so scene `i`'s streams never
/// reuse scene `i + 1`'s.
pub const SCENE_SEED_STRIDE: u64 = 16;

/// Creates a generator; `None` draws a seed from OS entropy.
pub fn scene_rng(seed: Option<u64>) -> SceneRng {
    match seed {
        Some(seed) => SceneRng::seed_from_u64(seed),
        None => SceneRng::from_os_rng(),
    }
}

/// A named random stream inside one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedStream {
    /// Camera eye positions and field-of-view jitter.
    View,
    /// White point light positions and powers.
    WhitePointLight,
    /// Colored point light positions, powers and colors.
    RgbPointLight,
    /// Multi point light clusters.
    MultiPointLight,
    /// Area light positions, sizes and colors.
    AreaLight,
    /// White environment rotations.
    WhiteEnv,
    /// Colored environment map selection and rotations.
    EnvColored,
    /// Asset placement, yaw and ground selection.
    Composition,
}

impl SeedStream {
    /// Every stream, in offset order.
    pub const ALL: [SeedStream; 8] = [
        SeedStream::View,
        SeedStream::WhitePointLight,
        SeedStream::RgbPointLight,
        SeedStream::MultiPointLight,
        SeedStream::AreaLight,
        SeedStream::WhiteEnv,
        SeedStream::EnvColored,
        SeedStream::Composition,
    ];

    /// Fixed offset added to the scene seed. Distinct per stream.
    pub const fn offset(self) -> u64 {
        match self {
            SeedStream::View => 0,
            SeedStream::WhitePointLight => 1,
            SeedStream::RgbPointLight => 2,
            SeedStream::MultiPointLight => 3,
            SeedStream::AreaLight => 4,
            SeedStream::WhiteEnv => 5,
            SeedStream::EnvColored => 6,
            SeedStream::Composition => 7,
        }
    }
}

/// Derives stream seeds from a base seed and a scene index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedPlan {
    base: Option<u64>,
}

impl SeedPlan {
    /// A plan rooted at `base`. `None` disables determinism.
    pub const fn new(base: Option<u64>) -> Self {
        Self { base }
    }

    pub const fn base(&self) -> Option<u64> {
        self.base
    }

    /// `base + scene_index * SCENE_SEED_STRIDE + stream.offset()`, wrapping on overflow.
    pub fn seed_for(&self, scene_index: u64, stream: SeedStream) -> Option<u64> {
        self.base.map(|base| {
            base.wrapping_add(scene_index.wrapping_mul(SCENE_SEED_STRIDE))
                .wrapping_add(stream.offset())
        })
    }

    /// A fresh generator for one stream of one scene.
    pub fn rng_for(&self, scene_index: u64, stream: SeedStream) -> SceneRng {
        scene_rng(self.seed_for(scene_index, stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::HashSet;

    #[test]
    fn test_stream_offsets_are_distinct_and_below_stride() {
        let offsets: HashSet<u64> = SeedStream::ALL.iter().map(|s| s.offset()).collect();
        assert_eq!(offsets.len(), SeedStream::ALL.len());
        assert!(offsets.iter().all(|o| *o < SCENE_SEED_STRIDE));
    }

    #[test]
    fn test_seeds_never_collide_across_scenes() {
        let plan = SeedPlan::new(Some(42));
        let mut seen = HashSet::new();
        for scene in 0..64 {
            for stream in SeedStream::ALL {
                assert!(seen.insert(plan.seed_for(scene, stream).unwrap()));
            }
        }
    }

    #[test]
    fn test_light_offsets_keep_legacy_values() {
        let plan = SeedPlan::new(Some(100));
        assert_eq!(plan.seed_for(0, SeedStream::View), Some(100));
        assert_eq!(plan.seed_for(0, SeedStream::WhitePointLight), Some(101));
        assert_eq!(plan.seed_for(0, SeedStream::AreaLight), Some(104));
        assert_eq!(plan.seed_for(2, SeedStream::RgbPointLight), Some(134));
        assert_eq!(SeedPlan::new(None).seed_for(3, SeedStream::View), None);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let draw = |seed| {
            let mut rng = scene_rng(Some(seed));
            (0..4).map(|_| rng.random()).collect::<Vec<u64>>()
        };
        assert_eq!(draw(7), draw(7));
        assert_ne!(draw(7), draw(8));
    }
}
