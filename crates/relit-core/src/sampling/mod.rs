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

//! Deterministic point sampling on spherical shells.
//!
//! Every sampler here is a pure function of its seed and parameters: the same
//! seed yields a bit-identical point sequence on every platform, which is what
//! makes a rendered dataset reproducible.

mod seed;
mod shell;

pub use self::seed::{scene_rng, SceneRng, SeedPlan, SeedStream, SCENE_SEED_STRIDE};
pub use self::shell::{
    sample_clustered, sample_shell, sample_trajectory, ClusterSpread, PointSampler, ShellParams,
    CLUSTER_POLAR_CAP_DEG, DEFAULT_MAX_REJECTIONS,
};

use crate::math::Vec3;
use rand::Rng;

/// The world axis treated as "up" for sampling, cameras and ground placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpAxis {
    /// Z-up, the default world convention.
    #[default]
    Z,
    /// Y-up; sampled points get their Y and Z components swapped.
    Y,
}

impl UpAxis {
    /// The unit vector pointing up.
    pub fn vector(self) -> Vec3 {
        match self {
            UpAxis::Z => Vec3::Z,
            UpAxis::Y => Vec3::Y,
        }
    }

    /// Remaps a Z-up point into this convention. This is an axis swap, not a resample.
    pub fn remap(self, p: Vec3) -> Vec3 {
        match self {
            UpAxis::Z => p,
            UpAxis::Y => Vec3::new(p.x, p.z, p.y),
        }
    }

    /// The component of `p` along this up axis.
    pub fn height(self, p: Vec3) -> f32 {
        match self {
            UpAxis::Z => p.z,
            UpAxis::Y => p.y,
        }
    }

    /// Returns `p` with its up component replaced by `h`.
    pub fn with_height(self, p: Vec3, h: f32) -> Vec3 {
        match self {
            UpAxis::Z => Vec3::new(p.x, p.y, h),
            UpAxis::Y => Vec3::new(p.x, h, p.z),
        }
    }
}

/// Draws from `[lo, hi)` as `lo + u * (hi - lo)`. A degenerate range returns `lo`.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

/// Repeats `draw` until `accept` holds, giving up after `max_attempts` draws.
///
/// Every rejection loop in the crate goes through here so none can spin forever.
pub fn sample_with_retry<T, E>(
    max_attempts: usize,
    mut draw: impl FnMut() -> T,
    mut accept: impl FnMut(&T) -> bool,
    exhausted: impl FnOnce(usize) -> E,
) -> Result<T, E> {
    for _ in 0..max_attempts {
        let candidate = draw();
        if accept(&candidate) {
            return Ok(candidate);
        }
    }
    Err(exhausted(max_attempts))
}

/// Spherical to Cartesian in the Z-up convention, `theta` measured from +Z.
#[inline]
pub fn spherical_to_cartesian(radius: f32, theta: f32, phi: f32) -> Vec3 {
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    Vec3::new(radius * sin_t * cos_p, radius * sin_t * sin_p, radius * cos_t)
}
