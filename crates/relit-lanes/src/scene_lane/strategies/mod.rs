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

//! Defines the contract for composition strategies and their implementations.
//!
//! A strategy turns the imported assets of one scene into a [`ComposedScene`].
//! The orchestrator selects one by configuration and never branches on the
//! kind of scene itself.

mod ground;
mod obstacle;
mod single;

pub use ground::{GroundSceneStrategy, GroundSpec};
pub use obstacle::{ObstacleStrategy, OBSTACLE_ASSET_ID};
pub use single::SingleAssetStrategy;

use rand::seq::IndexedRandom;
use relit_core::sampling::SceneRng;
use relit_core::{ComposeError, ComposedScene, ImportedAsset};
use std::path::PathBuf;

/// The abstract contract for a scene composition strategy.
pub trait CompositionStrategy {
    /// Stable name, used in configuration and logs.
    fn strategy_name(&self) -> &'static str;

    /// How many assets one scene consumes.
    fn assets_per_scene(&self) -> usize;

    /// Normalizes and places `assets`, drawing every random choice from `rng`.
    fn compose(&self, assets: Vec<ImportedAsset>, rng: &mut SceneRng) -> Result<ComposedScene, ComposeError>;
}

fn expect_count(strategy: &'static str, expected: usize, assets: &[ImportedAsset]) -> Result<(), ComposeError> {
    if assets.len() == expected {
        Ok(())
    } else {
        Err(ComposeError::AssetCount {
            strategy,
            expected,
            actual: assets.len(),
        })
    }
}

fn choose_texture(textures: &[PathBuf], rng: &mut SceneRng) -> Option<PathBuf> {
    textures.choose(rng).cloned()
}
