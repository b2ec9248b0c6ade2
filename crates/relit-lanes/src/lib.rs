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

//! # relit-lanes
//!
//! The strategy layer: how assets become a composed scene and how a scene's
//! lighting variants are planned. Orchestration lives in `relit-agents`.

pub mod lighting_lane;
pub mod scene_lane;

pub use lighting_lane::{
    LightRecipes, LightingConfig, MultiLayout, PlanError, PlannedVariant, VariantCounts, VariantDescriptor,
    VariantPlan,
};
pub use scene_lane::{
    normalize, place_avoiding, place_multi, CompositionStrategy, GroundSceneStrategy, GroundSpec, ObstacleStrategy,
    PlacementParams, SingleAssetStrategy,
};
