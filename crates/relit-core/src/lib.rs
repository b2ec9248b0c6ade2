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

//! # relit-core
//!
//! Foundational types for multi-view relighting dataset generation: math,
//! deterministic sampling, camera poses, lights, composed scenes and the
//! contracts for the asset importer and render backend collaborators.
//!
//! This crate has no filesystem or renderer dependencies; concrete
//! implementations live in `relit-io` and `relit-infra`.

pub mod asset;
pub mod camera;
pub mod error;
pub mod light;
pub mod math;
pub mod physics;
pub mod renderer;
pub mod sampling;
pub mod scene;

pub use asset::{AssetImporter, ImportedAsset, MeshNode};
pub use camera::{look_at, CameraBuilder, CameraPose, FovPolicy, RadiusPolicy, Split};
pub use error::{CameraError, ComposeError, ImportError, RenderError, SamplingError};
pub use light::{AreaEmitter, Emitter, EnvironmentMap, LightCategory, LightSpec, PointEmitter};
pub use renderer::{AuxPasses, CameraHandle, ColorFrame, ColorMode, Frame, RenderSession, RenderSettings};
pub use scene::{AssetPlacement, ComposedScene, GroundPlane, Normalization, Primitive, SceneRecord};
