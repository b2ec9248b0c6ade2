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

//! # relit-agents
//!
//! The drivers of a dataset run. The [`RenderOrchestrator`] takes one composed
//! scene through every planned lighting variant and both camera splits; the
//! [`BatchRunner`] feeds it scenes built from a slice of the asset manifest.

pub mod batch_agent;
pub mod error;
pub mod render_agent;

pub use batch_agent::{BatchConfig, BatchRunner, BatchSummary, SceneFailure};
pub use error::SceneError;
pub use render_agent::{
    CameraRig, OrchestratorConfig, RenderOrchestrator, SceneCameras, SceneReport, SplitRig, VariantOutcome,
    VariantState, ViewSampling,
};
