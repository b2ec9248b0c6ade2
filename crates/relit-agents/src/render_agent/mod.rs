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

//! The render orchestration layer.
//!
//! For each scene the orchestrator:
//! - samples (or reloads) the train and test cameras,
//! - plans the lighting variants,
//! - walks every variant through `Pending -> RenderingTrain -> RenderingTest -> Complete`,
//!   or straight to `Skipped` when its images already exist on disk,
//! - captures the auxiliary passes once, during the first variant it renders,
//! - writes `done.txt` once every variant is terminal.

mod agent;
mod rig;
mod state;

pub use agent::{OrchestratorConfig, RenderOrchestrator, SceneReport, VariantOutcome};
pub use rig::{CameraRig, SceneCameras, SplitRig, ViewSampling};
pub use state::VariantState;
