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

//! The per-scene error: anything that aborts one scene but not the run.

use relit_core::{CameraError, ComposeError, ImportError, RenderError, SamplingError, Split};
use relit_io::IoError;
use relit_lanes::PlanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Io(#[from] IoError),

    /// A backend call outside of any view, e.g. loading the scene.
    #[error("Renderer failed: {0}")]
    Session(#[source] RenderError),

    #[error("Rendering view {view} of {split:?}/{variant} failed: {source}")]
    Render {
        variant: String,
        split: Split,
        view: usize,
        #[source]
        source: RenderError,
    },
}
