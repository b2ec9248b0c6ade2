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

//! CPU preview backend.
//!
//! A view is produced in two steps: [`raster`] resolves visibility into a
//! geometry buffer, then [`shading`] lights it. The geometry buffer of the
//! last rendered camera is kept, so asking for the auxiliary passes of the
//! same view does not rasterize twice.

mod raster;
mod renderer;
mod shading;
mod textures;

pub use raster::{GBuffer, SceneTriangle};
pub use renderer::PreviewRenderer;
pub use shading::ActiveLight;
pub use textures::TextureCache;
