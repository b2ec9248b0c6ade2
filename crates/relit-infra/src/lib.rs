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

//! # relit-infra
//!
//! Concrete implementations of the renderer collaborator.
//!
//! The only backend shipped here is [`PreviewRenderer`], a CPU z-buffer
//! rasterizer with Lambert shading. It produces the same outputs as a path
//! tracer would (beauty, depth, normal, albedo) at preview quality, which is
//! enough to exercise and inspect a dataset run end to end.

#[cfg(feature = "preview")]
pub mod preview;

#[cfg(feature = "preview")]
pub use preview::PreviewRenderer;
