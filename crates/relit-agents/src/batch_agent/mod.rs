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

//! Batch processing of a manifest slice.
//!
//! Processes partition the manifest with `group_start`/`group_end` and never
//! share a scene directory, so no cross-process coordination is needed.

mod runner;

pub use runner::{BatchConfig, BatchRunner, BatchSummary, SceneFailure};
