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

//! # relit-io
//!
//! Everything that touches the filesystem: the per-scene output layout, the
//! metadata records, the completion check that makes runs resumable, the
//! asset manifest, the mesh importers and the image writers.

pub mod completion;
pub mod env_list;
pub mod error;
pub mod images;
pub mod import;
pub mod layout;
pub mod manifest;
pub mod metadata;

pub use completion::{count_images, split_complete, variant_complete};
pub use env_list::{list_textures, load_env_list};
pub use error::{IoError, IoResult};
pub use import::{GltfImporter, ImporterRegistry, ObjImporter};
pub use layout::{multi_scene_id, SceneLayout};
pub use manifest::{merge_manifest, read_manifest, sample_object_paths, write_manifest, AssetManifest, ManifestEntry};
pub use metadata::{CameraRecord, LightRecord, MetadataStore, PrimitiveRecord, SceneInfo, SceneObject};
