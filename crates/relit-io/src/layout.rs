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

//! Paths of every file a scene produces.
//!
//! ```text
//! <scene_root>/
//!   normalize.json  scene_info.json  done.txt
//!   <variant>/<record>.json
//!   train/ test/
//!     cameras.json
//!     <variant>/gt_<idx>.png
//!     depth/depth_<idx>.exr  normal/normal_cam_<idx>.exr  albedo/albedo_cam_<idx>.png
//! ```

use relit_core::{LightCategory, Split};
use std::path::{Path, PathBuf};

/// Scene directory name of the `index`-th multi-object scene.
pub fn multi_scene_id(index: usize) -> String {
    format!("scene_{index:06}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneLayout {
    root: PathBuf,
}

impl SceneLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<output_root>/<scene_id>`.
    pub fn for_scene(output_root: &Path, scene_id: &str) -> Self {
        Self::new(output_root.join(scene_id))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn split_dir(&self, split: Split) -> PathBuf {
        self.root.join(split.dir_name())
    }

    pub fn cameras_manifest(&self, split: Split) -> PathBuf {
        self.split_dir(split).join("cameras.json")
    }

    pub fn variant_dir(&self, split: Split, variant: &str) -> PathBuf {
        self.split_dir(split).join(variant)
    }

    pub fn beauty_image(&self, split: Split, variant: &str, view: usize) -> PathBuf {
        self.variant_dir(split, variant).join(format!("gt_{view}.png"))
    }

    pub fn depth_image(&self, split: Split, view: usize) -> PathBuf {
        self.split_dir(split).join("depth").join(format!("depth_{view}.exr"))
    }

    pub fn normal_image(&self, split: Split, view: usize) -> PathBuf {
        self.split_dir(split).join("normal").join(format!("normal_cam_{view}.exr"))
    }

    pub fn albedo_image(&self, split: Split, view: usize) -> PathBuf {
        self.split_dir(split).join("albedo").join(format!("albedo_cam_{view}.png"))
    }

    /// `<scene_root>/<variant>/<record>.json`, e.g. `white_pl_0/white_pl.json`.
    pub fn light_record(&self, category: LightCategory, variant: &str) -> PathBuf {
        self.root.join(variant).join(format!("{}.json", category.dir_prefix()))
    }

    pub fn normalize_record(&self) -> PathBuf {
        self.root.join("normalize.json")
    }

    pub fn scene_info(&self) -> PathBuf {
        self.root.join("scene_info.json")
    }

    pub fn done_marker(&self) -> PathBuf {
        self.root.join("done.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = SceneLayout::for_scene(Path::new("/out"), &multi_scene_id(7));
        assert_eq!(layout.root(), Path::new("/out/scene_000007"));
        assert_eq!(
            layout.beauty_image(Split::Train, "white_pl_0", 3),
            PathBuf::from("/out/scene_000007/train/white_pl_0/gt_3.png")
        );
        assert_eq!(
            layout.normal_image(Split::Test, 1),
            PathBuf::from("/out/scene_000007/test/normal/normal_cam_1.exr")
        );
        assert_eq!(
            layout.light_record(LightCategory::EnvColored, "env_2"),
            PathBuf::from("/out/scene_000007/env_2/env.json")
        );
        assert_eq!(layout.cameras_manifest(Split::Test), PathBuf::from("/out/scene_000007/test/cameras.json"));
    }
}
