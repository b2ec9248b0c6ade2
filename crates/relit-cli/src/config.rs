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

//! The TOML run configuration.
//!
//! Every section and field has a default, so a file only needs the values it
//! changes. A missing file is not an error.

use crate::cli::RenderArgs;
use anyhow::{ensure, Context, Result};
use relit_agents::{BatchConfig, CameraRig, OrchestratorConfig};
use relit_core::camera::FovPolicy;
use relit_core::sampling::{ClusterSpread, UpAxis};
use relit_core::{ColorMode, RenderSettings};
use relit_io::load_env_list;
use relit_lanes::{LightingConfig, MultiLayout, VariantCounts};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Z,
    Y,
}

impl From<Axis> for UpAxis {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Z => UpAxis::Z,
            Axis::Y => UpAxis::Y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputColor {
    Rgb,
    #[default]
    Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RigPreset {
    /// Multi-object scenes seen from a shell and a ring.
    Dense,
    /// One normalized asset framed by the fit-sphere distance.
    #[default]
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyName {
    #[default]
    Single,
    Ground,
    Obstacle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightLayout {
    #[default]
    Scattered,
    Clustered,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// CSV of `folder,uid` rows.
    pub manifest: PathBuf,
    pub dataset_root: PathBuf,
    pub extension: String,
    pub output_root: PathBuf,
    pub group_start: usize,
    pub group_end: Option<usize>,
    /// Assets per scene for the ground strategy.
    pub objects_per_scene: usize,
    pub up_axis: Axis,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("manifest.csv"),
            dataset_root: PathBuf::from("glbs"),
            extension: "glb".to_string(),
            output_root: PathBuf::from("output"),
            group_start: 0,
            group_end: None,
            objects_per_scene: 3,
            up_axis: Axis::Z,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub film_transparent: bool,
    pub color_mode: OutputColor,
    pub seed: Option<u64>,
    pub save_intrinsics: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            film_transparent: true,
            color_mode: OutputColor::Rgba,
            seed: None,
            save_intrinsics: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CamerasConfig {
    pub preset: RigPreset,
    pub train_views: usize,
    pub test_views: usize,
    /// Replaces the preset's field of view for both splits.
    pub fov_deg: Option<f32>,
    /// Per-camera `[min, max]` field of view in degrees. Ignored when `fov_deg` is set.
    pub fov_range: Option<[f32; 2]>,
}

impl Default for CamerasConfig {
    fn default() -> Self {
        Self {
            preset: RigPreset::Single,
            train_views: 5,
            test_views: 5,
            fov_deg: None,
            fov_range: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightingSection {
    pub white_env: usize,
    pub white_pl: usize,
    pub rgb_pl: usize,
    pub multi_pl: usize,
    pub env_colored: usize,
    pub area: usize,
    pub max_pl_num: usize,
    pub multi_layout: LightLayout,
    pub white_env_dir: PathBuf,
    pub env_dir: PathBuf,
    /// JSON list of environment map names.
    pub env_list: Option<PathBuf>,
}

impl Default for LightingSection {
    fn default() -> Self {
        let counts = VariantCounts::default();
        Self {
            white_env: counts.white_env,
            white_pl: counts.white_pl,
            rgb_pl: counts.rgb_pl,
            multi_pl: counts.multi_pl,
            env_colored: counts.env_colored,
            area: counts.area,
            max_pl_num: 3,
            multi_layout: LightLayout::Scattered,
            white_env_dir: PathBuf::from("env_maps"),
            env_dir: PathBuf::from("env_maps"),
            env_list: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    pub strategy: StrategyName,
    pub target_radius: f32,
    pub arena_radius: f32,
    pub ground: bool,
    pub ground_size: f32,
    pub ground_texture_dir: Option<PathBuf>,
    pub obstacle_texture_dir: Option<PathBuf>,
    /// Obstacle placement attempts before keeping the last one.
    pub max_attempts: usize,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyName::Single,
            target_radius: 0.5,
            arena_radius: 2.0,
            ground: true,
            ground_size: 50.0,
            ground_texture_dir: None,
            obstacle_texture_dir: None,
            max_attempts: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Images a split needs to count as done. Defaults to its camera count.
    pub completion_threshold: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub dataset: DatasetConfig,
    pub render: RenderConfig,
    pub cameras: CamerasConfig,
    pub lighting: LightingSection,
    pub composition: CompositionConfig,
    pub output: OutputConfig,
}

impl RunConfig {
    /// Reads `path`, or returns the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!("Config: '{}' not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))?;
        log::info!("Config: loaded '{}'", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Command line values win over the file.
    pub fn apply(&mut self, args: &RenderArgs) {
        if let Some(seed) = args.seed {
            self.render.seed = Some(seed);
        }
        if let Some(start) = args.group_start {
            self.dataset.group_start = start;
        }
        if let Some(end) = args.group_end {
            self.dataset.group_end = Some(end);
        }
        if let Some(output) = &args.output {
            self.dataset.output_root = output.clone();
        }
    }

    pub fn up_axis(&self) -> UpAxis {
        self.dataset.up_axis.into()
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            width: self.render.width,
            height: self.render.height,
            film_transparent: self.render.film_transparent,
            color_mode: match self.render.color_mode {
                OutputColor::Rgb => ColorMode::Rgb,
                OutputColor::Rgba => ColorMode::Rgba,
            },
        }
    }

    pub fn camera_rig(&self) -> CameraRig {
        let cameras = &self.cameras;
        let mut rig = match cameras.preset {
            RigPreset::Dense => CameraRig::dense_scene(cameras.train_views, cameras.test_views, self.up_axis()),
            RigPreset::Single => CameraRig::single_asset(cameras.train_views, cameras.test_views, self.up_axis()),
        };
        let fov = match (cameras.fov_deg, cameras.fov_range) {
            (Some(fov), _) => Some(FovPolicy::Fixed(fov)),
            (None, Some([min_deg, max_deg])) => Some(FovPolicy::Jitter { min_deg, max_deg }),
            (None, None) => None,
        };
        if let Some(fov) = fov {
            rig.train.builder = rig.train.builder.with_fov(fov);
            rig.test.builder = rig.test.builder.with_fov(fov);
        }
        rig
    }

    pub fn variant_counts(&self) -> VariantCounts {
        let l = &self.lighting;
        VariantCounts {
            white_env: l.white_env,
            white_pl: l.white_pl,
            rgb_pl: l.rgb_pl,
            multi_pl: l.multi_pl,
            env_colored: l.env_colored,
            area: l.area,
        }
    }

    /// Resolves the environment map list, failing early if colored environments
    /// are requested without any maps.
    pub fn lighting_config(&self) -> Result<LightingConfig> {
        let section = &self.lighting;
        let env_maps = match &section.env_list {
            Some(path) => load_env_list(path)
                .with_context(|| format!("Failed to load environment list '{}'", path.display()))?,
            None => Vec::new(),
        };
        ensure!(
            section.env_colored == 0 || !env_maps.is_empty(),
            "lighting.env_colored is {} but no environment maps are listed (set lighting.env_list)",
            section.env_colored
        );
        Ok(LightingConfig {
            counts: self.variant_counts(),
            max_pl_num: section.max_pl_num,
            white_env_dir: section.white_env_dir.clone(),
            env_dir: section.env_dir.clone(),
            env_maps,
            multi_layout: match section.multi_layout {
                LightLayout::Scattered => MultiLayout::Scattered,
                LightLayout::Clustered => MultiLayout::Clustered(ClusterSpread::default()),
            },
            up_axis: self.up_axis(),
            ..LightingConfig::default()
        })
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            dataset_root: self.dataset.dataset_root.clone(),
            extension: self.dataset.extension.clone(),
            group_start: self.dataset.group_start,
            group_end: self.dataset.group_end,
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            save_intrinsics: self.render.save_intrinsics,
            completion_threshold: self.output.completion_threshold,
        }
    }
}
