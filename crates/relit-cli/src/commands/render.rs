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

//! `relit render`: import, compose and render a manifest slice.

use crate::config::{RunConfig, StrategyName};
use anyhow::{Context, Result};
use relit_agents::{BatchRunner, BatchSummary, RenderOrchestrator};
use relit_core::sampling::SeedPlan;
use relit_infra::PreviewRenderer;
use relit_io::{list_textures, read_manifest, ImporterRegistry};
use relit_lanes::{
    CompositionStrategy, GroundSceneStrategy, GroundSpec, ObstacleStrategy, PlacementParams, SingleAssetStrategy,
};
use std::path::{Path, PathBuf};

fn textures(dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    match dir {
        Some(dir) => list_textures(dir).with_context(|| format!("Failed to list textures in '{}'", dir.display())),
        None => Ok(Vec::new()),
    }
}

/// The composition strategy named by the configuration.
pub fn build_strategy(config: &RunConfig) -> Result<Box<dyn CompositionStrategy>> {
    let composition = &config.composition;
    let strategy: Box<dyn CompositionStrategy> = match composition.strategy {
        StrategyName::Single => Box::new(SingleAssetStrategy {
            target_radius: composition.target_radius,
        }),
        StrategyName::Ground => {
            let ground = if composition.ground {
                Some(GroundSpec {
                    size: composition.ground_size,
                    textures: textures(composition.ground_texture_dir.as_deref())?,
                })
            } else {
                None
            };
            Box::new(GroundSceneStrategy {
                objects_per_scene: config.dataset.objects_per_scene,
                target_radius: composition.target_radius,
                placement: PlacementParams {
                    arena_radius: composition.arena_radius,
                    up_axis: config.up_axis(),
                    ..PlacementParams::default()
                },
                ground,
            })
        }
        StrategyName::Obstacle => Box::new(ObstacleStrategy {
            target_radius: composition.target_radius,
            outer_radius: composition.arena_radius,
            max_attempts: composition.max_attempts,
            textures: textures(composition.obstacle_texture_dir.as_deref())?,
            up_axis: config.up_axis(),
            ..ObstacleStrategy::default()
        }),
    };
    Ok(strategy)
}

pub fn run(config: &RunConfig) -> Result<BatchSummary> {
    let manifest = read_manifest(&config.dataset.manifest)
        .with_context(|| format!("Failed to read manifest '{}'", config.dataset.manifest.display()))?;
    let strategy = build_strategy(config)?;
    let lighting = config.lighting_config()?;
    log::info!(
        "Render: {} manifest entries, {} variant(s) per scene, seed {:?}",
        manifest.len(),
        lighting.counts.total(),
        config.render.seed
    );

    let orchestrator = RenderOrchestrator::new(
        PreviewRenderer::new(config.up_axis()),
        &config.render_settings(),
        &config.dataset.output_root,
        lighting,
        config.camera_rig(),
        SeedPlan::new(config.render.seed),
        config.orchestrator_config(),
    )?;
    let importer = ImporterRegistry::with_defaults();
    let mut runner = BatchRunner::new(orchestrator, &importer, strategy.as_ref(), config.batch_config());
    Ok(runner.run(&manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relit_core::Split;
    use relit_io::{write_manifest, ManifestEntry, SceneLayout};
    use std::fs;

    const CUBE: &str = "o cube
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
f 1 2 3 4
f 5 8 7 6
f 1 5 6 2
f 2 6 7 3
f 3 7 8 4
f 5 1 4 8
";

    fn config(root: &Path) -> RunConfig {
        let mut config = RunConfig::default();
        config.dataset.manifest = root.join("manifest.csv");
        config.dataset.dataset_root = root.join("assets");
        config.dataset.extension = "obj".to_string();
        config.dataset.output_root = root.join("out");
        config.render.width = 8;
        config.render.height = 8;
        config.render.seed = Some(42);
        config.cameras.train_views = 2;
        config.cameras.test_views = 1;
        config.lighting.white_pl = 1;
        config.lighting.rgb_pl = 0;
        config.lighting.multi_pl = 0;
        config.lighting.env_colored = 0;
        config.lighting.area = 0;
        config.lighting.white_env_dir = root.join("env_maps");
        config
    }

    #[test]
    fn test_render_end_to_end_and_resume() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("assets/000-000")).unwrap();
        fs::write(root.join("assets/000-000/cube.obj"), CUBE).unwrap();
        write_manifest(
            &root.join("manifest.csv"),
            &[ManifestEntry::new("000-000", "cube"), ManifestEntry::new("000-000", "missing")],
        )
        .unwrap();
        let config = config(root);

        let summary = run(&config).unwrap();
        assert_eq!(summary.rendered, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].scene_id, "missing");

        let layout = SceneLayout::for_scene(&root.join("out"), "cube");
        for variant in ["white_env_0", "white_pl_0"] {
            assert!(layout.beauty_image(Split::Train, variant, 1).is_file());
            assert!(layout.beauty_image(Split::Test, variant, 0).is_file());
        }
        assert!(layout.depth_image(Split::Train, 0).is_file());
        assert!(layout.normal_image(Split::Test, 0).is_file());
        assert!(layout.albedo_image(Split::Train, 1).is_file());
        assert!(layout.cameras_manifest(Split::Train).is_file());
        assert!(layout.normalize_record().is_file());
        assert!(layout.done_marker().is_file());

        let summary = run(&config).unwrap();
        assert_eq!(summary.rendered, 0);
        assert_eq!(summary.already_done, 1);
    }

    #[test]
    fn test_strategy_selection() {
        let mut config = RunConfig::default();
        assert_eq!(build_strategy(&config).unwrap().strategy_name(), "single");
        config.composition.strategy = StrategyName::Ground;
        config.dataset.objects_per_scene = 4;
        let ground = build_strategy(&config).unwrap();
        assert_eq!(ground.strategy_name(), "ground");
        assert_eq!(ground.assets_per_scene(), 4);
        config.composition.strategy = StrategyName::Obstacle;
        assert_eq!(build_strategy(&config).unwrap().strategy_name(), "obstacle");
    }
}
