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

use crate::render_agent::{RenderOrchestrator, SceneReport};
use anyhow::{bail, Context, Result};
use rand::seq::index;
use relit_core::sampling::SeedStream;
use relit_core::{AssetImporter, RenderSession};
use relit_io::{multi_scene_id, AssetManifest, ManifestEntry};
use relit_lanes::CompositionStrategy;
use std::path::PathBuf;

/// Where assets live and which part of the manifest this process owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub dataset_root: PathBuf,
    /// Asset file extension, without the dot.
    pub extension: String,
    pub group_start: usize,
    /// Exclusive. `None` runs to the end.
    pub group_end: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from("glbs"),
            extension: "glb".to_string(),
            group_start: 0,
            group_end: None,
        }
    }
}

/// A scene that failed; later scenes still run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneFailure {
    pub scene_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub rendered: usize,
    pub already_done: usize,
    pub failures: Vec<SceneFailure>,
}

struct SceneJob {
    id: String,
    index: u64,
    /// Fixed assets, or `None` when they are drawn from the manifest per scene.
    entries: Option<Vec<ManifestEntry>>,
}

/// Imports, composes and renders the scenes of one manifest slice.
pub struct BatchRunner<'a, S: RenderSession> {
    orchestrator: RenderOrchestrator<S>,
    importer: &'a dyn AssetImporter,
    strategy: &'a dyn CompositionStrategy,
    config: BatchConfig,
}

impl<'a, S: RenderSession> BatchRunner<'a, S> {
    pub fn new(
        orchestrator: RenderOrchestrator<S>,
        importer: &'a dyn AssetImporter,
        strategy: &'a dyn CompositionStrategy,
        config: BatchConfig,
    ) -> Self {
        Self {
            orchestrator,
            importer,
            strategy,
            config,
        }
    }

    pub fn orchestrator(&self) -> &RenderOrchestrator<S> {
        &self.orchestrator
    }

    pub fn into_orchestrator(self) -> RenderOrchestrator<S> {
        self.orchestrator
    }

    /// Single-asset strategies get one scene per manifest entry, named by uid.
    /// Multi-asset strategies get scenes `scene_{i:06}` for `i` in the group
    /// range, each drawing its assets from the whole manifest.
    fn scene_jobs(&self, manifest: &AssetManifest) -> Vec<SceneJob> {
        let per_scene = self.strategy.assets_per_scene();
        let start = self.config.group_start;
        if per_scene <= 1 {
            return manifest
                .range(start, self.config.group_end)
                .iter()
                .enumerate()
                .map(|(offset, entry)| SceneJob {
                    id: entry.uid.clone(),
                    index: (start + offset) as u64,
                    entries: Some(vec![entry.clone()]),
                })
                .collect();
        }
        let end = self.config.group_end.unwrap_or(manifest.len() / per_scene);
        (start..end)
            .map(|i| SceneJob {
                id: multi_scene_id(i),
                index: i as u64,
                entries: None,
            })
            .collect()
    }

    fn process(&mut self, manifest: &AssetManifest, job: &SceneJob) -> Result<SceneReport> {
        let mut rng = self
            .orchestrator
            .seeds()
            .rng_for(job.index, SeedStream::Composition);
        let entries = match &job.entries {
            Some(entries) => entries.clone(),
            None => {
                let per_scene = self.strategy.assets_per_scene();
                if manifest.len() < per_scene {
                    bail!(
                        "manifest holds {} asset(s), a scene needs {per_scene}",
                        manifest.len()
                    );
                }
                index::sample(&mut rng, manifest.len(), per_scene)
                    .into_iter()
                    .map(|i| manifest.entries()[i].clone())
                    .collect()
            }
        };

        let mut assets = Vec::with_capacity(entries.len());
        for entry in &entries {
            let path = entry.asset_path(&self.config.dataset_root, &self.config.extension);
            let asset = self
                .importer
                .import(&path, &entry.uid)
                .with_context(|| format!("importing {}", path.display()))?;
            assets.push(asset);
        }
        let scene = self
            .strategy
            .compose(assets, &mut rng)
            .with_context(|| format!("composing with '{}'", self.strategy.strategy_name()))?;
        let report = self.orchestrator.render_scene(&job.id, job.index, &scene)?;
        Ok(report)
    }

    /// Runs every scene of the slice. Failures are collected, never propagated.
    pub fn run(&mut self, manifest: &AssetManifest) -> BatchSummary {
        let jobs = self.scene_jobs(manifest);
        log::info!(
            "BatchRunner: {} scene(s) with strategy '{}'",
            jobs.len(),
            self.strategy.strategy_name()
        );
        let mut summary = BatchSummary::default();
        for (position, job) in jobs.iter().enumerate() {
            if self.orchestrator.is_scene_done(&job.id) {
                log::info!("BatchRunner: '{}' already done", job.id);
                summary.already_done += 1;
                continue;
            }
            log::info!("BatchRunner: scene '{}' ({}/{})", job.id, position + 1, jobs.len());
            match self.process(manifest, job) {
                Ok(_) => summary.rendered += 1,
                Err(e) => {
                    log::error!("BatchRunner: '{}' failed: {e:#}", job.id);
                    summary.failures.push(SceneFailure {
                        scene_id: job.id.clone(),
                        message: format!("{e:#}"),
                    });
                }
            }
        }
        log::info!(
            "BatchRunner: {} rendered, {} already done, {} failed",
            summary.rendered,
            summary.already_done,
            summary.failures.len()
        );
        summary
    }
}
