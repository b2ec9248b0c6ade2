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

//! Defines the RenderOrchestrator, which drives one scene through every lighting variant.

use super::rig::{CameraRig, SceneCameras};
use super::state::VariantState;
use crate::error::SceneError;
use relit_core::sampling::SeedPlan;
use relit_core::{CameraHandle, CameraPose, ComposedScene, RenderSession, RenderSettings, Split};
use relit_io::images::{write_albedo_png, write_beauty_png, write_camera_normal_exr, write_depth_exr};
use relit_io::{variant_complete, MetadataStore, SceneLayout};
use relit_lanes::{LightingConfig, PlannedVariant, VariantPlan};
use std::path::{Path, PathBuf};

/// Behavior switches of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Capture depth, normal and albedo during the first rendered variant.
    pub save_intrinsics: bool,
    /// Images required for a split to count as complete. Defaults to the split's camera count.
    pub completion_threshold: Option<usize>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            save_intrinsics: true,
            completion_threshold: None,
        }
    }
}

/// Final state of one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantOutcome {
    pub name: String,
    pub state: VariantState,
}

/// What happened to a scene.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneReport {
    pub scene_id: String,
    /// The scene already had its `done.txt`; nothing was touched.
    pub already_done: bool,
    /// Cameras came from existing manifests.
    pub reused_cameras: bool,
    pub intrinsics_captured: bool,
    pub rendered_views: usize,
    pub variants: Vec<VariantOutcome>,
}

impl SceneReport {
    pub fn count(&self, state: VariantState) -> usize {
        self.variants.iter().filter(|v| v.state == state).count()
    }
}

/// Renders scenes through a [`RenderSession`] and persists images and metadata.
///
/// The session is configured once at construction and reused for every scene.
pub struct RenderOrchestrator<S: RenderSession> {
    session: S,
    output_root: PathBuf,
    lighting: LightingConfig,
    rig: CameraRig,
    seeds: SeedPlan,
    config: OrchestratorConfig,
}

/// Per-scene mutable state threaded through the variant loop.
struct SceneRun<'a> {
    store: &'a MetadataStore,
    cameras: &'a SceneCameras,
    intrinsics_saved: bool,
    rendered_views: usize,
}

impl<S: RenderSession> RenderOrchestrator<S> {
    pub fn new(
        mut session: S,
        settings: &RenderSettings,
        output_root: impl Into<PathBuf>,
        lighting: LightingConfig,
        rig: CameraRig,
        seeds: SeedPlan,
        config: OrchestratorConfig,
    ) -> Result<Self, SceneError> {
        session.configure(settings).map_err(SceneError::Session)?;
        log::info!(
            "RenderOrchestrator: using '{}' at {}x{}",
            session.backend_name(),
            settings.width,
            settings.height
        );
        Ok(Self {
            session,
            output_root: output_root.into(),
            lighting,
            rig,
            seeds,
            config,
        })
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn seeds(&self) -> &SeedPlan {
        &self.seeds
    }

    /// Whether `scene_id` already carries its terminal marker.
    pub fn is_scene_done(&self, scene_id: &str) -> bool {
        MetadataStore::new(SceneLayout::for_scene(&self.output_root, scene_id)).is_done()
    }

    /// Renders every planned variant of `scene` into `<output_root>/<scene_id>`.
    ///
    /// Any renderer failure aborts the scene: no marker is written, and the next
    /// run resumes from whatever is incomplete on disk.
    pub fn render_scene(
        &mut self,
        scene_id: &str,
        scene_index: u64,
        scene: &ComposedScene,
    ) -> Result<SceneReport, SceneError> {
        let store = MetadataStore::new(SceneLayout::for_scene(&self.output_root, scene_id));
        let mut report = SceneReport {
            scene_id: scene_id.to_string(),
            ..SceneReport::default()
        };
        if store.is_done() {
            log::info!("RenderOrchestrator: '{scene_id}' is already done, skipping");
            report.already_done = true;
            return Ok(report);
        }

        store.write_scene_record(&scene.record)?;

        let (cameras, reused) = match saved_cameras(&store) {
            Some(cameras) => (cameras, true),
            None => (self.rig.sample(&self.seeds, scene_index)?, false),
        };
        report.reused_cameras = reused;
        if reused {
            log::info!("RenderOrchestrator: '{scene_id}' reuses its saved cameras");
        }

        let plan = VariantPlan::build(&self.lighting, &self.seeds, scene_index)?;
        self.session.load_scene(scene).map_err(SceneError::Session)?;

        let mut run = SceneRun {
            store: &store,
            cameras: &cameras,
            // Reused cameras imply the passes were saved by the run that sampled them.
            intrinsics_saved: reused || !self.config.save_intrinsics,
            rendered_views: 0,
        };
        let saved_before = run.intrinsics_saved;
        for variant in plan.iter() {
            let name = variant.descriptor.name();
            let state = self.run_variant(&mut run, variant, &name)?;
            report.variants.push(VariantOutcome { name, state });
        }
        report.intrinsics_captured = !saved_before && run.intrinsics_saved;
        report.rendered_views = run.rendered_views;

        store.mark_done()?;
        log::info!(
            "RenderOrchestrator: '{scene_id}' done ({} rendered, {} skipped, {} views)",
            report.count(VariantState::Complete),
            report.count(VariantState::Skipped),
            report.rendered_views
        );
        Ok(report)
    }

    fn expected_images(&self, cameras: &SceneCameras, splits: &[Split]) -> Vec<(Split, usize)> {
        splits
            .iter()
            .map(|split| {
                let count = cameras.get(*split).len();
                (*split, self.config.completion_threshold.unwrap_or(count))
            })
            .collect()
    }

    fn run_variant(
        &mut self,
        run: &mut SceneRun<'_>,
        variant: &PlannedVariant,
        name: &str,
    ) -> Result<VariantState, SceneError> {
        let mut state = VariantState::Pending;
        let splits = &variant.descriptor.splits;
        let expected = self.expected_images(run.cameras, splits);
        if variant_complete(run.store.layout(), name, &expected) {
            advance(&mut state, VariantState::Skipped, name);
            return Ok(state);
        }

        // Replace the light set; multi-light variants then accumulate.
        self.session.clear_lights().map_err(SceneError::Session)?;
        for emitter in variant.light.emitters() {
            self.session.add_light(&emitter).map_err(SceneError::Session)?;
        }

        let capture = !run.intrinsics_saved;
        log::info!(
            "RenderOrchestrator: rendering {name}{}",
            if capture { " with intrinsics" } else { "" }
        );
        for split in splits {
            advance(&mut state, VariantState::rendering(*split), name);
            let poses = run.cameras.get(*split);
            for pose in poses {
                self.render_view(run.store, *split, name, pose, capture)?;
                run.rendered_views += 1;
            }
            run.store.write_cameras(*split, poses)?;
        }
        if capture {
            run.intrinsics_saved = true;
        }
        run.store.write_light(name, &variant.light)?;
        advance(&mut state, VariantState::Complete, name);
        Ok(state)
    }

    /// Creates a camera, renders, writes, and destroys the camera whatever happened.
    fn render_view(
        &mut self,
        store: &MetadataStore,
        split: Split,
        variant: &str,
        pose: &CameraPose,
        capture: bool,
    ) -> Result<(), SceneError> {
        let render_error = |source| SceneError::Render {
            variant: variant.to_string(),
            split,
            view: pose.id,
            source,
        };
        let handle = self.session.create_camera(pose).map_err(render_error)?;
        let outcome = self.capture_view(store, handle, split, variant, pose, capture);
        let destroyed = self.session.destroy_camera(handle).map_err(render_error);
        outcome.and(destroyed)
    }

    fn capture_view(
        &mut self,
        store: &MetadataStore,
        handle: CameraHandle,
        split: Split,
        variant: &str,
        pose: &CameraPose,
        capture: bool,
    ) -> Result<(), SceneError> {
        let render_error = |source| SceneError::Render {
            variant: variant.to_string(),
            split,
            view: pose.id,
            source,
        };
        let layout = store.layout();
        let frame = self.session.render(handle).map_err(render_error)?;
        write_beauty_png(&layout.beauty_image(split, variant, pose.id), &frame)?;
        log::debug!("RenderOrchestrator: {variant} {split:?} view {} written", pose.id);

        if capture {
            match self.session.render_aux_passes(handle).map_err(render_error)? {
                Some(aux) => {
                    write_depth_exr(&layout.depth_image(split, pose.id), &aux.depth)?;
                    write_camera_normal_exr(&layout.normal_image(split, pose.id), &aux.normal, &pose.rotation())?;
                    write_albedo_png(&layout.albedo_image(split, pose.id), &aux.albedo)?;
                }
                None => log::debug!("RenderOrchestrator: backend has no auxiliary passes"),
            }
        }
        Ok(())
    }
}

/// Camera manifests left by an earlier run. A missing or unreadable manifest in
/// either split means the cameras are sampled again.
fn saved_cameras(store: &MetadataStore) -> Option<SceneCameras> {
    let load = |split: Split| match store.read_cameras(split) {
        Ok(cameras) => cameras,
        Err(e) => {
            log::warn!(
                "RenderOrchestrator: ignoring saved {} cameras ({e}), generating new ones",
                split.dir_name()
            );
            None
        }
    };
    let train = load(Split::Train);
    let test = load(Split::Test);
    Some(SceneCameras { train: train?, test: test? })
}

fn advance(state: &mut VariantState, next: VariantState, variant: &str) {
    debug_assert!(state.can_advance_to(next), "{state:?} -> {next:?}");
    log::debug!("RenderOrchestrator: {variant} {state:?} -> {next:?}");
    *state = next;
}
