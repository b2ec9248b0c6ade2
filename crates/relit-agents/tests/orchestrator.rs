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

mod common;

use common::{Call, RecordingSession};
use relit_agents::{CameraRig, OrchestratorConfig, RenderOrchestrator, SceneError, VariantState};
use relit_core::sampling::{SeedPlan, UpAxis};
use relit_core::{ComposedScene, RenderSettings, Split};
use relit_io::{count_images, SceneLayout};
use relit_lanes::{LightingConfig, VariantCounts};
use std::path::Path;

const TRAIN_VIEWS: usize = 5;
const TEST_VIEWS: usize = 3;

fn lighting(counts: VariantCounts) -> LightingConfig {
    LightingConfig {
        counts,
        ..LightingConfig::default()
    }
}

fn env_and_white_point() -> VariantCounts {
    VariantCounts {
        white_env: 1,
        white_pl: 1,
        rgb_pl: 0,
        multi_pl: 0,
        env_colored: 0,
        area: 0,
    }
}

fn orchestrator(
    session: RecordingSession,
    root: &Path,
    counts: VariantCounts,
    config: OrchestratorConfig,
) -> RenderOrchestrator<RecordingSession> {
    let settings = RenderSettings {
        width: 4,
        height: 4,
        ..RenderSettings::default()
    };
    RenderOrchestrator::new(
        session,
        &settings,
        root,
        lighting(counts),
        CameraRig::dense_scene(TRAIN_VIEWS, TEST_VIEWS, UpAxis::Z),
        SeedPlan::new(Some(42)),
        config,
    )
    .unwrap()
}

fn render(session: RecordingSession, root: &Path) -> (Result<relit_agents::SceneReport, SceneError>, RecordingSession) {
    let mut orch = orchestrator(session, root, env_and_white_point(), OrchestratorConfig::default());
    let result = orch.render_scene("chair", 0, &ComposedScene::default());
    (result, orch.into_session())
}

#[test]
fn renders_expected_files_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (report, session) = render(RecordingSession::new(), dir.path());
    let report = report.unwrap();
    let layout = SceneLayout::for_scene(dir.path(), "chair");

    for variant in ["white_env_0", "white_pl_0"] {
        for view in 0..TRAIN_VIEWS {
            assert!(layout.beauty_image(Split::Train, variant, view).is_file());
        }
        assert_eq!(count_images(&layout.variant_dir(Split::Train, variant)), TRAIN_VIEWS);
        assert_eq!(count_images(&layout.variant_dir(Split::Test, variant)), TEST_VIEWS);
    }
    let cameras: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(layout.cameras_manifest(Split::Train)).unwrap()).unwrap();
    assert_eq!(cameras.as_array().unwrap().len(), TRAIN_VIEWS);
    assert!(layout.done_marker().is_file());
    assert!(layout.normalize_record().is_file());
    assert!(layout.light_record(relit_core::LightCategory::WhitePoint, "white_pl_0").is_file());
    assert!(layout.light_record(relit_core::LightCategory::WhiteEnv, "white_env_0").is_file());

    assert!(report.intrinsics_captured);
    assert_eq!(report.rendered_views, 2 * (TRAIN_VIEWS + TEST_VIEWS));
    assert_eq!(report.count(VariantState::Complete), 2);

    // Intrinsics only during the first variant, for both splits.
    assert_eq!(session.count(|c| matches!(c, Call::Aux(_))), TRAIN_VIEWS + TEST_VIEWS);
    for view in 0..TRAIN_VIEWS {
        assert!(layout.depth_image(Split::Train, view).is_file());
        assert!(layout.normal_image(Split::Train, view).is_file());
        assert!(layout.albedo_image(Split::Train, view).is_file());
    }
    assert!(layout.depth_image(Split::Test, TEST_VIEWS - 1).is_file());
}

#[test]
fn every_camera_is_destroyed_after_its_render() {
    let dir = tempfile::tempdir().unwrap();
    let (report, session) = render(RecordingSession::new(), dir.path());
    report.unwrap();
    let renders = session.count(|c| matches!(c, Call::Render(_)));
    assert_eq!(renders, 2 * (TRAIN_VIEWS + TEST_VIEWS));
    assert_eq!(session.count(|c| matches!(c, Call::CreateCamera(_))), renders);
    assert_eq!(session.count(|c| matches!(c, Call::DestroyCamera(_))), renders);
    assert_eq!(session.live_cameras(), 0);

    // Each render sits between its own create and destroy.
    for window in session.calls.windows(2) {
        if let [Call::CreateCamera(_), next] = window {
            assert!(matches!(next, Call::Render(_)));
        }
    }
}

#[test]
fn failure_aborts_scene_and_next_run_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let layout = SceneLayout::for_scene(dir.path(), "chair");

    // white_env_0 renders all 8 views, white_pl_0 fails on its 5th train view.
    let failing_render = TRAIN_VIEWS + TEST_VIEWS + 4;
    let (result, session) = render(RecordingSession::failing_at(failing_render), dir.path());
    match result {
        Err(SceneError::Render { variant, split, view, .. }) => {
            assert_eq!(variant, "white_pl_0");
            assert_eq!(split, Split::Train);
            assert_eq!(view, 4);
        }
        other => panic!("expected a render failure, got {other:?}"),
    }
    assert_eq!(session.live_cameras(), 0);
    assert!(!layout.done_marker().is_file());
    assert_eq!(count_images(&layout.variant_dir(Split::Train, "white_pl_0")), 4);

    let (report, session) = render(RecordingSession::new(), dir.path());
    let report = report.unwrap();
    assert!(report.reused_cameras);
    assert_eq!(report.variants[0].state, VariantState::Skipped);
    assert_eq!(report.variants[1].state, VariantState::Complete);
    assert!(!report.intrinsics_captured);
    assert_eq!(session.count(|c| matches!(c, Call::Aux(_))), 0);
    assert_eq!(session.count(|c| matches!(c, Call::Render(_))), TRAIN_VIEWS + TEST_VIEWS);
    assert!(layout.done_marker().is_file());

    let (report, session) = render(RecordingSession::new(), dir.path());
    assert!(report.unwrap().already_done);
    assert_eq!(session.calls, vec![Call::Configure]);
}

#[test]
fn fully_rendered_scene_without_marker_skips_everything() {
    let dir = tempfile::tempdir().unwrap();
    let layout = SceneLayout::for_scene(dir.path(), "chair");
    render(RecordingSession::new(), dir.path()).0.unwrap();
    std::fs::remove_file(layout.done_marker()).unwrap();

    let (report, session) = render(RecordingSession::new(), dir.path());
    let report = report.unwrap();
    assert_eq!(report.count(VariantState::Skipped), 2);
    assert_eq!(report.rendered_views, 0);
    assert!(!report.intrinsics_captured);
    assert_eq!(session.count(|c| matches!(c, Call::Render(_) | Call::Aux(_))), 0);
    assert!(layout.done_marker().is_file());
}

#[test]
fn completion_threshold_override() {
    let dir = tempfile::tempdir().unwrap();
    let layout = SceneLayout::for_scene(dir.path(), "chair");
    for split in Split::ALL {
        let variant_dir = layout.variant_dir(split, "white_env_0");
        std::fs::create_dir_all(&variant_dir).unwrap();
        std::fs::write(variant_dir.join("gt_0.png"), b"").unwrap();
    }
    let config = OrchestratorConfig {
        completion_threshold: Some(1),
        ..OrchestratorConfig::default()
    };
    let mut orch = orchestrator(RecordingSession::new(), dir.path(), env_and_white_point(), config);
    let report = orch.render_scene("chair", 0, &ComposedScene::default()).unwrap();
    assert_eq!(report.variants[0].state, VariantState::Skipped);
    assert_eq!(report.variants[1].state, VariantState::Complete);
    // The first rendered variant is white_pl_0, so it captures the passes.
    assert!(report.intrinsics_captured);
}

#[test]
fn multi_light_variant_clears_once_then_accumulates() {
    let dir = tempfile::tempdir().unwrap();
    let counts = VariantCounts {
        white_env: 0,
        white_pl: 0,
        rgb_pl: 0,
        multi_pl: 1,
        env_colored: 0,
        area: 0,
    };
    let mut orch = orchestrator(RecordingSession::new(), dir.path(), counts, OrchestratorConfig::default());
    orch.render_scene("chair", 0, &ComposedScene::default()).unwrap();
    let calls = &orch.session().calls;
    let clear = calls.iter().position(|c| *c == Call::ClearLights).unwrap();
    assert_eq!(calls[clear + 1..clear + 4], [Call::AddLight, Call::AddLight, Call::AddLight]);
    assert!(matches!(calls[clear + 4], Call::CreateCamera(0)));
    assert_eq!(orch.session().count(|c| *c == Call::ClearLights), 1);
}

#[test]
fn intrinsics_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let config = OrchestratorConfig {
        save_intrinsics: false,
        ..OrchestratorConfig::default()
    };
    let mut orch = orchestrator(RecordingSession::new(), dir.path(), env_and_white_point(), config);
    let report = orch.render_scene("chair", 0, &ComposedScene::default()).unwrap();
    assert!(!report.intrinsics_captured);
    assert_eq!(orch.session().count(|c| matches!(c, Call::Aux(_))), 0);
}

#[test]
fn truncated_camera_manifest_is_resampled() {
    let dir = tempfile::tempdir().unwrap();
    let layout = SceneLayout::for_scene(dir.path(), "chair");
    for split in Split::ALL {
        let manifest = layout.cameras_manifest(split);
        std::fs::create_dir_all(manifest.parent().unwrap()).unwrap();
        std::fs::write(&manifest, r#"[{"eye_idx": 0, "c2w": [[1"#).unwrap();
    }

    let (report, session) = render(RecordingSession::new(), dir.path());
    let report = report.unwrap();
    assert!(!report.reused_cameras);
    assert!(report.intrinsics_captured);
    assert_eq!(session.count(|c| matches!(c, Call::Render(_))), 2 * (TRAIN_VIEWS + TEST_VIEWS));
    assert!(layout.done_marker().is_file());

    for (split, views) in [(Split::Train, TRAIN_VIEWS), (Split::Test, TEST_VIEWS)] {
        let manifest = layout.cameras_manifest(split);
        let cameras: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&manifest).unwrap()).unwrap();
        assert_eq!(cameras.as_array().unwrap().len(), views);
        assert!(!manifest.with_extension("json.partial").exists());
    }
}

#[test]
fn one_corrupt_split_manifest_resamples_both() {
    let dir = tempfile::tempdir().unwrap();
    let layout = SceneLayout::for_scene(dir.path(), "chair");
    let (result, _) = render(RecordingSession::failing_at(TRAIN_VIEWS + TEST_VIEWS + 1), dir.path());
    assert!(result.is_err());
    std::fs::write(layout.cameras_manifest(Split::Test), "not json").unwrap();

    let (report, _) = render(RecordingSession::new(), dir.path());
    let report = report.unwrap();
    assert!(!report.reused_cameras);
    assert!(layout.done_marker().is_file());
}
