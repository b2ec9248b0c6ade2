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

use approx::assert_relative_eq;
use image::{Rgb, RgbImage};
use relit_core::math::{LinearRgba, Vec3};
use relit_core::{
    look_at, CameraPose, ComposedScene, Emitter, ImportedAsset, LightSpec, MeshNode, PointEmitter, RenderSession,
    RenderSettings,
};
use relit_infra::PreviewRenderer;

const SIZE: u32 = 8;
const CENTER: usize = (SIZE as usize / 2) * SIZE as usize + SIZE as usize / 2;

fn facing_quad(texture: Option<std::path::PathBuf>) -> ComposedScene {
    let positions = vec![
        Vec3::new(-1.0, 0.0, -1.0),
        Vec3::new(1.0, 0.0, -1.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(-1.0, 0.0, 1.0),
    ];
    let mut asset = ImportedAsset::new("quad", vec![MeshNode::new("quad", positions, vec![0, 1, 2, 0, 2, 3])]);
    asset.texture = texture;
    ComposedScene {
        assets: vec![asset],
        ..ComposedScene::default()
    }
}

fn session(scene: &ComposedScene) -> (PreviewRenderer, relit_core::CameraHandle) {
    let mut renderer = PreviewRenderer::default();
    renderer
        .configure(&RenderSettings {
            width: SIZE,
            height: SIZE,
            ..RenderSettings::default()
        })
        .unwrap();
    renderer.load_scene(scene).unwrap();
    let pose = CameraPose {
        id: 0,
        c2w: look_at(Vec3::new(0.0, -4.0, 0.0), Vec3::ZERO, Vec3::Z).unwrap(),
        fov_deg: 40.0,
    };
    let camera = renderer.create_camera(&pose).unwrap();
    (renderer, camera)
}

fn light() -> PointEmitter {
    PointEmitter {
        position: Vec3::new(0.0, -4.0, 0.0),
        power: 800.0,
        color: LinearRgba::WHITE,
    }
}

#[test]
fn multi_light_variants_accumulate() {
    let (mut renderer, camera) = session(&facing_quad(None));
    let spec = LightSpec::PointMulti(vec![light(), light()]);

    renderer.clear_lights().unwrap();
    renderer.add_light(&Emitter::Point(&light())).unwrap();
    let single = renderer.render(camera).unwrap().pixels[CENTER];

    renderer.clear_lights().unwrap();
    for emitter in spec.emitters() {
        renderer.add_light(&emitter).unwrap();
    }
    assert_eq!(renderer.lights().len(), 2);
    let double = renderer.render(camera).unwrap().pixels[CENTER];
    assert_relative_eq!(double.r, 2.0 * single.r, epsilon = 1e-5);
}

#[test]
fn asset_texture_tints_the_surface() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("green.png");
    RgbImage::from_pixel(2, 2, Rgb([0, 255, 0])).save(&path).unwrap();

    let (mut renderer, camera) = session(&facing_quad(Some(path)));
    let aux = renderer.render_aux_passes(camera).unwrap().unwrap();
    assert_eq!(aux.albedo.pixels[CENTER], LinearRgba::rgb(0.0, 1.0, 0.0));

    renderer.add_light(&Emitter::Point(&light())).unwrap();
    let beauty = renderer.render(camera).unwrap().pixels[CENTER];
    assert_eq!(beauty.r, 0.0);
    assert!(beauty.g > 0.0);
}

#[test]
fn reloading_a_scene_drops_cameras_and_lights() {
    let scene = facing_quad(None);
    let (mut renderer, camera) = session(&scene);
    renderer.add_light(&Emitter::Point(&light())).unwrap();
    renderer.load_scene(&scene).unwrap();
    assert!(renderer.lights().is_empty());
    assert_eq!(renderer.live_cameras(), 0);
    assert!(renderer.render(camera).is_err());
}
