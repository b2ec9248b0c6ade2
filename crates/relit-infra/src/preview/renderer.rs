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

//! The [`RenderSession`] implementation.

use super::raster::{rasterize, GBuffer, SceneTriangle};
use super::shading::{shade, ActiveLight};
use super::textures::TextureCache;
use relit_core::math::{LinearRgba, Mat4, Vec3};
use relit_core::sampling::UpAxis;
use relit_core::{
    AuxPasses, CameraHandle, CameraPose, ColorFrame, ComposedScene, Emitter, Frame, GroundPlane, RenderError,
    RenderSession, RenderSettings,
};
use std::collections::HashMap;

/// Albedo of an untextured ground plane.
const GROUND_ALBEDO: LinearRgba = LinearRgba::rgb(0.8, 0.8, 0.8);

/// A CPU rasterizer with Lambert shading.
///
/// Cameras are cheap map entries; the geometry buffer of the last rendered
/// camera is cached until that camera is destroyed or the scene changes.
#[derive(Debug, Default)]
pub struct PreviewRenderer {
    up_axis: UpAxis,
    settings: Option<RenderSettings>,
    scene_loaded: bool,
    triangles: Vec<SceneTriangle>,
    lights: Vec<ActiveLight>,
    cameras: HashMap<u64, CameraPose>,
    next_camera: u64,
    cached: Option<(CameraHandle, GBuffer)>,
    textures: TextureCache,
}

impl PreviewRenderer {
    /// A renderer whose ground plane lies across `up_axis`.
    pub fn new(up_axis: UpAxis) -> Self {
        Self {
            up_axis,
            ..Self::default()
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn lights(&self) -> &[ActiveLight] {
        &self.lights
    }

    pub fn live_cameras(&self) -> usize {
        self.cameras.len()
    }

    fn ground_triangles(&mut self, ground: &GroundPlane) -> [Option<SceneTriangle>; 2] {
        let albedo = match &ground.texture {
            Some(path) => tint(GROUND_ALBEDO, self.textures.mean_color(path)),
            None => GROUND_ALBEDO,
        };
        let half = 0.5 * ground.size;
        let spin = Mat4::from_rotation_z(ground.rotation_z);
        let [a, b, c, d] = [(-half, -half), (half, -half), (half, half), (-half, half)]
            .map(|(x, y)| self.up_axis.remap(spin.transform_point3(Vec3::new(x, y, 0.0))));
        [
            SceneTriangle::new([a, b, c], albedo),
            SceneTriangle::new([a, c, d], albedo),
        ]
    }

    /// Settings of a session ready to render `camera`, with its geometry buffer cached.
    fn prepare(&mut self, camera: CameraHandle) -> Result<RenderSettings, RenderError> {
        let settings = self.settings.ok_or(RenderError::NotReady("configure"))?;
        if !self.scene_loaded {
            return Err(RenderError::NotReady("load_scene"));
        }
        let pose = self
            .cameras
            .get(&camera.0)
            .ok_or(RenderError::UnknownCamera(camera.0))?;
        let stale = self.cached.as_ref().map_or(true, |(handle, _)| *handle != camera);
        if stale {
            let buffer = rasterize(&self.triangles, pose, settings.width, settings.height)?;
            log::debug!("PreviewRenderer: rasterized camera {}", camera.0);
            self.cached = Some((camera, buffer));
        }
        Ok(settings)
    }

    fn cached_buffer(&self) -> Result<&GBuffer, RenderError> {
        self.cached
            .as_ref()
            .map(|(_, buffer)| buffer)
            .ok_or_else(|| RenderError::Backend("no geometry buffer for this camera".to_string()))
    }
}

fn tint(a: LinearRgba, b: LinearRgba) -> LinearRgba {
    LinearRgba::new(a.r * b.r, a.g * b.g, a.b * b.b, a.a * b.a)
}

impl RenderSession for PreviewRenderer {
    fn backend_name(&self) -> &'static str {
        "preview"
    }

    fn configure(&mut self, settings: &RenderSettings) -> Result<(), RenderError> {
        if settings.width == 0 || settings.height == 0 {
            return Err(RenderError::Backend(format!(
                "resolution {}x{} is empty",
                settings.width, settings.height
            )));
        }
        self.settings = Some(*settings);
        self.cached = None;
        Ok(())
    }

    fn load_scene(&mut self, scene: &ComposedScene) -> Result<(), RenderError> {
        self.triangles.clear();
        self.lights.clear();
        self.cameras.clear();
        self.cached = None;

        for asset in &scene.assets {
            let texture = asset.texture.as_ref().map(|path| self.textures.mean_color(path));
            for node in &asset.nodes {
                let albedo = texture.map_or(node.base_color, |t| tint(node.base_color, t));
                let world = asset.node_world(node);
                self.triangles
                    .extend(node.triangles(world).filter_map(|tri| SceneTriangle::new(tri, albedo)));
            }
        }
        if let Some(ground) = &scene.record.ground {
            let ground = self.ground_triangles(ground);
            self.triangles.extend(ground.into_iter().flatten());
        }
        self.scene_loaded = true;
        log::debug!(
            "PreviewRenderer: loaded {} asset(s), {} triangles",
            scene.assets.len(),
            self.triangles.len()
        );
        Ok(())
    }

    fn create_camera(&mut self, pose: &CameraPose) -> Result<CameraHandle, RenderError> {
        if !(pose.fov_deg > 0.0 && pose.fov_deg < 180.0) {
            return Err(RenderError::Backend(format!(
                "camera {} has field of view {}",
                pose.id, pose.fov_deg
            )));
        }
        self.next_camera += 1;
        self.cameras.insert(self.next_camera, *pose);
        Ok(CameraHandle(self.next_camera))
    }

    fn destroy_camera(&mut self, camera: CameraHandle) -> Result<(), RenderError> {
        self.cameras
            .remove(&camera.0)
            .ok_or(RenderError::UnknownCamera(camera.0))?;
        if self.cached.as_ref().is_some_and(|(handle, _)| *handle == camera) {
            self.cached = None;
        }
        Ok(())
    }

    fn clear_lights(&mut self) -> Result<(), RenderError> {
        self.lights.clear();
        Ok(())
    }

    fn add_light(&mut self, emitter: &Emitter<'_>) -> Result<(), RenderError> {
        let light = match *emitter {
            Emitter::Point(p) => ActiveLight::Point {
                position: p.position,
                power: p.power,
                color: p.color,
            },
            Emitter::Area(a) => ActiveLight::Area {
                position: a.position,
                power: a.power,
                size: a.size,
                color: a.color,
            },
            Emitter::Environment(env) => {
                let mean = self.textures.mean_color(&env.path);
                ActiveLight::Ambient(LinearRgba::rgb(
                    mean.r * env.strength,
                    mean.g * env.strength,
                    mean.b * env.strength,
                ))
            }
        };
        self.lights.push(light);
        Ok(())
    }

    fn render(&mut self, camera: CameraHandle) -> Result<ColorFrame, RenderError> {
        let settings = self.prepare(camera)?;
        let buffer = self.cached_buffer()?;
        Ok(shade(buffer, &self.lights, &settings))
    }

    fn render_aux_passes(&mut self, camera: CameraHandle) -> Result<Option<AuxPasses>, RenderError> {
        self.prepare(camera)?;
        let buffer = self.cached_buffer()?;
        Ok(Some(AuxPasses {
            depth: Frame {
                width: buffer.width,
                height: buffer.height,
                pixels: buffer.depth.clone(),
            },
            normal: Frame {
                width: buffer.width,
                height: buffer.height,
                pixels: buffer.normal.clone(),
            },
            albedo: Frame {
                width: buffer.width,
                height: buffer.height,
                pixels: buffer.albedo.clone(),
            },
        }))
    }
}
