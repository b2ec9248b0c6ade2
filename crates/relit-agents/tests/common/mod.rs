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

//! A recording render session for orchestration tests.

#![allow(dead_code)]

use relit_core::math::{LinearRgba, Vec3};
use relit_core::{
    AuxPasses, CameraHandle, CameraPose, ColorFrame, ComposedScene, Emitter, Frame, RenderError, RenderSession,
    RenderSettings,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Configure,
    LoadScene(usize),
    CreateCamera(usize),
    DestroyCamera(u64),
    ClearLights,
    AddLight,
    Render(u64),
    Aux(u64),
}

/// Records every call and renders flat frames. Can be told to fail the n-th render.
#[derive(Debug, Default)]
pub struct RecordingSession {
    pub calls: Vec<Call>,
    pub size: u32,
    pub fail_on_render: Option<usize>,
    pub with_aux: bool,
    renders: usize,
    next_camera: u64,
    live_cameras: Vec<u64>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            size: 4,
            with_aux: true,
            ..Self::default()
        }
    }

    pub fn failing_at(render_index: usize) -> Self {
        Self {
            fail_on_render: Some(render_index),
            ..Self::new()
        }
    }

    pub fn count(&self, wanted: fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| wanted(c)).count()
    }

    pub fn live_cameras(&self) -> usize {
        self.live_cameras.len()
    }
}

impl RenderSession for RecordingSession {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    fn configure(&mut self, settings: &RenderSettings) -> Result<(), RenderError> {
        self.calls.push(Call::Configure);
        self.size = settings.width.min(settings.height).max(1);
        Ok(())
    }

    fn load_scene(&mut self, scene: &ComposedScene) -> Result<(), RenderError> {
        self.calls.push(Call::LoadScene(scene.assets.len()));
        Ok(())
    }

    fn create_camera(&mut self, pose: &CameraPose) -> Result<CameraHandle, RenderError> {
        self.calls.push(Call::CreateCamera(pose.id));
        self.next_camera += 1;
        self.live_cameras.push(self.next_camera);
        Ok(CameraHandle(self.next_camera))
    }

    fn destroy_camera(&mut self, camera: CameraHandle) -> Result<(), RenderError> {
        self.calls.push(Call::DestroyCamera(camera.0));
        let before = self.live_cameras.len();
        self.live_cameras.retain(|c| *c != camera.0);
        if self.live_cameras.len() == before {
            return Err(RenderError::UnknownCamera(camera.0));
        }
        Ok(())
    }

    fn clear_lights(&mut self) -> Result<(), RenderError> {
        self.calls.push(Call::ClearLights);
        Ok(())
    }

    fn add_light(&mut self, _emitter: &Emitter<'_>) -> Result<(), RenderError> {
        self.calls.push(Call::AddLight);
        Ok(())
    }

    fn render(&mut self, camera: CameraHandle) -> Result<ColorFrame, RenderError> {
        self.calls.push(Call::Render(camera.0));
        let index = self.renders;
        self.renders += 1;
        if self.fail_on_render == Some(index) {
            return Err(RenderError::Backend(format!("injected failure at render {index}")));
        }
        Ok(Frame::filled(self.size, self.size, LinearRgba::new(0.5, 0.5, 0.5, 1.0)))
    }

    fn render_aux_passes(&mut self, camera: CameraHandle) -> Result<Option<AuxPasses>, RenderError> {
        self.calls.push(Call::Aux(camera.0));
        if !self.with_aux {
            return Ok(None);
        }
        Ok(Some(AuxPasses {
            depth: Frame::filled(self.size, self.size, 2.0),
            normal: Frame::filled(self.size, self.size, Vec3::Z),
            albedo: Frame::filled(self.size, self.size, LinearRgba::WHITE),
        }))
    }
}
