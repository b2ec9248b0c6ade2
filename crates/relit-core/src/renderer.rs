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

//! The render backend contract.
//!
//! The orchestrator never touches renderer globals: every call goes through an
//! explicit [`RenderSession`], so tests can drive a recording session and
//! several sessions can coexist.

use crate::camera::CameraPose;
use crate::error::RenderError;
use crate::light::Emitter;
use crate::math::{LinearRgba, Vec3};
use crate::scene::ComposedScene;

/// Output channel layout of beauty renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    Rgb,
    #[default]
    Rgba,
}

/// Session-wide output settings, applied once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Background pixels get alpha 0 instead of the environment color.
    pub film_transparent: bool,
    pub color_mode: ColorMode,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            film_transparent: true,
            color_mode: ColorMode::Rgba,
        }
    }
}

/// Opaque handle to a camera living inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraHandle(pub u64);

/// A row-major image of `T` pixels, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<T> {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<T>,
}

impl<T: Clone> Frame<T> {
    /// A frame filled with `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width as usize * height as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize)
    }
}

/// Straight-alpha linear color output of a beauty render.
pub type ColorFrame = Frame<LinearRgba>;

/// Auxiliary geometric passes of one view, independent of lighting.
#[derive(Debug, Clone, PartialEq)]
pub struct AuxPasses {
    /// Camera distance along the view axis; `f32::INFINITY` for background.
    pub depth: Frame<f32>,
    /// World-space unit normals; zero for background.
    pub normal: Frame<Vec3>,
    pub albedo: Frame<LinearRgba>,
}

/// A render backend holding one scene, one light set and transient cameras.
pub trait RenderSession {
    /// A short name for logs.
    fn backend_name(&self) -> &'static str;

    /// Applies resolution, transparency and color mode.
    fn configure(&mut self, settings: &RenderSettings) -> Result<(), RenderError>;

    /// Replaces the loaded scene. Also clears lights and cameras.
    fn load_scene(&mut self, scene: &ComposedScene) -> Result<(), RenderError>;

    fn create_camera(&mut self, pose: &CameraPose) -> Result<CameraHandle, RenderError>;

    fn destroy_camera(&mut self, camera: CameraHandle) -> Result<(), RenderError>;

    /// Removes every light, including the environment.
    fn clear_lights(&mut self) -> Result<(), RenderError>;

    /// Adds one emitter to the active light set.
    fn add_light(&mut self, emitter: &Emitter<'_>) -> Result<(), RenderError>;

    fn render(&mut self, camera: CameraHandle) -> Result<ColorFrame, RenderError>;

    /// Depth, normal and albedo for a view. Backends without these passes return `None`.
    fn render_aux_passes(&mut self, camera: CameraHandle) -> Result<Option<AuxPasses>, RenderError> {
        let _ = camera;
        Ok(None)
    }
}
