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

//! Lambert shading of a geometry buffer.

use super::raster::GBuffer;
use relit_core::math::{LinearRgba, Vec3, EPSILON};
use relit_core::{ColorFrame, ColorMode, Frame, RenderSettings};
use std::f32::consts::PI;

/// Converts a point light's radiant power in watts to irradiance at unit distance
/// on a diffuse surface, `1 / (4 pi^2)`.
const POWER_TO_IRRADIANCE: f32 = 1.0 / (4.0 * PI * PI);

/// A light as the preview backend evaluates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveLight {
    Point {
        position: Vec3,
        power: f32,
        color: LinearRgba,
    },
    /// Evaluated from its center, with a cosine lobe towards the origin.
    /// The size softens the falloff near the emitter.
    Area {
        position: Vec3,
        power: f32,
        size: f32,
        color: LinearRgba,
    },
    /// Uniform radiance from an environment map's mean color.
    Ambient(LinearRgba),
}

impl ActiveLight {
    /// Radiance reaching a diffuse point at `position` with unit `normal`, per RGB channel.
    fn incident(&self, position: Vec3, normal: Vec3) -> Vec3 {
        match *self {
            ActiveLight::Point {
                position: light,
                power,
                color,
            } => {
                let to_light = light - position;
                let d2 = to_light.length_squared();
                if d2 < EPSILON {
                    return Vec3::ZERO;
                }
                let cos = normal.dot(to_light / d2.sqrt()).max(0.0);
                rgb(color) * (power * POWER_TO_IRRADIANCE * cos / d2)
            }
            ActiveLight::Area {
                position: light,
                power,
                size,
                color,
            } => {
                let to_light = light - position;
                let d2 = to_light.length_squared();
                let Some(dir) = to_light.try_normalize() else {
                    return Vec3::ZERO;
                };
                let facing = (-light)
                    .try_normalize()
                    .map_or(1.0, |emit| emit.dot(-dir).max(0.0));
                let cos = normal.dot(dir).max(0.0);
                rgb(color) * (power * POWER_TO_IRRADIANCE * cos * facing / (d2 + 0.25 * size * size))
            }
            ActiveLight::Ambient(color) => rgb(color),
        }
    }
}

fn rgb(c: LinearRgba) -> Vec3 {
    Vec3::new(c.r, c.g, c.b)
}

/// What the camera sees where no geometry was hit: the environments, or black.
pub fn background(lights: &[ActiveLight]) -> Vec3 {
    lights
        .iter()
        .filter_map(|l| match l {
            ActiveLight::Ambient(c) => Some(rgb(*c)),
            _ => None,
        })
        .fold(Vec3::ZERO, |acc, c| acc + c)
}

/// Lights every hit pixel of `buffer`.
///
/// With a transparent film the background gets alpha 0. `ColorMode::Rgb`
/// forces every pixel opaque.
pub fn shade(buffer: &GBuffer, lights: &[ActiveLight], settings: &RenderSettings) -> ColorFrame {
    let sky = background(lights);
    let opaque = settings.color_mode == ColorMode::Rgb;
    let pixels = (0..buffer.len())
        .map(|i| {
            if !buffer.is_hit(i) {
                return match (settings.film_transparent, opaque) {
                    (false, _) => LinearRgba::rgb(sky.x, sky.y, sky.z),
                    (true, true) => LinearRgba::BLACK,
                    (true, false) => LinearRgba::TRANSPARENT,
                };
            }
            let (p, n) = (buffer.position[i], buffer.normal[i]);
            let irradiance = lights
                .iter()
                .fold(Vec3::ZERO, |acc, light| acc + light.incident(p, n));
            let radiance = irradiance * rgb(buffer.albedo[i]);
            LinearRgba::rgb(radiance.x, radiance.y, radiance.z)
        })
        .collect();
    Frame {
        width: buffer.width,
        height: buffer.height,
        pixels,
    }
}
