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

//! Light categories and the concrete light parameters of one variant.

use crate::math::{LinearRgba, Vec3};
use crate::sampling::SeedStream;
use std::path::PathBuf;

/// The lighting categories, each rendered as a numbered series of variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LightCategory {
    /// A uniform white environment map.
    WhiteEnv,
    /// One white point light.
    WhitePoint,
    /// One colored point light.
    RgbPoint,
    /// A cluster of point lights active together.
    MultiPoint,
    /// A colored HDR environment map.
    EnvColored,
    /// One rectangular area light.
    Area,
}

impl LightCategory {
    /// Iteration order of a scene's variants.
    ///
    /// The first non-skipped category captures the intrinsic passes, so this
    /// order is part of the on-disk contract.
    pub const ORDERED: [LightCategory; 6] = [
        LightCategory::WhiteEnv,
        LightCategory::WhitePoint,
        LightCategory::RgbPoint,
        LightCategory::MultiPoint,
        LightCategory::EnvColored,
        LightCategory::Area,
    ];

    /// Directory prefix and metadata record name (`white_pl` for `white_pl_3/white_pl.json`).
    pub const fn dir_prefix(self) -> &'static str {
        match self {
            LightCategory::WhiteEnv => "white_env",
            LightCategory::WhitePoint => "white_pl",
            LightCategory::RgbPoint => "rgb_pl",
            LightCategory::MultiPoint => "multi_pl",
            LightCategory::EnvColored => "env",
            LightCategory::Area => "area",
        }
    }

    /// Name used in configuration files.
    pub const fn key(self) -> &'static str {
        match self {
            LightCategory::EnvColored => "env_colored",
            other => other.dir_prefix(),
        }
    }

    /// Parses a configuration key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ORDERED.into_iter().find(|c| c.key() == key)
    }

    pub const fn seed_stream(self) -> SeedStream {
        match self {
            LightCategory::WhiteEnv => SeedStream::WhiteEnv,
            LightCategory::WhitePoint => SeedStream::WhitePointLight,
            LightCategory::RgbPoint => SeedStream::RgbPointLight,
            LightCategory::MultiPoint => SeedStream::MultiPointLight,
            LightCategory::EnvColored => SeedStream::EnvColored,
            LightCategory::Area => SeedStream::AreaLight,
        }
    }

    /// Directory name of the `index`-th variant, e.g. `rgb_pl_2`.
    pub fn variant_name(self, index: usize) -> String {
        format!("{}_{}", self.dir_prefix(), index)
    }
}

/// An omnidirectional point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointEmitter {
    pub position: Vec3,
    /// Radiant power in watts.
    pub power: f32,
    pub color: LinearRgba,
}

/// A square area light facing the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaEmitter {
    pub position: Vec3,
    pub power: f32,
    /// Edge length of the emitting square.
    pub size: f32,
    pub color: LinearRgba,
}

/// An equirectangular environment map.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    /// Identifier of the map, e.g. `white_env` or an HDRI name.
    pub map_id: String,
    pub path: PathBuf,
    /// XYZ euler rotation in radians.
    pub rotation_euler: Vec3,
    pub strength: f32,
}

/// The lights of one variant. Exactly one `LightSpec` is active at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum LightSpec {
    WhiteEnv(EnvironmentMap),
    PointWhite(PointEmitter),
    PointRgb(PointEmitter),
    /// The first light replaces the active set; the rest accumulate.
    PointMulti(Vec<PointEmitter>),
    EnvColored(EnvironmentMap),
    Area(AreaEmitter),
}

/// A single light source handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emitter<'a> {
    Point(&'a PointEmitter),
    Area(&'a AreaEmitter),
    Environment(&'a EnvironmentMap),
}

impl LightSpec {
    pub fn category(&self) -> LightCategory {
        match self {
            LightSpec::WhiteEnv(_) => LightCategory::WhiteEnv,
            LightSpec::PointWhite(_) => LightCategory::WhitePoint,
            LightSpec::PointRgb(_) => LightCategory::RgbPoint,
            LightSpec::PointMulti(_) => LightCategory::MultiPoint,
            LightSpec::EnvColored(_) => LightCategory::EnvColored,
            LightSpec::Area(_) => LightCategory::Area,
        }
    }

    /// The emitters to activate, in order.
    pub fn emitters(&self) -> Vec<Emitter<'_>> {
        match self {
            LightSpec::WhiteEnv(env) | LightSpec::EnvColored(env) => vec![Emitter::Environment(env)],
            LightSpec::PointWhite(p) | LightSpec::PointRgb(p) => vec![Emitter::Point(p)],
            LightSpec::PointMulti(points) => points.iter().map(Emitter::Point).collect(),
            LightSpec::Area(a) => vec![Emitter::Area(a)],
        }
    }
}
