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

//! Structured records written next to the rendered images.
//!
//! Every write is a fresh overwrite of its target file. Field names are part
//! of the dataset format and must not change.

use crate::error::{ensure_parent, IoError, IoResult};
use crate::layout::SceneLayout;
use relit_core::math::{Mat4, Vec3};
use relit_core::{CameraPose, LightCategory, LightSpec, Normalization, Primitive, SceneRecord, Split};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One entry of a split's `cameras.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    pub eye_idx: usize,
    /// Camera-to-world, row-major.
    pub c2w: [[f32; 4]; 4],
    /// Degrees.
    pub fov: f32,
}

impl From<&CameraPose> for CameraRecord {
    fn from(pose: &CameraPose) -> Self {
        Self {
            eye_idx: pose.id,
            c2w: pose.c2w.to_rows_array(),
            fov: pose.fov_deg,
        }
    }
}

impl From<&CameraRecord> for CameraPose {
    fn from(record: &CameraRecord) -> Self {
        CameraPose {
            id: record.eye_idx,
            c2w: Mat4::from_rows_array(&record.c2w),
            fov_deg: record.fov,
        }
    }
}

/// Parameters of one lighting variant, as stored in `<variant>/<record>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LightRecord {
    Multi {
        pos: Vec<[f32; 3]>,
        power: Vec<f32>,
        color: Vec<[f32; 3]>,
    },
    Area {
        pos: [f32; 3],
        power: f32,
        size: f32,
        color: [f32; 3],
    },
    Point {
        pos: [f32; 3],
        power: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<[f32; 3]>,
    },
    Environment {
        env_map: String,
        rotation_euler: [f32; 3],
        strength: f32,
    },
}

impl From<&LightSpec> for LightRecord {
    fn from(light: &LightSpec) -> Self {
        match light {
            LightSpec::WhiteEnv(env) | LightSpec::EnvColored(env) => LightRecord::Environment {
                env_map: env.path.to_string_lossy().into_owned(),
                rotation_euler: env.rotation_euler.to_array(),
                strength: env.strength,
            },
            LightSpec::PointWhite(p) => LightRecord::Point {
                pos: p.position.to_array(),
                power: p.power,
                color: None,
            },
            LightSpec::PointRgb(p) => LightRecord::Point {
                pos: p.position.to_array(),
                power: p.power,
                color: Some(p.color.to_rgb_array()),
            },
            LightSpec::PointMulti(points) => LightRecord::Multi {
                pos: points.iter().map(|p| p.position.to_array()).collect(),
                power: points.iter().map(|p| p.power).collect(),
                color: points.iter().map(|p| p.color.to_rgb_array()).collect(),
            },
            LightSpec::Area(a) => LightRecord::Area {
                pos: a.position.to_array(),
                power: a.power,
                size: a.size,
                color: a.color.to_rgb_array(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct NormalizeRecord {
    scale: f32,
    offset: [f32; 3],
}

/// One placed object of a multi-object scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub uid: String,
    pub scale: f32,
    pub location: [f32; 3],
    /// XYZ euler, radians.
    pub rotation: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primitive: Option<PrimitiveRecord>,
}

/// Dimensions of a generated object, tagged by `shape`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PrimitiveRecord {
    Cylinder { radius: f32, depth: f32 },
}

impl From<Primitive> for PrimitiveRecord {
    fn from(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Cylinder { radius, depth } => PrimitiveRecord::Cylinder { radius, depth },
        }
    }
}

/// Contents of `scene_info.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneInfo {
    pub objects: Vec<SceneObject>,
    pub ground_texture: Option<String>,
}

impl From<&SceneRecord> for SceneInfo {
    fn from(record: &SceneRecord) -> Self {
        Self {
            objects: record
                .placements
                .iter()
                .map(|p| SceneObject {
                    uid: p.asset_id.clone(),
                    scale: p.scale,
                    location: p.translation.to_array(),
                    rotation: p.rotation.to_array(),
                    primitive: p.primitive.map(PrimitiveRecord::from),
                })
                .collect(),
            ground_texture: record
                .ground
                .as_ref()
                .and_then(|g| g.texture.as_ref())
                .map(|t| t.to_string_lossy().into_owned()),
        }
    }
}

/// Writes and reads the metadata records of one scene.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    layout: SceneLayout,
}

impl MetadataStore {
    pub fn new(layout: SceneLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// Writes the whole camera list of `split` as one manifest.
    pub fn write_cameras(&self, split: Split, cameras: &[CameraPose]) -> IoResult<PathBuf> {
        let records: Vec<CameraRecord> = cameras.iter().map(CameraRecord::from).collect();
        let path = self.layout.cameras_manifest(split);
        write_json(&path, &records)?;
        Ok(path)
    }

    /// Loads a previously written camera manifest. `Ok(None)` when it does not exist.
    pub fn read_cameras(&self, split: Split) -> IoResult<Option<Vec<CameraPose>>> {
        let path = self.layout.cameras_manifest(split);
        if !path.is_file() {
            return Ok(None);
        }
        let records: Vec<CameraRecord> = read_json(&path)?;
        for (expected, record) in records.iter().enumerate() {
            if record.eye_idx != expected {
                return Err(IoError::CameraManifest {
                    path,
                    reason: format!("entry {expected} has eye_idx {}", record.eye_idx),
                });
            }
        }
        Ok(Some(records.iter().map(CameraPose::from).collect()))
    }

    pub fn write_light(&self, variant: &str, light: &LightSpec) -> IoResult<PathBuf> {
        let path = self.layout.light_record(light.category(), variant);
        write_json(&path, &LightRecord::from(light))?;
        Ok(path)
    }

    pub fn read_light(&self, category: LightCategory, variant: &str) -> IoResult<LightRecord> {
        read_json(&self.layout.light_record(category, variant))
    }

    pub fn write_normalization(&self, normalization: &Normalization) -> IoResult<PathBuf> {
        let path = self.layout.normalize_record();
        let record = NormalizeRecord {
            scale: normalization.scale,
            offset: normalization.offset.to_array(),
        };
        write_json(&path, &record)?;
        Ok(path)
    }

    pub fn read_normalization(&self) -> IoResult<Normalization> {
        let record: NormalizeRecord = read_json(&self.layout.normalize_record())?;
        Ok(Normalization {
            scale: record.scale,
            offset: Vec3::from_array(record.offset),
        })
    }

    /// `normalize.json` for every scene, plus `scene_info.json` for multi-object scenes.
    pub fn write_scene_record(&self, record: &SceneRecord) -> IoResult<()> {
        self.write_normalization(&record.normalization)?;
        if record.is_multi_object() {
            write_json(&self.layout.scene_info(), &SceneInfo::from(record))?;
        }
        Ok(())
    }

    pub fn read_scene_info(&self) -> IoResult<SceneInfo> {
        read_json(&self.layout.scene_info())
    }

    /// Writes the terminal `done.txt` marker.
    pub fn mark_done(&self) -> IoResult<()> {
        let path = self.layout.done_marker();
        ensure_parent(&path)?;
        std::fs::write(&path, "done\n").map_err(IoError::io(&path))
    }

    pub fn is_done(&self) -> bool {
        self.layout.done_marker().is_file()
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> IoResult<()> {
    ensure_parent(path)?;
    let text = serde_json::to_string_pretty(value).map_err(IoError::json(path))?;
    // Written beside the target then renamed, so a killed run never leaves half a record.
    let staging = path.with_extension("json.partial");
    std::fs::write(&staging, text).map_err(IoError::io(&staging))?;
    std::fs::rename(&staging, path).map_err(IoError::io(path))
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> IoResult<T> {
    let text = std::fs::read_to_string(path).map_err(IoError::io(path))?;
    serde_json::from_str(&text).map_err(IoError::json(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relit_core::math::LinearRgba;
    use relit_core::PointEmitter;

    #[test]
    fn test_light_record_field_names() {
        let light = LightSpec::PointRgb(PointEmitter {
            position: Vec3::new(1.0, 2.0, 3.0),
            power: 1000.0,
            color: LinearRgba::rgb(0.5, 0.25, 1.0),
        });
        let value = serde_json::to_value(LightRecord::from(&light)).unwrap();
        assert_eq!(value["pos"], serde_json::json!([1.0, 2.0, 3.0]));
        assert_eq!(value["power"], serde_json::json!(1000.0));
        assert_eq!(value["color"], serde_json::json!([0.5, 0.25, 1.0]));

        let white = LightSpec::PointWhite(PointEmitter {
            position: Vec3::ZERO,
            power: 1.0,
            color: LinearRgba::WHITE,
        });
        let value = serde_json::to_value(LightRecord::from(&white)).unwrap();
        assert!(value.get("color").is_none());
    }

    #[test]
    fn test_multi_record_parses_back_as_multi() {
        let text = r#"{"pos": [[1, 2, 3], [4, 5, 6]], "power": [1, 2], "color": [[1, 1, 1], [0.5, 0.5, 0.5]]}"#;
        let record: LightRecord = serde_json::from_str(text).unwrap();
        assert!(matches!(record, LightRecord::Multi { ref power, .. } if power.len() == 2));
    }
}
