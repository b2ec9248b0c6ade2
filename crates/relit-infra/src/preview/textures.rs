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

//! Mean colors of textures and environment maps.

use image::ImageError;
use relit_core::math::LinearRgba;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Decodes each image once and keeps only its mean linear color.
///
/// The preview backend has no UV mapping, so a texture tints its surface
/// uniformly and an environment map lights the scene uniformly.
#[derive(Debug, Default)]
pub struct TextureCache {
    means: HashMap<PathBuf, LinearRgba>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mean color of the image at `path`. Unreadable images fall back to white.
    pub fn mean_color(&mut self, path: &Path) -> LinearRgba {
        if let Some(color) = self.means.get(path) {
            return *color;
        }
        let color = match decode_mean(path) {
            Ok(color) => color,
            Err(e) => {
                log::warn!("PreviewRenderer: cannot read '{}' ({e}), using white", path.display());
                LinearRgba::WHITE
            }
        };
        self.means.insert(path.to_path_buf(), color);
        color
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

/// HDR formats store linear values; everything else is sRGB encoded.
fn is_linear(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("exr") || e.eq_ignore_ascii_case("hdr"))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn decode_mean(path: &Path) -> Result<LinearRgba, ImageError> {
    let image = image::open(path)?.to_rgb32f();
    let linear = is_linear(path);
    let count = (image.width() as f64 * image.height() as f64).max(1.0);
    let mut sum = [0.0f64; 3];
    for pixel in image.pixels() {
        for (acc, value) in sum.iter_mut().zip(pixel.0) {
            let value = if linear { value } else { srgb_to_linear(value) };
            *acc += value as f64;
        }
    }
    Ok(LinearRgba::rgb(
        (sum[0] / count) as f32,
        (sum[1] / count) as f32,
        (sum[2] / count) as f32,
    ))
}
