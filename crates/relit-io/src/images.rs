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

//! Image writers for beauty renders, auxiliary passes and environment maps.
//!
//! PNG output is 8-bit sRGB. EXR output is 32-bit float RGB; single-value
//! passes repeat the value in every channel.

use crate::error::{ensure_parent, IoError, IoResult};
use image::{Rgb, Rgb32FImage, RgbImage, Rgba, RgbaImage};
use relit_core::math::{saturate, LinearRgba, Mat3, Vec3};
use relit_core::Frame;
use std::path::Path;

/// Depth written for background pixels.
pub const BACKGROUND_DEPTH: f32 = 1.0e10;

fn check_size<T>(frame: &Frame<T>) -> IoResult<()> {
    let expected = frame.width as usize * frame.height as usize;
    if frame.pixels.len() == expected && expected > 0 {
        Ok(())
    } else {
        Err(IoError::FrameSize {
            width: frame.width,
            height: frame.height,
            actual: frame.pixels.len(),
        })
    }
}

fn to_u8(c: f32) -> u8 {
    (saturate(c) * 255.0 + 0.5) as u8
}

fn srgb8(c: f32) -> u8 {
    to_u8(LinearRgba::linear_to_srgb(saturate(c)))
}

fn save_exr(path: &Path, image: Rgb32FImage) -> IoResult<()> {
    ensure_parent(path)?;
    image
        .save_with_format(path, image::ImageFormat::OpenExr)
        .map_err(IoError::image(path))
}

/// Beauty render as RGB PNG with the color premultiplied by alpha.
pub fn write_beauty_png(path: &Path, frame: &Frame<LinearRgba>) -> IoResult<()> {
    check_size(frame)?;
    let image = RgbImage::from_fn(frame.width, frame.height, |x, y| {
        let p = &frame.pixels[(y * frame.width + x) as usize];
        let a = saturate(p.a);
        // Encode first, then premultiply the 8-bit values.
        Rgb([
            to_u8(LinearRgba::linear_to_srgb(saturate(p.r)) * a),
            to_u8(LinearRgba::linear_to_srgb(saturate(p.g)) * a),
            to_u8(LinearRgba::linear_to_srgb(saturate(p.b)) * a),
        ])
    });
    ensure_parent(path)?;
    image.save(path).map_err(IoError::image(path))
}

pub fn write_albedo_png(path: &Path, frame: &Frame<LinearRgba>) -> IoResult<()> {
    check_size(frame)?;
    let image = RgbaImage::from_fn(frame.width, frame.height, |x, y| {
        let p = &frame.pixels[(y * frame.width + x) as usize];
        Rgba([srgb8(p.r), srgb8(p.g), srgb8(p.b), to_u8(p.a)])
    });
    ensure_parent(path)?;
    image.save(path).map_err(IoError::image(path))
}

pub fn write_depth_exr(path: &Path, frame: &Frame<f32>) -> IoResult<()> {
    check_size(frame)?;
    let image = Rgb32FImage::from_fn(frame.width, frame.height, |x, y| {
        let d = frame.pixels[(y * frame.width + x) as usize];
        let d = if d.is_finite() { d } else { BACKGROUND_DEPTH };
        Rgb([d, d, d])
    });
    save_exr(path, image)
}

/// Rotates world-space normals into camera space (`R^-1 * n`) and writes them.
///
/// `rotation` is the camera-to-world rotation. Zero normals stay zero.
pub fn write_camera_normal_exr(path: &Path, frame: &Frame<Vec3>, rotation: &Mat3) -> IoResult<()> {
    check_size(frame)?;
    let to_camera = rotation.inverse().unwrap_or_else(|| rotation.transpose());
    let image = Rgb32FImage::from_fn(frame.width, frame.height, |x, y| {
        let n = to_camera * frame.pixels[(y * frame.width + x) as usize];
        Rgb(n.to_array())
    });
    save_exr(path, image)
}

/// A constant white environment map.
pub fn write_white_env(path: &Path, width: u32, height: u32) -> IoResult<()> {
    let image = Rgb32FImage::from_pixel(width.max(1), height.max(1), Rgb([1.0, 1.0, 1.0]));
    save_exr(path, image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_beauty_is_premultiplied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train/white_env_0/gt_0.png");
        let mut frame = Frame::filled(2, 1, LinearRgba::new(1.0, 1.0, 1.0, 1.0));
        frame.pixels[1] = LinearRgba::new(1.0, 1.0, 1.0, 0.5);
        write_beauty_png(&path, &frame).unwrap();
        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [128, 128, 128]);
    }

    #[test]
    fn test_normals_are_rotated_into_camera_space() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("normal_cam_0.exr");
        // Camera yawed 90 degrees about Z: camera X is world Y.
        let rotation = Mat3::from_cols(Vec3::Y, -Vec3::X, Vec3::Z);
        let frame = Frame::filled(1, 1, Vec3::Y);
        write_camera_normal_exr(&path, &frame, &rotation).unwrap();
        let image = image::open(&path).unwrap().to_rgb32f();
        let n = image.get_pixel(0, 0).0;
        assert_abs_diff_eq!(n[0], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(n[1], 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let frame = Frame {
            width: 2,
            height: 2,
            pixels: vec![0.0f32; 3],
        };
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            write_depth_exr(&dir.path().join("d.exr"), &frame),
            Err(IoError::FrameSize { actual: 3, .. })
        ));
    }
}
