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

//! Visibility: perspective projection and z-buffered triangle rasterization.

use relit_core::math::{LinearRgba, Vec3};
use relit_core::{CameraPose, RenderError};

/// Camera-space distance below which geometry is not drawn.
const NEAR_PLANE: f32 = 1e-3;

/// A world-space triangle with its surface attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTriangle {
    pub vertices: [Vec3; 3],
    /// Unit geometric normal following the winding order.
    pub normal: Vec3,
    pub albedo: LinearRgba,
}

impl SceneTriangle {
    /// Returns `None` for degenerate (zero-area) triangles.
    pub fn new(vertices: [Vec3; 3], albedo: LinearRgba) -> Option<Self> {
        let normal = (vertices[1] - vertices[0])
            .cross(vertices[2] - vertices[0])
            .try_normalize()?;
        Some(Self {
            vertices,
            normal,
            albedo,
        })
    }
}

/// The nearest surface seen through every pixel of one view.
#[derive(Debug, Clone, PartialEq)]
pub struct GBuffer {
    pub width: u32,
    pub height: u32,
    /// Distance along the view axis; `f32::INFINITY` where nothing was hit.
    pub depth: Vec<f32>,
    /// World-space normals flipped towards the camera; zero for background.
    pub normal: Vec<Vec3>,
    /// Transparent for background.
    pub albedo: Vec<LinearRgba>,
    pub position: Vec<Vec3>,
}

impl GBuffer {
    fn empty(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            depth: vec![f32::INFINITY; len],
            normal: vec![Vec3::ZERO; len],
            albedo: vec![LinearRgba::TRANSPARENT; len],
            position: vec![Vec3::ZERO; len],
        }
    }

    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    pub fn is_hit(&self, index: usize) -> bool {
        self.depth.get(index).is_some_and(|d| d.is_finite())
    }
}

/// Rasterizes `triangles` as seen by `pose` into a `width` x `height` buffer.
///
/// Pixels are sampled at their centers. Triangles with a vertex behind the
/// near plane are dropped instead of clipped.
pub fn rasterize(
    triangles: &[SceneTriangle],
    pose: &CameraPose,
    width: u32,
    height: u32,
) -> Result<GBuffer, RenderError> {
    let view = pose
        .world_to_camera()
        .ok_or_else(|| RenderError::Backend(format!("camera {} has a singular transform", pose.id)))?;
    let focal = 0.5 * height as f32 / (0.5 * pose.fov_deg.to_radians()).tan();
    let (cx, cy) = (0.5 * width as f32, 0.5 * height as f32);
    let eye = pose.eye();
    let mut buffer = GBuffer::empty(width, height);

    for tri in triangles {
        let cam = tri.vertices.map(|v| view.transform_point3(v));
        if cam.iter().any(|p| -p.z < NEAR_PLANE) {
            continue;
        }
        let screen = cam.map(|p| (cx + focal * p.x / -p.z, cy - focal * p.y / -p.z));
        let area = edge(screen[0], screen[1], screen[2]);
        if area.abs() <= f32::EPSILON {
            continue;
        }
        let inv_depth = cam.map(|p| 1.0 / -p.z);
        let centroid = (tri.vertices[0] + tri.vertices[1] + tri.vertices[2]) / 3.0;
        let normal = if tri.normal.dot(eye - centroid) < 0.0 {
            -tri.normal
        } else {
            tri.normal
        };

        let (x0, x1) = pixel_span(screen.map(|s| s.0), width);
        let (y0, y1) = pixel_span(screen.map(|s| s.1), height);
        for y in y0..y1 {
            for x in x0..x1 {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let w = [
                    edge(screen[1], screen[2], p) / area,
                    edge(screen[2], screen[0], p) / area,
                    edge(screen[0], screen[1], p) / area,
                ];
                if w.iter().any(|b| *b < 0.0) {
                    continue;
                }
                let inv_z = w[0] * inv_depth[0] + w[1] * inv_depth[1] + w[2] * inv_depth[2];
                let depth = 1.0 / inv_z;
                let index = y as usize * width as usize + x as usize;
                if depth >= buffer.depth[index] {
                    continue;
                }
                // Perspective-correct barycentrics.
                let b = [0, 1, 2].map(|i| w[i] * inv_depth[i] * depth);
                buffer.depth[index] = depth;
                buffer.normal[index] = normal;
                buffer.albedo[index] = tri.albedo;
                buffer.position[index] =
                    tri.vertices[0] * b[0] + tri.vertices[1] * b[1] + tri.vertices[2] * b[2];
            }
        }
    }
    Ok(buffer)
}

fn edge(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

/// Half-open pixel range covered by the projected coordinates, clamped to the image.
fn pixel_span(coords: [f32; 3], size: u32) -> (u32, u32) {
    let lo = coords.iter().copied().fold(f32::INFINITY, f32::min);
    let hi = coords.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let start = lo.floor().clamp(0.0, size as f32) as u32;
    let end = hi.ceil().clamp(0.0, size as f32) as u32;
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relit_core::look_at;

    fn pose() -> CameraPose {
        CameraPose {
            id: 0,
            c2w: look_at(Vec3::new(0.0, -5.0, 0.0), Vec3::ZERO, Vec3::Z).unwrap(),
            fov_deg: 40.0,
        }
    }

    /// A square of half-size `h` in the plane `y = depth_y`.
    fn quad(y: f32, h: f32, albedo: LinearRgba) -> Vec<SceneTriangle> {
        let a = Vec3::new(-h, y, -h);
        let b = Vec3::new(h, y, -h);
        let c = Vec3::new(h, y, h);
        let d = Vec3::new(-h, y, h);
        vec![
            SceneTriangle::new([a, b, c], albedo).unwrap(),
            SceneTriangle::new([a, c, d], albedo).unwrap(),
        ]
    }

    #[test]
    fn test_quad_covers_center_only() {
        let buffer = rasterize(&quad(0.0, 1.0, LinearRgba::WHITE), &pose(), 16, 16).unwrap();
        let center = 8 * 16 + 8;
        assert!(buffer.is_hit(center));
        assert!((buffer.depth[center] - 5.0).abs() < 1e-3);
        assert!(!buffer.is_hit(0));
        assert_eq!(buffer.normal[0], Vec3::ZERO);
        assert_eq!(buffer.albedo[0], LinearRgba::TRANSPARENT);
        assert!(buffer.position[center].length() < 0.5);
    }

    #[test]
    fn test_normals_face_the_camera() {
        let buffer = rasterize(&quad(0.0, 1.0, LinearRgba::WHITE), &pose(), 16, 16).unwrap();
        let n = buffer.normal[8 * 16 + 8];
        assert!((n - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_nearest_surface_wins_in_any_order() {
        let red = LinearRgba::rgb(1.0, 0.0, 0.0);
        let blue = LinearRgba::rgb(0.0, 0.0, 1.0);
        let center = 8 * 16 + 8;
        for near_first in [true, false] {
            let (near, far) = (quad(0.0, 1.0, red), quad(1.0, 1.0, blue));
            let tris: Vec<_> = if near_first {
                near.into_iter().chain(far).collect()
            } else {
                far.into_iter().chain(near).collect()
            };
            let buffer = rasterize(&tris, &pose(), 16, 16).unwrap();
            assert_eq!(buffer.albedo[center], red);
        }
    }

    #[test]
    fn test_geometry_behind_camera_is_dropped() {
        let buffer = rasterize(&quad(-10.0, 1.0, LinearRgba::WHITE), &pose(), 8, 8).unwrap();
        assert!((0..buffer.len()).all(|i| !buffer.is_hit(i)));
    }

    #[test]
    fn test_degenerate_triangle_is_rejected() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(SceneTriangle::new([p, p, Vec3::ZERO], LinearRgba::WHITE).is_none());
    }
}
