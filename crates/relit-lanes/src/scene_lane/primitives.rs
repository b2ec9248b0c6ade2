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

//! Procedural meshes for obstacles and ground planes.

use relit_core::math::{Vec3, TAU};
use relit_core::MeshNode;

/// Segment count used for generated cylinders.
pub const CYLINDER_SEGMENTS: u32 = 32;

/// An axis-aligned box centered on the origin.
pub fn box_mesh(half_extents: Vec3) -> MeshNode {
    let h = half_extents;
    let positions = (0..8u32)
        .map(|i| {
            let sign = |bit: u32| if i & bit == 0 { -1.0 } else { 1.0 };
            Vec3::new(sign(1) * h.x, sign(2) * h.y, sign(4) * h.z)
        })
        .collect();
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 1, 1, 2, 3, // -z
        4, 5, 6, 5, 7, 6, // +z
        0, 1, 4, 1, 5, 4, // -y
        2, 6, 3, 3, 6, 7, // +y
        0, 4, 2, 2, 4, 6, // -x
        1, 3, 5, 3, 7, 5, // +x
    ];
    MeshNode::new("box", positions, indices)
}

/// A closed cylinder along Z, centered on the origin.
pub fn cylinder_mesh(radius: f32, depth: f32, segments: u32) -> MeshNode {
    let segments = segments.max(3);
    let half = depth * 0.5;
    let mut positions = Vec::with_capacity(2 * segments as usize + 2);
    for i in 0..segments {
        let a = TAU * i as f32 / segments as f32;
        let (s, c) = a.sin_cos();
        positions.push(Vec3::new(radius * c, radius * s, -half));
        positions.push(Vec3::new(radius * c, radius * s, half));
    }
    let bottom_center = positions.len() as u32;
    positions.push(Vec3::new(0.0, 0.0, -half));
    positions.push(Vec3::new(0.0, 0.0, half));
    let top_center = bottom_center + 1;

    let mut indices = Vec::with_capacity(12 * segments as usize);
    for i in 0..segments {
        let j = (i + 1) % segments;
        let (b0, t0, b1, t1) = (2 * i, 2 * i + 1, 2 * j, 2 * j + 1);
        indices.extend_from_slice(&[b0, b1, t1, b0, t1, t0]);
        indices.extend_from_slice(&[bottom_center, b1, b0]);
        indices.extend_from_slice(&[top_center, t0, t1]);
    }
    MeshNode::new("cylinder", positions, indices)
}

/// A square in the ground plane (`z = 0`) with edge length `size`.
pub fn plane_mesh(size: f32) -> MeshNode {
    let h = size * 0.5;
    MeshNode::new(
        "ground",
        vec![
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}
