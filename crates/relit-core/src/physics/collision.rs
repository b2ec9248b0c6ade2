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

//! Triangle-mesh overlap tests.

use super::DynamicTree;
use crate::asset::ImportedAsset;
use crate::math::{Aabb, Vec3};

/// A world-space triangle soup with a BVH over its triangles.
#[derive(Debug, Clone)]
pub struct MeshCollider {
    tree: DynamicTree<usize>,
    triangles: Vec<[Vec3; 3]>,
    bounds: Aabb,
}

impl MeshCollider {
    /// Builds a collider from an asset's current world transform. `None` if it has no triangles.
    pub fn from_asset(asset: &ImportedAsset) -> Option<Self> {
        Self::from_triangles(asset.world_triangles().collect())
    }

    pub fn from_triangles(triangles: Vec<[Vec3; 3]>) -> Option<Self> {
        let mut tree = DynamicTree::new();
        let mut bounds = Aabb::INVALID;
        for (i, tri) in triangles.iter().enumerate() {
            let aabb = triangle_bounds(tri);
            bounds = bounds.merge(&aabb);
            tree.insert(aabb, i);
        }
        if tree.is_empty() {
            return None;
        }
        Some(Self {
            tree,
            triangles,
            bounds,
        })
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True if the two meshes touch or one's bounds swallow the other's.
    ///
    /// Surface contact is exact (triangle pairs from the BVH, then a
    /// separating-axis test). Full containment without surface contact is
    /// approximated by bounds containment, which errs towards reporting a hit.
    pub fn intersects(&self, other: &MeshCollider) -> bool {
        if !self.bounds.intersects_aabb(&other.bounds) {
            return false;
        }
        let (probe, target) = if self.triangles.len() <= other.triangles.len() {
            (self, other)
        } else {
            (other, self)
        };

        let mut hit = false;
        for tri in &probe.triangles {
            let aabb = triangle_bounds(tri);
            if !aabb.intersects_aabb(&target.bounds) {
                continue;
            }
            target.tree.query(&aabb, |&j| {
                hit = triangles_intersect(tri, &target.triangles[j]);
                !hit
            });
            if hit {
                return true;
            }
        }
        self.bounds.contains_aabb(&other.bounds) || other.bounds.contains_aabb(&self.bounds)
    }
}

fn triangle_bounds(tri: &[Vec3; 3]) -> Aabb {
    Aabb::from_min_max(tri[0], tri[0])
        .merged_with_point(tri[1])
        .merged_with_point(tri[2])
}

fn project(tri: &[Vec3; 3], axis: Vec3) -> (f32, f32) {
    let d = [axis.dot(tri[0]), axis.dot(tri[1]), axis.dot(tri[2])];
    (d[0].min(d[1]).min(d[2]), d[0].max(d[1]).max(d[2]))
}

fn separated_on(a: &[Vec3; 3], b: &[Vec3; 3], axis: Vec3) -> bool {
    if axis.length_squared() < 1e-12 {
        return false;
    }
    let (min_a, max_a) = project(a, axis);
    let (min_b, max_b) = project(b, axis);
    max_a < min_b || max_b < min_a
}

/// Separating-axis test between two triangles. Touching counts as intersecting.
pub fn triangles_intersect(a: &[Vec3; 3], b: &[Vec3; 3]) -> bool {
    let edges_a = [a[1] - a[0], a[2] - a[1], a[0] - a[2]];
    let edges_b = [b[1] - b[0], b[2] - b[1], b[0] - b[2]];
    let normal_a = edges_a[0].cross(edges_a[1]);
    let normal_b = edges_b[0].cross(edges_b[1]);

    if separated_on(a, b, normal_a) || separated_on(a, b, normal_b) {
        return false;
    }

    let coplanar = normal_a.cross(normal_b).length_squared()
        < 1e-10 * normal_a.length_squared() * normal_b.length_squared();
    if coplanar {
        // Edge normals within the shared plane.
        return !edges_a
            .iter()
            .map(|e| normal_a.cross(*e))
            .chain(edges_b.iter().map(|e| normal_b.cross(*e)))
            .any(|axis| separated_on(a, b, axis));
    }

    !edges_a
        .iter()
        .flat_map(|ea| edges_b.iter().map(move |eb| ea.cross(*eb)))
        .any(|axis| separated_on(a, b, axis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MeshNode;
    use crate::math::Mat4;

    fn tri(p: [[f32; 3]; 3]) -> [Vec3; 3] {
        [Vec3::from_array(p[0]), Vec3::from_array(p[1]), Vec3::from_array(p[2])]
    }

    fn unit_cube(id: &str, at: Vec3, scale: f32) -> ImportedAsset {
        let positions = (0..8)
            .map(|i| Vec3::new((i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32) - Vec3::splat(0.5))
            .collect();
        let indices = vec![
            0, 2, 1, 1, 2, 3, 4, 5, 6, 5, 7, 6, 0, 1, 4, 1, 5, 4, 2, 6, 3, 3, 6, 7, 0, 4, 2, 2, 4, 6, 1, 3, 5,
            3, 7, 5,
        ];
        let mut asset = ImportedAsset::new(id, vec![MeshNode::new("cube", positions, indices)]);
        asset.root = Mat4::from_translation(at) * Mat4::from_scale(Vec3::splat(scale));
        asset
    }

    #[test]
    fn test_crossing_triangles_intersect() {
        let a = tri([[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [0.0, 1.0, 0.0]]);
        let b = tri([[0.0, 0.0, -1.0], [0.0, 0.0, 1.0], [0.0, 2.0, 0.0]]);
        assert!(triangles_intersect(&a, &b));
    }

    #[test]
    fn test_parallel_offset_triangles_do_not_intersect() {
        let a = tri([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let b = tri([[0.0, 0.0, 0.1], [1.0, 0.0, 0.1], [0.0, 1.0, 0.1]]);
        assert!(!triangles_intersect(&a, &b));
    }

    #[test]
    fn test_coplanar_triangles() {
        let a = tri([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let overlapping = tri([[0.2, 0.2, 0.0], [1.2, 0.2, 0.0], [0.2, 1.2, 0.0]]);
        let apart = tri([[2.0, 2.0, 0.0], [3.0, 2.0, 0.0], [2.0, 3.0, 0.0]]);
        assert!(triangles_intersect(&a, &overlapping));
        assert!(!triangles_intersect(&a, &apart));
    }

    #[test]
    fn test_mesh_colliders() {
        let a = MeshCollider::from_asset(&unit_cube("a", Vec3::ZERO, 1.0)).unwrap();
        let overlapping = MeshCollider::from_asset(&unit_cube("b", Vec3::new(0.7, 0.0, 0.0), 1.0)).unwrap();
        let apart = MeshCollider::from_asset(&unit_cube("c", Vec3::new(3.0, 0.0, 0.0), 1.0)).unwrap();
        let inside = MeshCollider::from_asset(&unit_cube("d", Vec3::ZERO, 0.2)).unwrap();

        assert_eq!(a.triangle_count(), 12);
        assert!(a.intersects(&overlapping));
        assert!(!a.intersects(&apart));
        assert!(a.intersects(&inside));
        assert!(inside.intersects(&a));
    }

    #[test]
    fn test_empty_asset_has_no_collider() {
        assert!(MeshCollider::from_asset(&ImportedAsset::new("e", vec![])).is_none());
    }
}
