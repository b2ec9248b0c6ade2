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

//! Camera poses built from sampled eye positions.

use crate::error::CameraError;
use crate::math::{degrees_to_radians, Mat3, Mat4, Vec3, Vec4};
use crate::sampling::{uniform, UpAxis};
use rand::Rng;

/// A camera set: training views or the held-out test trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// Both splits, in render order.
    pub const ALL: [Split; 2] = [Split::Train, Split::Test];

    /// Directory name under the scene root.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

/// One camera of a split: view index, camera-to-world transform and vertical field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// View index inside its split; names the output files (`gt_<id>.png`).
    pub id: usize,
    /// Camera-to-world transform. Columns are right, up, back (-forward) and eye.
    pub c2w: Mat4,
    /// Field of view in degrees.
    pub fov_deg: f32,
}

impl CameraPose {
    /// The camera position in world space.
    pub fn eye(&self) -> Vec3 {
        self.c2w.translation()
    }

    /// The rotation block of `c2w`.
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_mat4(&self.c2w)
    }

    /// The direction the camera looks at.
    pub fn forward(&self) -> Vec3 {
        -self.c2w.cols[2].truncate()
    }

    /// World-to-camera (view) matrix.
    pub fn world_to_camera(&self) -> Option<Mat4> {
        self.c2w.affine_inverse()
    }
}

/// Builds a camera-to-world matrix looking from `eye` towards `target`.
///
/// `forward = normalize(target - eye)`, `right = normalize(forward x up)`,
/// `true_up = right x forward`; the camera looks down its local -Z.
///
/// Precondition: `eye != target` and the view direction is not parallel to
/// `up`. Violations return [`CameraError::DegenerateBasis`].
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<Mat4, CameraError> {
    let degenerate = || CameraError::DegenerateBasis { eye: eye.to_array() };
    let forward = (target - eye).try_normalize().ok_or_else(degenerate)?;
    let right = forward.cross(up).try_normalize().ok_or_else(degenerate)?;
    let true_up = right.cross(forward);
    Ok(Mat4::from_cols(
        Vec4::from_vec3(right, 0.0),
        Vec4::from_vec3(true_up, 0.0),
        Vec4::from_vec3(-forward, 0.0),
        Vec4::from_vec3(eye, 1.0),
    ))
}

/// How each camera's field of view is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FovPolicy {
    /// Every camera uses the same value.
    Fixed(f32),
    /// Drawn per camera from `U(min_deg, max_deg)`.
    Jitter { min_deg: f32, max_deg: f32 },
}

/// How a sampled eye position is turned into the final camera distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusPolicy {
    /// The eye is used exactly as sampled.
    AsSampled,
    /// Scales the eye offset by `object_radius / tanh(fov / 2)` so an object of
    /// that radius fills the frame, times an optional per-camera `U(lo, hi)` factor.
    FitSphere {
        object_radius: f32,
        jitter: Option<(f32, f32)>,
    },
}

/// Turns eye positions into [`CameraPose`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBuilder {
    target: Vec3,
    up: Vec3,
    fov: FovPolicy,
    radius: RadiusPolicy,
}

impl CameraBuilder {
    /// Cameras aimed at the origin with a fixed 40 degree field of view.
    pub fn new(up_axis: UpAxis) -> Self {
        Self {
            target: Vec3::ZERO,
            up: up_axis.vector(),
            fov: FovPolicy::Fixed(40.0),
            radius: RadiusPolicy::AsSampled,
        }
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn with_fov(mut self, fov: FovPolicy) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_radius(mut self, radius: RadiusPolicy) -> Self {
        self.radius = radius;
        self
    }

    /// Builds one pose. Draws from `rng` only for jittered policies: field of view
    /// first, then the radius factor.
    pub fn build<R: Rng + ?Sized>(&self, id: usize, eye: Vec3, rng: &mut R) -> Result<CameraPose, CameraError> {
        let fov_deg = match self.fov {
            FovPolicy::Fixed(fov) => fov,
            FovPolicy::Jitter { min_deg, max_deg } => uniform(rng, min_deg, max_deg),
        };
        if !(fov_deg > 0.0 && fov_deg < 180.0) {
            return Err(CameraError::InvalidFov(fov_deg));
        }
        let eye = match self.radius {
            RadiusPolicy::AsSampled => eye,
            RadiusPolicy::FitSphere {
                object_radius,
                jitter,
            } => {
                let factor = jitter.map_or(1.0, |(lo, hi)| uniform(rng, lo, hi));
                let distance = object_radius / (degrees_to_radians(fov_deg) * 0.5).tanh();
                self.target + (eye - self.target) * (distance * factor)
            }
        };
        Ok(CameraPose {
            id,
            c2w: look_at(eye, self.target, self.up)?,
            fov_deg,
        })
    }

    /// Builds one pose per eye, ids numbered from 0 in input order.
    pub fn build_all<R: Rng + ?Sized>(&self, eyes: &[Vec3], rng: &mut R) -> Result<Vec<CameraPose>, CameraError> {
        eyes.iter()
            .enumerate()
            .map(|(id, eye)| self.build(id, *eye, &mut *rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq_eps;
    use crate::sampling::{sample_shell, scene_rng, ShellParams};

    fn assert_orthonormal(m: &Mat4) {
        let r = Mat3::from_mat4(m);
        for i in 0..3 {
            assert!(approx_eq_eps(r.cols[i].length(), 1.0, 1e-4));
            for j in (i + 1)..3 {
                assert!(r.cols[i].dot(r.cols[j]).abs() < 1e-4);
            }
        }
        assert!(approx_eq_eps(r.determinant(), 1.0, 1e-4));
    }

    #[test]
    fn test_look_at_basis_is_orthonormal() {
        let params = ShellParams::new(3.0, 4.5).with_polar(1.0, 179.0);
        for eye in sample_shell(Some(17), 200, &params).unwrap() {
            let m = look_at(eye, Vec3::ZERO, Vec3::Z).unwrap();
            assert_orthonormal(&m);
            assert_eq!(m.translation(), eye);
        }
    }

    #[test]
    fn test_look_at_points_at_target() {
        let eye = Vec3::new(0.0, -4.0, 1.0);
        let pose = CameraPose {
            id: 0,
            c2w: look_at(eye, Vec3::ZERO, Vec3::Z).unwrap(),
            fov_deg: 40.0,
        };
        let expected = (-eye).try_normalize().unwrap();
        assert!((pose.forward() - expected).length() < 1e-5);
        let view = pose.world_to_camera().unwrap();
        let origin_in_cam = view.transform_point3(Vec3::ZERO);
        assert!(origin_in_cam.x.abs() < 1e-5 && origin_in_cam.y.abs() < 1e-5);
        assert!(origin_in_cam.z < 0.0);
    }

    #[test]
    fn test_look_at_degenerate_inputs() {
        assert!(matches!(
            look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Z),
            Err(CameraError::DegenerateBasis { .. })
        ));
        assert!(look_at(Vec3::ZERO, Vec3::ZERO, Vec3::Z).is_err());
    }

    #[test]
    fn test_fit_sphere_radius_uses_tanh() {
        let builder = CameraBuilder::new(UpAxis::Z)
            .with_fov(FovPolicy::Fixed(30.0))
            .with_radius(RadiusPolicy::FitSphere {
                object_radius: 0.5,
                jitter: None,
            });
        let mut rng = scene_rng(Some(0));
        let pose = builder.build(3, Vec3::new(1.0, 0.0, 0.0), &mut rng).unwrap();
        let expected = 0.5 / (15f32.to_radians()).tanh();
        assert!((pose.eye().length() - expected).abs() < 1e-4);
        assert_eq!(pose.id, 3);
    }

    #[test]
    fn test_jittered_fov_within_bounds_and_deterministic() {
        let builder = CameraBuilder::new(UpAxis::Z).with_fov(FovPolicy::Jitter {
            min_deg: 25.0,
            max_deg: 35.0,
        });
        let eyes = sample_shell(Some(1), 10, &ShellParams::new(1.0, 2.0).with_polar(10.0, 80.0)).unwrap();
        let a = builder.build_all(&eyes, &mut scene_rng(Some(5))).unwrap();
        let b = builder.build_all(&eyes, &mut scene_rng(Some(5))).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|p| (25.0..35.0).contains(&p.fov_deg)));
        assert_eq!(a.iter().map(|p| p.id).collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_invalid_fov_rejected() {
        let builder = CameraBuilder::new(UpAxis::Z).with_fov(FovPolicy::Fixed(0.0));
        let err = builder.build(0, Vec3::X * 3.0, &mut scene_rng(Some(0))).unwrap_err();
        assert_eq!(err, CameraError::InvalidFov(0.0));
    }
}
