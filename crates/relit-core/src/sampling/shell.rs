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

//! Shell, clustered and trajectory samplers.

use super::{sample_with_retry, scene_rng, spherical_to_cartesian, uniform, SceneRng, UpAxis};
use crate::error::SamplingError;
use crate::math::{degrees_to_radians, Vec3, TAU};
use rand::Rng;

/// Upper polar bound enforced on every point of a cluster, in degrees.
///
/// The caller's `max_polar_deg` only constrains the cluster center; cluster
/// members are re-drawn against `[min_polar_deg, CLUSTER_POLAR_CAP_DEG]`.
pub const CLUSTER_POLAR_CAP_DEG: f32 = 85.0;

/// Per-draw bound on polar angle rejections.
pub const DEFAULT_MAX_REJECTIONS: usize = 10_000;

/// A spherical shell region: radius interval and polar interval (degrees from up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellParams {
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_polar_deg: f32,
    pub max_polar_deg: f32,
    pub up_axis: UpAxis,
}

impl ShellParams {
    /// A full shell between two radii, Z-up.
    pub fn new(min_radius: f32, max_radius: f32) -> Self {
        Self {
            min_radius,
            max_radius,
            min_polar_deg: 0.0,
            max_polar_deg: 180.0,
            up_axis: UpAxis::Z,
        }
    }

    /// Restricts the polar interval.
    pub fn with_polar(mut self, min_deg: f32, max_deg: f32) -> Self {
        self.min_polar_deg = min_deg;
        self.max_polar_deg = max_deg;
        self
    }

    pub fn with_up_axis(mut self, up_axis: UpAxis) -> Self {
        self.up_axis = up_axis;
        self
    }

    /// Rejects empty or out-of-domain intervals before any draw happens.
    pub fn validate(&self) -> Result<(), SamplingError> {
        if !(self.min_radius >= 0.0 && self.min_radius <= self.max_radius) {
            return Err(SamplingError::InvalidRange {
                parameter: "radius",
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if !(self.min_polar_deg >= 0.0
            && self.min_polar_deg <= self.max_polar_deg
            && self.max_polar_deg <= 180.0)
        {
            return Err(SamplingError::InvalidRange {
                parameter: "polar",
                min: self.min_polar_deg,
                max: self.max_polar_deg,
            });
        }
        Ok(())
    }
}

/// Perturbation ranges around a cluster center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSpread {
    /// Half-width of the radius offset.
    pub radius_range: f32,
    /// Half-width of the polar offset, degrees.
    pub polar_range_deg: f32,
    /// Half-width of the azimuth offset, degrees.
    pub azimuth_range_deg: f32,
}

impl Default for ClusterSpread {
    fn default() -> Self {
        Self {
            radius_range: 0.1,
            polar_range_deg: 45.0,
            azimuth_range_deg: 45.0,
        }
    }
}

/// A seeded point sampler.
///
/// The sampler owns its generator so that callers can keep drawing from the
/// same stream (powers, colors) after positions, through [`PointSampler::rng_mut`].
#[derive(Debug, Clone)]
pub struct PointSampler<R = SceneRng> {
    rng: R,
    max_rejections: usize,
}

impl PointSampler<SceneRng> {
    /// A sampler seeded with `seed`, or from OS entropy when `None`.
    pub fn from_seed(seed: Option<u64>) -> Self {
        Self::new(scene_rng(seed))
    }
}

impl<R: Rng> PointSampler<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_rejections: DEFAULT_MAX_REJECTIONS,
        }
    }

    /// Overrides the per-draw rejection bound.
    pub fn with_max_rejections(mut self, max_rejections: usize) -> Self {
        self.max_rejections = max_rejections.max(1);
        self
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn into_rng(self) -> R {
        self.rng
    }

    /// `n` points uniformly distributed over the area of a spherical shell band.
    ///
    /// Per point: azimuth `U(0, 2pi)`, polar `acos(U(-1, 1))` rejected into the
    /// polar interval, radius `U(min, max)`.
    pub fn sample_shell(&mut self, n: usize, params: &ShellParams) -> Result<Vec<Vec3>, SamplingError> {
        params.validate()?;
        (0..n)
            .map(|_| {
                let (r, theta, phi) = self.draw_spherical(params)?;
                Ok(params.up_axis.remap(spherical_to_cartesian(r, theta, phi)))
            })
            .collect()
    }

    /// `n` points scattered around one randomly drawn center.
    ///
    /// The center follows [`PointSampler::sample_shell`]. Each member offsets the
    /// center's radius, polar and azimuth by independent uniform amounts; the
    /// polar offset is re-drawn until it lands in
    /// `[min_polar_deg, CLUSTER_POLAR_CAP_DEG]`.
    pub fn sample_clustered(
        &mut self,
        n: usize,
        params: &ShellParams,
        spread: &ClusterSpread,
    ) -> Result<Vec<Vec3>, SamplingError> {
        params.validate()?;
        if params.min_polar_deg > CLUSTER_POLAR_CAP_DEG {
            return Err(SamplingError::InvalidRange {
                parameter: "clustered polar",
                min: params.min_polar_deg,
                max: CLUSTER_POLAR_CAP_DEG,
            });
        }
        let (center_r, center_theta, center_phi) = self.draw_spherical(params)?;
        let min_theta = degrees_to_radians(params.min_polar_deg);
        let cap_theta = degrees_to_radians(CLUSTER_POLAR_CAP_DEG);
        let polar_half = spread.polar_range_deg;
        let azimuth_half = spread.azimuth_range_deg;

        let mut points = Vec::with_capacity(n);
        for _ in 0..n {
            let r = (center_r + uniform(&mut self.rng, -spread.radius_range, spread.radius_range)).max(0.0);
            let first_theta =
                center_theta + degrees_to_radians(uniform(&mut self.rng, -polar_half, polar_half));
            let phi = center_phi + degrees_to_radians(uniform(&mut self.rng, -azimuth_half, azimuth_half));

            let theta = if (min_theta..=cap_theta).contains(&first_theta) {
                first_theta
            } else {
                let rng = &mut self.rng;
                sample_with_retry(
                    self.max_rejections,
                    || center_theta + degrees_to_radians(uniform(&mut *rng, -polar_half, polar_half)),
                    |t| (min_theta..=cap_theta).contains(t),
                    |attempts| SamplingError::RangeExhausted {
                        attempts,
                        min_polar_deg: params.min_polar_deg,
                        max_polar_deg: CLUSTER_POLAR_CAP_DEG,
                    },
                )?
            };
            points.push(params.up_axis.remap(spherical_to_cartesian(r, theta, phi)));
        }
        Ok(points)
    }

    fn draw_spherical(&mut self, params: &ShellParams) -> Result<(f32, f32, f32), SamplingError> {
        let min_theta = degrees_to_radians(params.min_polar_deg);
        let max_theta = degrees_to_radians(params.max_polar_deg);
        let phi = uniform(&mut self.rng, 0.0, TAU);
        let rng = &mut self.rng;
        let theta = sample_with_retry(
            self.max_rejections,
            || uniform(&mut *rng, -1.0, 1.0).acos(),
            |t| (min_theta..=max_theta).contains(t),
            |attempts| SamplingError::RangeExhausted {
                attempts,
                min_polar_deg: params.min_polar_deg,
                max_polar_deg: params.max_polar_deg,
            },
        )?;
        let r = uniform(&mut self.rng, params.min_radius, params.max_radius);
        Ok((r, theta, phi))
    }
}

/// [`PointSampler::sample_shell`] with a fresh generator for `seed`.
pub fn sample_shell(seed: Option<u64>, n: usize, params: &ShellParams) -> Result<Vec<Vec3>, SamplingError> {
    PointSampler::from_seed(seed).sample_shell(n, params)
}

/// [`PointSampler::sample_clustered`] with a fresh generator for `seed`.
pub fn sample_clustered(
    seed: Option<u64>,
    n: usize,
    params: &ShellParams,
    spread: &ClusterSpread,
) -> Result<Vec<Vec3>, SamplingError> {
    PointSampler::from_seed(seed).sample_clustered(n, params, spread)
}

/// A ring of `n` points at a fixed radius and polar angle, evenly spaced in azimuth
/// over `[0, 2pi)`, starting at azimuth 0. No randomness is involved.
pub fn sample_trajectory(
    n: usize,
    radius: f32,
    polar_deg: f32,
    up_axis: UpAxis,
) -> Result<Vec<Vec3>, SamplingError> {
    ShellParams::new(radius, radius)
        .with_polar(polar_deg, polar_deg)
        .validate()?;
    let theta = degrees_to_radians(polar_deg);
    Ok((0..n)
        .map(|i| {
            let phi = TAU * i as f32 / n as f32;
            up_axis.remap(spherical_to_cartesian(radius, theta, phi))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::radians_to_degrees;

    fn polar_deg(p: Vec3, up: UpAxis) -> f32 {
        radians_to_degrees((up.height(p) / p.length()).clamp(-1.0, 1.0).acos())
    }

    #[test]
    fn test_shell_respects_bounds() {
        let params = ShellParams::new(3.0, 4.5).with_polar(10.0, 80.0);
        let pts = sample_shell(Some(3), 500, &params).unwrap();
        assert_eq!(pts.len(), 500);
        for p in pts {
            let r = p.length();
            assert!((3.0 - 1e-4..=4.5 + 1e-4).contains(&r), "radius {r}");
            let t = polar_deg(p, UpAxis::Z);
            assert!((10.0 - 1e-2..=80.0 + 1e-2).contains(&t), "polar {t}");
        }
    }

    #[test]
    fn test_shell_y_up_is_axis_swap() {
        let params = ShellParams::new(1.0, 2.0).with_polar(0.0, 60.0);
        let z_up = sample_shell(Some(11), 20, &params).unwrap();
        let y_up = sample_shell(Some(11), 20, &params.with_up_axis(UpAxis::Y)).unwrap();
        for (a, b) in z_up.iter().zip(&y_up) {
            assert_eq!(*b, Vec3::new(a.x, a.z, a.y));
            assert!(polar_deg(*b, UpAxis::Y) <= 60.0 + 1e-2);
        }
    }

    #[test]
    fn test_shell_is_deterministic() {
        let params = ShellParams::new(3.0, 4.5).with_polar(0.0, 80.0);
        assert_eq!(
            sample_shell(Some(42), 5, &params).unwrap(),
            sample_shell(Some(42), 5, &params).unwrap()
        );
        assert_ne!(
            sample_shell(Some(42), 5, &params).unwrap(),
            sample_shell(Some(43), 5, &params).unwrap()
        );
    }

    #[test]
    fn test_shell_rejects_invalid_ranges() {
        let bad_radius = ShellParams::new(2.0, 1.0);
        assert!(matches!(
            sample_shell(Some(0), 1, &bad_radius),
            Err(SamplingError::InvalidRange { parameter: "radius", .. })
        ));
        let bad_polar = ShellParams::new(1.0, 2.0).with_polar(90.0, 200.0);
        assert!(matches!(
            sample_shell(Some(0), 1, &bad_polar),
            Err(SamplingError::InvalidRange { parameter: "polar", .. })
        ));
    }

    #[test]
    fn test_shell_narrow_band_exhausts() {
        let params = ShellParams::new(1.0, 1.0).with_polar(45.0, 45.0);
        let result = PointSampler::from_seed(Some(5))
            .with_max_rejections(50)
            .sample_shell(1, &params);
        assert_eq!(
            result,
            Err(SamplingError::RangeExhausted {
                attempts: 50,
                min_polar_deg: 45.0,
                max_polar_deg: 45.0,
            })
        );
    }

    #[test]
    fn test_clustered_caps_polar_angle() {
        let params = ShellParams::new(3.0, 5.0).with_polar(0.0, 180.0);
        for seed in 0..20 {
            let pts = sample_clustered(Some(seed), 8, &params, &ClusterSpread::default()).unwrap();
            assert_eq!(pts.len(), 8);
            for p in pts {
                assert!(polar_deg(p, UpAxis::Z) <= CLUSTER_POLAR_CAP_DEG + 1e-2);
            }
        }
    }

    #[test]
    fn test_clustered_stays_near_center_radius() {
        let params = ShellParams::new(4.0, 4.0).with_polar(0.0, 60.0);
        let spread = ClusterSpread {
            radius_range: 0.1,
            ..ClusterSpread::default()
        };
        let pts = sample_clustered(Some(9), 16, &params, &spread).unwrap();
        for p in pts {
            assert!((p.length() - 4.0).abs() <= 0.1 + 1e-4);
        }
    }

    #[test]
    fn test_clustered_rejects_min_above_cap() {
        let params = ShellParams::new(1.0, 2.0).with_polar(86.0, 120.0);
        assert!(sample_clustered(Some(1), 3, &params, &ClusterSpread::default()).is_err());
    }

    #[test]
    fn test_trajectory_is_even_ring() {
        let pts = sample_trajectory(8, 4.0, 60.0, UpAxis::Z).unwrap();
        assert_eq!(pts.len(), 8);
        assert!((pts[0].y).abs() < 1e-5 && pts[0].x > 0.0);
        for pair in pts.windows(2) {
            assert!((pair[0].length() - 4.0).abs() < 1e-4);
            assert!((pair[0].z - pair[1].z).abs() < 1e-5);
            let cos = pair[0].dot(pair[1]) / (pair[0].length() * pair[1].length());
            let expected = {
                let s = 60f32.to_radians().sin();
                let c = 60f32.to_radians().cos();
                s * s * (TAU / 8.0).cos() + c * c
            };
            assert!((cos - expected).abs() < 1e-4);
        }
        assert!(sample_trajectory(0, 4.0, 60.0, UpAxis::Z).unwrap().is_empty());
    }
}
