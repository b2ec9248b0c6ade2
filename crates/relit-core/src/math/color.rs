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

//! Linear-space RGBA color, used for light tints and rendered pixels.

use std::ops::{Add, Mul};

/// A color in linear RGB space with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct LinearRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl LinearRgba {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// The RGB channels as an array, the layout stored in light metadata.
    #[inline]
    pub const fn to_rgb_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// RGB scaled by alpha.
    #[inline]
    pub fn premultiplied(&self) -> Self {
        Self::new(self.r * self.a, self.g * self.a, self.b * self.a, self.a)
    }

    /// Encodes a linear channel value with the sRGB transfer curve.
    pub fn linear_to_srgb(c: f32) -> f32 {
        let c = c.clamp(0.0, 1.0);
        if c <= 0.003_130_8 {
            c * 12.92
        } else {
            1.055 * c.powf(1.0 / 2.4) - 0.055
        }
    }
}

impl Default for LinearRgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Add for LinearRgba {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl Mul<f32> for LinearRgba {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premultiplied() {
        let c = LinearRgba::new(1.0, 0.5, 0.2, 0.5).premultiplied();
        assert_eq!(c, LinearRgba::new(0.5, 0.25, 0.1, 0.5));
    }

    #[test]
    fn test_srgb_curve_endpoints() {
        assert_eq!(LinearRgba::linear_to_srgb(0.0), 0.0);
        assert!((LinearRgba::linear_to_srgb(1.0) - 1.0).abs() < 1e-6);
        assert!(LinearRgba::linear_to_srgb(0.5) > 0.5);
    }
}
