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

//! Defines the error taxonomy shared by sampling, composition, import and rendering.
//!
//! Each error belongs to a single scene: callers catch it at the per-asset
//! boundary, record it and move on to the next asset.

use std::fmt;
use std::path::PathBuf;

/// An error produced while sampling points on a spherical shell.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    /// The parameters describe an empty or impossible range.
    InvalidRange {
        /// Which parameter pair was rejected.
        parameter: &'static str,
        /// The lower bound supplied.
        min: f32,
        /// The upper bound supplied.
        max: f32,
    },
    /// Rejection sampling of the polar angle did not converge.
    RangeExhausted {
        /// Number of draws attempted before giving up.
        attempts: usize,
        /// Accepted polar interval lower bound, degrees.
        min_polar_deg: f32,
        /// Accepted polar interval upper bound, degrees.
        max_polar_deg: f32,
    },
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingError::InvalidRange {
                parameter,
                min,
                max,
            } => write!(f, "Invalid {parameter} range [{min}, {max}]"),
            SamplingError::RangeExhausted {
                attempts,
                min_polar_deg,
                max_polar_deg,
            } => write!(
                f,
                "Polar angle rejection did not converge after {attempts} attempts for [{min_polar_deg}, {max_polar_deg}] degrees"
            ),
        }
    }
}

impl std::error::Error for SamplingError {}

/// An error building a camera pose.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraError {
    /// The eye coincides with the target, or the view direction is parallel to `up`.
    DegenerateBasis {
        /// The offending eye position.
        eye: [f32; 3],
    },
    /// The field of view is outside (0, 180) degrees.
    InvalidFov(f32),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::DegenerateBasis { eye } => write!(
                f,
                "Cannot build a look-at basis from eye {eye:?}: view direction is zero or parallel to up"
            ),
            CameraError::InvalidFov(fov) => write!(f, "Field of view {fov} is not in (0, 180) degrees"),
        }
    }
}

impl std::error::Error for CameraError {}

/// An error raised by an asset import collaborator.
#[derive(Debug)]
pub enum ImportError {
    /// The asset file does not exist.
    NotFound(PathBuf),
    /// The file extension has no registered importer.
    UnsupportedFormat(String),
    /// The file was found but could not be decoded.
    Malformed {
        /// The asset path.
        path: PathBuf,
        /// The decoder's message.
        reason: String,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NotFound(path) => write!(f, "Asset not found: {}", path.display()),
            ImportError::UnsupportedFormat(ext) => {
                write!(f, "No importer registered for extension '{ext}'")
            }
            ImportError::Malformed { path, reason } => {
                write!(f, "Failed to import '{}': {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for ImportError {}

/// An error composing assets into a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum ComposeError {
    /// The asset has no mesh geometry, so it has no bounds to normalize.
    EmptyAsset(String),
    /// The strategy needs a different number of assets.
    AssetCount {
        /// The strategy that rejected the input.
        strategy: &'static str,
        /// How many assets it expects.
        expected: usize,
        /// How many were supplied.
        actual: usize,
    },
    /// A placement draw failed.
    Sampling(SamplingError),
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::EmptyAsset(id) => write!(f, "Asset '{id}' has no mesh bounds"),
            ComposeError::AssetCount {
                strategy,
                expected,
                actual,
            } => write!(
                f,
                "Composition strategy '{strategy}' expects {expected} assets, got {actual}"
            ),
            ComposeError::Sampling(e) => write!(f, "Placement sampling failed: {e}"),
        }
    }
}

impl std::error::Error for ComposeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComposeError::Sampling(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SamplingError> for ComposeError {
    fn from(e: SamplingError) -> Self {
        ComposeError::Sampling(e)
    }
}

/// A failure reported by the render backend.
#[derive(Debug)]
pub enum RenderError {
    /// A call was made before `configure` or `load_scene`.
    NotReady(&'static str),
    /// The camera handle does not exist (already destroyed or never created).
    UnknownCamera(u64),
    /// The backend failed while producing an image.
    Backend(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotReady(what) => write!(f, "Renderer not ready: {what}"),
            RenderError::UnknownCamera(id) => write!(f, "Unknown camera handle {id}"),
            RenderError::Backend(msg) => write!(f, "Render backend failure: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}
