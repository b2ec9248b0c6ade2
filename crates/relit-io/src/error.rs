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

//! Error type of the I/O layer.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type IoResult<T> = Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Image error on '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Manifest '{path}' line {line}: {reason}")]
    Manifest { path: PathBuf, line: usize, reason: String },

    #[error("Camera manifest '{path}' is invalid: {reason}")]
    CameraManifest { path: PathBuf, reason: String },

    #[error("Frame holds {actual} pixels, expected {width}x{height}")]
    FrameSize { width: u32, height: u32, actual: usize },
}

impl IoError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> IoError {
        let path = path.to_path_buf();
        move |source| IoError::Io { path, source }
    }

    pub(crate) fn json(path: &Path) -> impl FnOnce(serde_json::Error) -> IoError {
        let path = path.to_path_buf();
        move |source| IoError::Json { path, source }
    }

    pub(crate) fn image(path: &Path) -> impl FnOnce(image::ImageError) -> IoError {
        let path = path.to_path_buf();
        move |source| IoError::Image { path, source }
    }
}

/// Creates the parent directory of `path` if needed.
pub(crate) fn ensure_parent(path: &Path) -> IoResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(IoError::io(parent))
        }
        _ => Ok(()),
    }
}
