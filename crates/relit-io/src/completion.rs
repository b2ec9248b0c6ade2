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

//! Derived completion state: a run never keeps its own progress log.
//!
//! An output directory is complete when an archived `<dir>.tar` sits next to
//! it, or when it holds at least the expected number of PNG images.

use crate::layout::SceneLayout;
use relit_core::Split;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

fn archive_path(dir: &Path) -> PathBuf {
    let mut name = OsString::from(dir.as_os_str());
    name.push(".tar");
    PathBuf::from(name)
}

/// Number of `*.png` files directly inside `dir`; 0 when it does not exist.
pub fn count_images(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .count()
}

pub fn split_complete(dir: &Path, expected: usize) -> bool {
    archive_path(dir).is_file() || count_images(dir) >= expected
}

/// True when every `(split, expected image count)` pair is complete for `variant`.
pub fn variant_complete(layout: &SceneLayout, variant: &str, expected: &[(Split, usize)]) -> bool {
    expected
        .iter()
        .all(|(split, count)| split_complete(&layout.variant_dir(*split, variant), *count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_count_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let variant = dir.path().join("white_pl_0");
        assert!(!split_complete(&variant, 2));
        fs::create_dir_all(&variant).unwrap();
        fs::write(variant.join("gt_0.png"), b"x").unwrap();
        fs::write(variant.join("notes.txt"), b"x").unwrap();
        assert_eq!(count_images(&variant), 1);
        assert!(!split_complete(&variant, 2));
        fs::write(variant.join("gt_1.PNG"), b"x").unwrap();
        assert!(split_complete(&variant, 2));
    }

    #[test]
    fn test_archive_counts_as_complete() {
        let dir = tempfile::tempdir().unwrap();
        let variant = dir.path().join("env_1");
        fs::write(dir.path().join("env_1.tar"), b"").unwrap();
        assert!(split_complete(&variant, 100));
    }

    #[test]
    fn test_variant_needs_both_splits() {
        let dir = tempfile::tempdir().unwrap();
        let layout = SceneLayout::new(dir.path());
        let train = layout.variant_dir(Split::Train, "area_0");
        fs::create_dir_all(&train).unwrap();
        fs::write(train.join("gt_0.png"), b"x").unwrap();
        let expected = [(Split::Train, 1), (Split::Test, 1)];
        assert!(!variant_complete(&layout, "area_0", &expected));
        fs::create_dir_all(layout.split_dir(Split::Test)).unwrap();
        fs::write(layout.split_dir(Split::Test).join("area_0.tar"), b"").unwrap();
        assert!(variant_complete(&layout, "area_0", &expected));
    }
}
