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

//! `relit sample-manifest`: grow a manifest CSV from an object-path map.

use crate::cli::SampleManifestArgs;
use anyhow::{Context, Result};
use relit_io::{merge_manifest, read_manifest, sample_object_paths, write_manifest, ManifestEntry};

/// Samples, merges with the existing manifest, and returns the final entry count.
pub fn run(args: &SampleManifestArgs) -> Result<usize> {
    let sampled = sample_object_paths(&args.object_paths, args.count, args.seed)
        .with_context(|| format!("Failed to sample from '{}'", args.object_paths.display()))?;
    let existing: Vec<ManifestEntry> = if args.output.exists() {
        read_manifest(&args.output)?.entries().to_vec()
    } else {
        Vec::new()
    };
    let merged = merge_manifest(&existing, &sampled);
    write_manifest(&args.output, &merged)
        .with_context(|| format!("Failed to write manifest '{}'", args.output.display()))?;
    log::info!(
        "SampleManifest: {} existing + {} sampled -> {} entries in '{}'",
        existing.len(),
        sampled.len(),
        merged.len(),
        args.output.display()
    );
    Ok(merged.len())
}
