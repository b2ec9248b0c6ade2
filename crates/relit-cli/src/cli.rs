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

//! Command line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Generates multi-view relighting datasets from 3D assets.
#[derive(Parser, Debug)]
#[command(name = "relit", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render every scene of a manifest slice.
    Render(RenderArgs),
    /// Sample assets from an object-path map into a manifest CSV.
    SampleManifest(SampleManifestArgs),
    /// Write a constant white environment map.
    WhiteEnv(WhiteEnvArgs),
}

/// Overrides applied on top of the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// TOML configuration; defaults are used if it does not exist.
    #[arg(long, short, default_value = "relit.toml")]
    pub config: PathBuf,

    /// Base seed. Omit in the file and here for non-deterministic runs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// First manifest entry (or scene index) to render.
    #[arg(long)]
    pub group_start: Option<usize>,

    /// Exclusive end of the range.
    #[arg(long)]
    pub group_end: Option<usize>,

    /// Output root directory.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SampleManifestArgs {
    /// JSON map of `uid -> "glbs/<folder>/<uid>.glb"`.
    pub object_paths: PathBuf,

    /// Number of assets to sample.
    #[arg(long, short = 'n')]
    pub count: usize,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Manifest to write. Existing rows are kept and new uids appended.
    #[arg(long, short, default_value = "manifest.csv")]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct WhiteEnvArgs {
    #[arg(long, short, default_value = "env_maps/white_env_8k.exr")]
    pub output: PathBuf,

    #[arg(long, default_value_t = 8192)]
    pub width: u32,

    #[arg(long, default_value_t = 4096)]
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_overrides_parse() {
        let cli = Cli::parse_from(["relit", "render", "--seed", "7", "--group-end", "3", "-o", "out"]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.group_start, None);
        assert_eq!(args.group_end, Some(3));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.config, PathBuf::from("relit.toml"));
    }

    #[test]
    fn test_sample_manifest_requires_count() {
        assert!(Cli::try_parse_from(["relit", "sample-manifest", "paths.json"]).is_err());
        let cli = Cli::parse_from(["relit", "sample-manifest", "paths.json", "-n", "10"]);
        assert!(matches!(cli.command, Command::SampleManifest(ref a) if a.count == 10 && a.seed == 0));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
