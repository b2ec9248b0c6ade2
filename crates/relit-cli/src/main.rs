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

//! The `relit` command line tool.

mod cli;
mod commands;
mod config;

use anyhow::{bail, Result};
use clap::Parser;
use cli::{Cli, Command};
use config::RunConfig;

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Render(args) => {
            let mut config = RunConfig::load(&args.config)?;
            config.apply(&args);
            let summary = commands::render::run(&config)?;
            if !summary.failures.is_empty() {
                for failure in &summary.failures {
                    log::error!("{}: {}", failure.scene_id, failure.message);
                }
                bail!("{} scene(s) failed", summary.failures.len());
            }
        }
        Command::SampleManifest(args) => {
            commands::manifest::run(&args)?;
        }
        Command::WhiteEnv(args) => commands::white_env::run(&args)?,
    }
    Ok(())
}
