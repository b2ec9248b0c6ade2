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

//! `relit white-env`: the uniform environment used by `white_env_*` variants.

use crate::cli::WhiteEnvArgs;
use anyhow::{Context, Result};
use relit_io::images::write_white_env;

pub fn run(args: &WhiteEnvArgs) -> Result<()> {
    write_white_env(&args.output, args.width, args.height)
        .with_context(|| format!("Failed to write '{}'", args.output.display()))?;
    log::info!(
        "WhiteEnv: wrote {}x{} map to '{}'",
        args.width,
        args.height,
        args.output.display()
    );
    Ok(())
}
