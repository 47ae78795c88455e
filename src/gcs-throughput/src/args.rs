// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::bail;
use clap::Parser;
use humantime::parse_duration;
use std::path::PathBuf;
use std::time::Duration;

/// The default upload size, 64 MiB.
pub const DEFAULT_SIZE: u64 = 1 << 26;

/// The default object name.
///
/// Repeated runs overwrite the same object, so the bucket does not grow.
pub const DEFAULT_OBJECT_NAME: &str = "foo";

/// Configuration options for the benchmark.
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = super::DESCRIPTION)]
pub struct Args {
    /// The name of the bucket used by the benchmark.
    ///
    /// You should use a regional bucket in the same region as the VM running
    /// the benchmark.
    #[arg(long, default_value = "")]
    pub bucket: String,

    /// Path to a JSON service account key file.
    ///
    /// If not set, the benchmark uses Application Default Credentials.
    #[arg(long, alias = "key_file")]
    pub key_file: Option<PathBuf>,

    /// The number of random bytes to upload.
    ///
    /// Accepts plain numbers or sizes such as `64MiB` and `1GB`.
    #[arg(long, default_value_t = DEFAULT_SIZE, value_parser = parse_size_arg)]
    pub size: u64,

    /// The name of the uploaded object.
    #[arg(long, default_value = DEFAULT_OBJECT_NAME)]
    pub object_name: String,

    /// The directory for the scratch file.
    ///
    /// If not set, the scratch file is created in the system's temporary
    /// directory.
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// The deadline for the upload, e.g. `30s` or `5m`.
    ///
    /// If not set, the upload runs until it completes or fails.
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            key_file: None,
            size: DEFAULT_SIZE,
            object_name: DEFAULT_OBJECT_NAME.to_string(),
            scratch_dir: None,
            timeout: None,
        }
    }
}

impl Args {
    /// Validates the arguments after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bucket.is_empty() {
            bail!("missing bucket name, use --bucket to set it")
        }
        if self.size == 0 {
            bail!("invalid size, must be greater than zero")
        }
        if self.object_name.is_empty() {
            bail!("invalid object name, must not be empty")
        }
        Ok(())
    }
}

fn parse_size_arg(arg: &str) -> anyhow::Result<u64> {
    let value = parse_size::parse_size(arg)?;
    Ok(value)
}
