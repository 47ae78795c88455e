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

//! Measure the upload throughput of Cloud Storage.

mod args;
mod bucket;
mod error;
mod runner;
mod scratch;
mod storage;

use args::Args;
use clap::Parser;
use runner::Runner;
use scratch::AnonymousFiles;
use storage::StorageBuckets;
use tokio_util::sync::CancellationToken;

const DESCRIPTION: &str = concat!(
    "This benchmark uploads a single object filled with random data to a",
    " Cloud Storage bucket. The data is first written to an anonymous",
    " temporary file, and then uploaded from that file.",
    " The benchmark does not compute any statistics, measure the elapsed",
    " time externally, e.g. using `time(1)`.",
    " Repeated runs overwrite the same object."
);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    args.validate()?;
    enable_tracing()?;
    tracing::info!("Configuration: {args:?}");

    let runner = Runner::new(StorageBuckets, AnonymousFiles::new(args.scratch_dir.clone()));
    let object = runner
        .run(&args, CancellationToken::new())
        .await
        .inspect_err(|e| tracing::error!(step = e.step(), "{e}"))?;
    tracing::info!(
        "DONE: bucket={} object={} generation={} size={}",
        object.bucket,
        object.name,
        object.generation,
        object.size
    );

    Ok(())
}

fn enable_tracing() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_level(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
