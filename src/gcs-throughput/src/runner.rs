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

//! The upload pipeline.
//!
//! The runner executes each step in order, and stops at the first error:
//!
//! 1. Create a bucket handle.
//! 2. Create an anonymous scratch file.
//! 3. Fill the file with `size` random bytes.
//! 4. Rewind the file.
//! 5. Upload the file contents as a new object.
//!
//! The scratch file is owned by [Runner::run], and released when the function
//! returns, on success and on error.

use crate::args::Args;
use crate::bucket::{Bucket, BucketFactory, CreateObjectRequest};
use crate::error::{BoxError, Cancelled, Error, Timeout};
use crate::scratch::{ScratchFiles, copy_random, rewind};
use google_cloud_storage::model::Object;
use rand::rngs::OsRng;
use tokio_util::sync::CancellationToken;

pub type Result<T> = std::result::Result<T, Error>;

/// Runs the upload benchmark.
#[derive(Debug)]
pub struct Runner<F, S> {
    buckets: F,
    scratch: S,
}

impl<F, S> Runner<F, S>
where
    F: BucketFactory,
    S: ScratchFiles,
{
    pub fn new(buckets: F, scratch: S) -> Self {
        Self { buckets, scratch }
    }

    /// Uploads `args.size` random bytes to `args.bucket`.
    ///
    /// The upload stops when `cancel` is cancelled, or when `args.timeout`
    /// elapses. Returns the metadata of the new object.
    pub async fn run(&self, args: &Args, cancel: CancellationToken) -> Result<Object> {
        let bucket = self
            .buckets
            .create_bucket(args.bucket.clone(), args.key_file.clone())
            .await
            .map_err(Error::CreateBucket)?;
        tracing::info!("bucket handle ready: {bucket:?}");

        let mut file = self
            .scratch
            .anonymous_file()
            .map_err(Error::AnonymousFile)?;

        tracing::info!("generating {} random bytes", args.size);
        let written = copy_random(&mut OsRng, &mut file, args.size)
            .await
            .map_err(Error::Copy)?;
        tracing::info!("random data ready: {written} bytes");

        rewind(&mut file).await.map_err(Error::Seek)?;

        let request = CreateObjectRequest {
            name: args.object_name.clone(),
            contents: file,
        };
        tracing::info!("uploading object {}", request.name);
        let object = upload(&bucket, request, args, cancel)
            .await
            .map_err(Error::CreateObject)?;
        tracing::info!("upload complete: {object:?}");
        Ok(object)
    }
}

async fn upload<B>(
    bucket: &B,
    request: CreateObjectRequest,
    args: &Args,
    cancel: CancellationToken,
) -> std::result::Result<Object, BoxError>
where
    B: Bucket,
{
    if cancel.is_cancelled() {
        return Err(Cancelled.into());
    }
    let future = bucket.create_object(cancel, request);
    let Some(duration) = args.timeout else {
        return future.await;
    };
    match tokio::time::timeout(duration, future).await {
        Err(_) => Err(Timeout(duration).into()),
        Ok(r) => r,
    }
}
