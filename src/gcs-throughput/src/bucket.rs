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

//! The bucket collaborators used by the benchmark runner.
//!
//! We stub out these interfaces, in order to test the pipeline without a
//! Cloud Storage bucket.

use crate::error::BoxError;
use google_cloud_storage::model::Object;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// The parameters to create a new object.
#[derive(Debug)]
pub struct CreateObjectRequest {
    /// The object name.
    pub name: String,
    /// The object contents, read from the current position to the end.
    pub contents: tokio::fs::File,
}

/// A handle to a bucket.
#[async_trait::async_trait]
pub trait Bucket: std::fmt::Debug + Send + Sync {
    /// Creates (or overwrites) an object using the contents in `request`.
    ///
    /// Implementations should stop the upload when `cancel` is cancelled.
    async fn create_object(
        &self,
        cancel: CancellationToken,
        request: CreateObjectRequest,
    ) -> Result<Object, BoxError>;
}

/// Creates authenticated bucket handles.
#[async_trait::async_trait]
pub trait BucketFactory: std::fmt::Debug + Send + Sync {
    type Bucket: Bucket;

    /// Returns a handle for `bucket_name`.
    ///
    /// When `key_file` is `None` the implementation uses its default
    /// credentials.
    async fn create_bucket(
        &self,
        bucket_name: String,
        key_file: Option<PathBuf>,
    ) -> Result<Self::Bucket, BoxError>;
}
