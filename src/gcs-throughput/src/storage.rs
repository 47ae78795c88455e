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

//! Implements the bucket seams using the Cloud Storage client library.

use crate::bucket::{Bucket, BucketFactory, CreateObjectRequest};
use crate::error::{BoxError, Cancelled};
use google_cloud_auth::credentials::{
    Builder as CredentialsBuilder, Credentials, service_account::Builder as ServiceAccountBuilder,
};
use google_cloud_storage::client::Storage;
use google_cloud_storage::model::Object;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

const BUCKET_PREFIX: &str = "projects/_/buckets/";

/// Creates [StorageBucket] handles.
#[derive(Clone, Debug, Default)]
pub struct StorageBuckets;

#[async_trait::async_trait]
impl BucketFactory for StorageBuckets {
    type Bucket = StorageBucket;

    async fn create_bucket(
        &self,
        bucket_name: String,
        key_file: Option<PathBuf>,
    ) -> Result<StorageBucket, BoxError> {
        if bucket_name.is_empty() || bucket_name == BUCKET_PREFIX {
            return Err(InvalidBucketName(bucket_name).into());
        }
        let credentials = load_credentials(key_file.as_deref()).await?;
        let client = Storage::builder()
            .with_credentials(credentials)
            .build()
            .await?;
        Ok(StorageBucket {
            client,
            bucket: bucket_path(&bucket_name),
        })
    }
}

/// A Cloud Storage bucket.
#[derive(Clone, Debug)]
pub struct StorageBucket {
    client: Storage,
    bucket: String,
}

#[async_trait::async_trait]
impl Bucket for StorageBucket {
    async fn create_object(
        &self,
        cancel: CancellationToken,
        request: CreateObjectRequest,
    ) -> Result<Object, BoxError> {
        // The file is seekable, so the client can restart the upload from any
        // persisted offset without buffering the data.
        let upload = self
            .client
            .write_object(&self.bucket, request.name, request.contents)
            .send_unbuffered();
        tokio::select! {
            _ = cancel.cancelled() => Err(Cancelled.into()),
            result = upload => Ok(result?),
        }
    }
}

/// The bucket name is empty or incomplete.
#[derive(thiserror::Error, Debug)]
#[error("invalid bucket name {0:?}")]
struct InvalidBucketName(String);

/// The key file cannot be loaded.
#[derive(thiserror::Error, Debug)]
#[error("cannot load key file {path:?}: {source}")]
struct KeyFileError {
    path: PathBuf,
    #[source]
    source: BoxError,
}

impl KeyFileError {
    fn new<E>(path: &Path, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

async fn load_credentials(key_file: Option<&Path>) -> Result<Credentials, BoxError> {
    let Some(path) = key_file else {
        tracing::info!("using Application Default Credentials");
        return Ok(CredentialsBuilder::default().build()?);
    };
    tracing::info!("using service account key file {}", path.display());
    let contents = tokio::fs::read(path)
        .await
        .map_err(|e| KeyFileError::new(path, e))?;
    let json = serde_json::from_slice::<serde_json::Value>(&contents)
        .map_err(|e| KeyFileError::new(path, e))?;
    let credentials = ServiceAccountBuilder::new(json)
        .build()
        .map_err(|e| KeyFileError::new(path, e))?;
    Ok(credentials)
}

/// Returns the bucket name in the format used by the client library.
fn bucket_path(bucket_name: &str) -> String {
    if bucket_name.starts_with(BUCKET_PREFIX) {
        return bucket_name.to_string();
    }
    format!("{BUCKET_PREFIX}{bucket_name}")
}
