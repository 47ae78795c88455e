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

//! Errors returned by the upload pipeline.
//!
//! Each variant identifies the step that failed. The display format is
//! `<step>: <cause>`, so the step is always the first thing in the message
//! printed by the benchmark.

use std::time::Duration;

/// The error type used by the bucket and bucket factory seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failure in one of the pipeline steps.
///
/// None of these errors is retried. The benchmark reports the first failure
/// and exits.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Cannot create the bucket handle, typically a credentials problem.
    #[error("createBucket: {0}")]
    CreateBucket(#[source] BoxError),

    /// Cannot create the scratch file.
    #[error("AnonymousFile: {0}")]
    AnonymousFile(#[source] std::io::Error),

    /// Cannot fill the scratch file with random data.
    #[error("Copy: {0}")]
    Copy(#[source] std::io::Error),

    /// Cannot rewind the scratch file.
    #[error("Seek: {0}")]
    Seek(#[source] std::io::Error),

    /// The upload failed, was cancelled, or exceeded its deadline.
    #[error("CreateObject: {0}")]
    CreateObject(#[source] BoxError),
}

impl Error {
    /// A short name for the failed step.
    pub fn step(&self) -> &'static str {
        match self {
            Self::CreateBucket(_) => "createBucket",
            Self::AnonymousFile(_) => "AnonymousFile",
            Self::Copy(_) => "Copy",
            Self::Seek(_) => "Seek",
            Self::CreateObject(_) => "CreateObject",
        }
    }
}

/// The upload was cancelled before it completed.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("the upload was cancelled")]
pub struct Cancelled;

/// The upload did not complete before the deadline.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("the upload did not complete in {0:?}")]
pub struct Timeout(pub Duration);
