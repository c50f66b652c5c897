/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};

/// Detailed information about a failed upload during a sync
#[non_exhaustive]
#[derive(Debug)]
pub struct FailedUpload {
    pub(crate) source: PathBuf,
    pub(crate) key: Option<String>,
    pub(crate) error: crate::error::Error,
}

impl FailedUpload {
    /// The local file or directory entry that failed
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The object key, when one could be derived before the failure
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The error encountered uploading the object
    pub fn error(&self) -> &crate::error::Error {
        &self.error
    }
}
