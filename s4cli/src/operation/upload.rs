/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::client::Handle;
use crate::error;

use super::validate_source_is_file;

/// Input for uploading a single local file
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct UploadInput {
    pub(crate) source: PathBuf,
    pub(crate) key: String,
}

impl UploadInput {
    /// Creates a new builder-style object to manufacture [`UploadInput`]
    pub fn builder() -> UploadInputBuilder {
        UploadInputBuilder::default()
    }

    /// The local file to upload
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The object key to upload to
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Builder for [`UploadInput`]
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct UploadInputBuilder {
    pub(crate) source: Option<PathBuf>,
    pub(crate) key: Option<String>,
}

impl UploadInputBuilder {
    /// The local file to upload.
    /// Required.
    pub fn source(mut self, input: impl Into<PathBuf>) -> Self {
        self.source = Some(input.into());
        self
    }

    /// The object key to upload to.
    /// Required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// Consumes the builder and constructs an [`UploadInput`]
    pub fn build(self) -> Result<UploadInput, error::Error> {
        Ok(UploadInput {
            source: self
                .source
                .ok_or_else(|| error::invalid_input("source is required"))?,
            key: self
                .key
                .ok_or_else(|| error::invalid_input("key is required"))?,
        })
    }
}

/// Fluent builder for constructing a single file upload
#[derive(Debug)]
pub struct UploadFluentBuilder {
    handle: Arc<Handle>,
    inner: UploadInputBuilder,
}

impl UploadFluentBuilder {
    pub(crate) fn new(handle: Arc<Handle>) -> Self {
        Self {
            handle,
            inner: UploadInputBuilder::default(),
        }
    }

    /// The local file to upload.
    /// Required.
    pub fn source(mut self, input: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.source(input);
        self
    }

    /// The object key to upload to.
    /// Required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key(input);
        self
    }

    /// Upload the file and wait for the transfer to complete
    pub async fn send(self) -> Result<UploadOutput, error::Error> {
        let input = self.inner.build()?;
        Upload::orchestrate(&self.handle, input).await
    }
}

/// Output of a completed single file upload
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct UploadOutput {
    key: String,
    bytes_transferred: u64,
}

impl UploadOutput {
    /// The key the object was stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of bytes sent
    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }
}

/// Operation struct for single file upload
#[derive(Clone, Default, Debug)]
pub(crate) struct Upload;

impl Upload {
    /// Execute a single `Upload` transfer operation
    ///
    /// The store is not called when the source file is missing.
    pub(crate) async fn orchestrate(
        handle: &Handle,
        input: UploadInput,
    ) -> Result<UploadOutput, error::Error> {
        validate_source_is_file(input.source()).await?;

        tracing::info!("Uploading {} -> {}", input.source().display(), input.key());
        let bytes_transferred = handle
            .store
            .put_object(handle.config.bucket(), input.key(), input.source())
            .await?;

        Ok(UploadOutput {
            key: input.key,
            bytes_transferred,
        })
    }
}
