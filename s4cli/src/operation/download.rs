/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::client::Handle;
use crate::error;

use super::validate_destination_is_vacant;

/// Input for downloading a single object to a local file
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadInput {
    key: String,
    destination: PathBuf,
}

impl DownloadInput {
    /// Creates a new builder-style object to manufacture [`DownloadInput`]
    pub fn builder() -> DownloadInputBuilder {
        DownloadInputBuilder::default()
    }

    /// The object key to download
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The local file to create
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// Builder for [`DownloadInput`]
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct DownloadInputBuilder {
    pub(crate) key: Option<String>,
    pub(crate) destination: Option<PathBuf>,
}

impl DownloadInputBuilder {
    /// The object key to download.
    /// Required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// The local file to create. Must not exist yet.
    /// Required.
    pub fn destination(mut self, input: impl Into<PathBuf>) -> Self {
        self.destination = Some(input.into());
        self
    }

    /// Consumes the builder and constructs a [`DownloadInput`]
    pub fn build(self) -> Result<DownloadInput, error::Error> {
        Ok(DownloadInput {
            key: self
                .key
                .ok_or_else(|| error::invalid_input("key is required"))?,
            destination: self
                .destination
                .ok_or_else(|| error::invalid_input("destination is required"))?,
        })
    }
}

/// Fluent builder for constructing a single object download
#[derive(Debug)]
pub struct DownloadFluentBuilder {
    handle: Arc<Handle>,
    inner: DownloadInputBuilder,
}

impl DownloadFluentBuilder {
    pub(crate) fn new(handle: Arc<Handle>) -> Self {
        Self {
            handle,
            inner: DownloadInputBuilder::default(),
        }
    }

    /// The object key to download.
    /// Required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key(input);
        self
    }

    /// The local file to create. Must not exist yet.
    /// Required.
    pub fn destination(mut self, input: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.destination(input);
        self
    }

    /// Download the object and wait for the transfer to complete
    pub async fn send(self) -> Result<DownloadOutput, error::Error> {
        let input = self.inner.build()?;
        Download::orchestrate(&self.handle, input).await
    }
}

/// Output of a completed single object download
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct DownloadOutput {
    key: String,
    destination: PathBuf,
    bytes_transferred: u64,
}

impl DownloadOutput {
    /// The key that was downloaded
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The file the object was written to
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Number of bytes written
    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }
}

/// Operation struct for single object download
#[derive(Clone, Default, Debug)]
pub(crate) struct Download;

impl Download {
    /// Execute a single `Download` transfer operation
    ///
    /// Existing files are never overwritten; the store is not called when the destination is
    /// already present.
    pub(crate) async fn orchestrate(
        handle: &Handle,
        input: DownloadInput,
    ) -> Result<DownloadOutput, error::Error> {
        validate_destination_is_vacant(input.destination()).await?;

        tracing::info!(
            "Downloading {} -> {}",
            input.key(),
            input.destination().display()
        );
        let bytes_transferred = handle
            .store
            .get_object(handle.config.bucket(), input.key(), input.destination())
            .await?;

        Ok(DownloadOutput {
            key: input.key,
            destination: input.destination,
            bytes_transferred,
        })
    }
}
