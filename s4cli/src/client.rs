/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::config::Config;
use crate::storage::{ObjectStore, S3Store};

/// Transfer client for a single bucket.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations: the run's configuration and the store to talk to
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: Config,
    pub(crate) store: Arc<dyn ObjectStore>,
}

impl Client {
    /// Creates a new client that talks to Amazon S3 using the static credentials in `config`.
    pub fn new(config: Config) -> Client {
        let store = Arc::new(S3Store::from_config(&config));
        Self::with_store(config, store)
    }

    /// Creates a new client on top of an explicit [`ObjectStore`].
    pub fn with_store(config: Config, store: Arc<dyn ObjectStore>) -> Client {
        let handle = Arc::new(Handle { config, store });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Upload a single local file.
    ///
    /// Constructs a fluent builder for the
    /// [`Upload`](crate::operation::upload::UploadFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// async fn upload_file(client: &s4cli::Client) -> Result<(), s4cli::error::Error> {
    ///     let output = client
    ///         .upload()
    ///         .source("/tmp/report.csv")
    ///         .key("reports/report.csv")
    ///         .send()
    ///         .await?;
    ///     println!("sent {} bytes", output.bytes_transferred());
    ///     Ok(())
    /// }
    /// ```
    pub fn upload(&self) -> crate::operation::upload::UploadFluentBuilder {
        crate::operation::upload::UploadFluentBuilder::new(self.handle.clone())
    }

    /// Download a single object to a local file that must not exist yet.
    ///
    /// Constructs a fluent builder for the
    /// [`Download`](crate::operation::download::DownloadFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// async fn download_file(client: &s4cli::Client) -> Result<(), s4cli::error::Error> {
    ///     client
    ///         .download()
    ///         .key("reports/report.csv")
    ///         .destination("/tmp/report.csv")
    ///         .send()
    ///         .await?;
    ///     Ok(())
    /// }
    /// ```
    pub fn download(&self) -> crate::operation::download::DownloadFluentBuilder {
        crate::operation::download::DownloadFluentBuilder::new(self.handle.clone())
    }

    /// Upload every regular file under a local directory, mirroring relative paths under a key
    /// prefix.
    ///
    /// Constructs a fluent builder for the
    /// [`Sync`](crate::operation::sync::SyncFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// async fn sync_dir(client: &s4cli::Client) -> Result<(), s4cli::error::Error> {
    ///     let output = client
    ///         .sync()
    ///         .source("/var/backups")
    ///         .key_prefix("backups")
    ///         .send()
    ///         .await?;
    ///
    ///     for failed in output.failed_transfers() {
    ///         eprintln!("{:?} failed: {}", failed.source(), failed.error());
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub fn sync(&self) -> crate::operation::sync::SyncFluentBuilder {
        crate::operation::sync::SyncFluentBuilder::new(self.handle.clone())
    }
}
