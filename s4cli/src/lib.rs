/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! Simple Amazon S3 console client.
//!
//! Uploads a single file, downloads a single object, or syncs a local directory tree to a key
//! prefix, signing every request with a static access key and secret.
//!
//! # Examples
//!
//! Sync a directory:
//!
//! ```no_run
//! # async fn example() -> Result<(), s4cli::error::Error> {
//! let config = s4cli::Config::builder()
//!     .access_key_id("AKIDEXAMPLE")
//!     .secret_access_key("secret")
//!     .bucket("my-bucket")
//!     .build()?;
//! let client = s4cli::Client::new(config);
//!
//! let output = client
//!     .sync()
//!     .source("/tmp/site")
//!     .key_prefix("site/")
//!     .send()
//!     .await?;
//! println!("uploaded {} objects", output.objects_uploaded());
//! # Ok(())
//! # }
//! ```

/// Error types emitted by `s4cli`
pub mod error;

/// Common types used by `s4cli`
pub mod types;

/// Per invocation configuration
pub mod config;
pub use config::Config;

/// Object storage seam and its Amazon S3 implementation
pub mod storage;

/// Transfer client
pub mod client;
pub use client::Client;

/// Transfer operations
pub mod operation;

/// Command line parsing
pub mod cli;

/// Status line logging for the command line tool
pub mod logging;
