/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use crate::error;

/// Region used when none is given on the command line
pub const DEFAULT_REGION: &str = "us-east-1";

/// Configuration for a [`Client`](crate::client::Client)
///
/// Built once per invocation and never mutated afterwards.
#[derive(Clone)]
pub struct Config {
    access_key_id: String,
    secret_access_key: String,
    region: String,
    bucket: String,
    follow_symlinks: bool,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Access key ID used to sign requests
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret access key used to sign requests
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Region the bucket lives in
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Bucket every operation targets
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Whether sync descends through symbolic links
    pub fn follow_symlinks(&self) -> bool {
        self.follow_symlinks
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("follow_symlinks", &self.follow_symlinks)
            .finish()
    }
}

/// Fluent style builder for [Config]
#[derive(Clone)]
pub struct Builder {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    region: Option<String>,
    bucket: Option<String>,
    follow_symlinks: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            region: None,
            bucket: None,
            follow_symlinks: true,
        }
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("access_key_id", &self.access_key_id)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("follow_symlinks", &self.follow_symlinks)
            .finish_non_exhaustive()
    }
}

impl Builder {
    /// Access key ID of the static credential pair.
    /// Required.
    pub fn access_key_id(mut self, input: impl Into<String>) -> Self {
        self.access_key_id = Some(input.into());
        self
    }

    /// Secret access key of the static credential pair.
    /// Required.
    pub fn secret_access_key(mut self, input: impl Into<String>) -> Self {
        self.secret_access_key = Some(input.into());
        self
    }

    /// Region identifier, e.g. `us-east-1`.
    ///
    /// Default is [`DEFAULT_REGION`].
    pub fn region(self, input: impl Into<String>) -> Self {
        self.set_region(Some(input.into()))
    }

    /// Region identifier. `None` falls back to [`DEFAULT_REGION`].
    pub fn set_region(mut self, input: Option<String>) -> Self {
        self.region = input;
        self
    }

    /// Bucket name.
    /// Required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// Whether to follow symbolic links when walking a directory during sync.
    ///
    /// Symlink cycles are detected and skipped either way.
    /// Default is `true`.
    pub fn follow_symlinks(mut self, input: bool) -> Self {
        self.follow_symlinks = input;
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    pub fn build(self) -> Result<Config, error::Error> {
        Ok(Config {
            access_key_id: self
                .access_key_id
                .ok_or_else(|| error::invalid_input("access key ID is required"))?,
            secret_access_key: self
                .secret_access_key
                .ok_or_else(|| error::invalid_input("secret access key is required"))?,
            region: self.region.unwrap_or_else(|| DEFAULT_REGION.to_owned()),
            bucket: self
                .bucket
                .ok_or_else(|| error::invalid_input("bucket is required"))?,
            follow_symlinks: self.follow_symlinks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn builder() -> Builder {
        Config::builder()
            .access_key_id("AKIDEXAMPLE")
            .secret_access_key("wJalrXUtnFEMI")
            .bucket("test-bucket")
    }

    #[test]
    fn test_region_defaults_when_omitted() {
        let config = builder().build().unwrap();
        assert_eq!(DEFAULT_REGION, config.region());
        assert!(config.follow_symlinks());

        let config = builder().region("eu-west-1").build().unwrap();
        assert_eq!("eu-west-1", config.region());
    }

    #[test]
    fn test_missing_bucket_is_invalid_input() {
        let err = Config::builder()
            .access_key_id("AKIDEXAMPLE")
            .secret_access_key("wJalrXUtnFEMI")
            .build()
            .unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = builder().build().unwrap();
        let rendered = format!("{config:?}");
        assert!(rendered.contains("AKIDEXAMPLE"));
        assert!(!rendered.contains("wJalrXUtnFEMI"));
    }
}
