/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::Path;

use crate::error;

/// Types for single object upload operation
pub mod upload;

/// Types for single object download operation
pub mod download;

/// Types for recursive directory upload operation
pub mod sync;

/// Delimiter used when deriving object keys from relative paths
pub(crate) const DEFAULT_DELIMITER: &str = "/";

/// Ensure `path` exists and is a regular file (symlinks are followed).
pub(crate) async fn validate_source_is_file(path: &Path) -> Result<(), error::Error> {
    match tokio::fs::metadata(path).await {
        Ok(md) if md.is_file() => Ok(()),
        Ok(_) => Err(error::not_found(format!(
            "{} is not a regular file",
            path.display()
        ))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(error::not_found(format!(
            "{} does not exist",
            path.display()
        ))),
        Err(err) => Err(err.into()),
    }
}

/// Ensure `path` exists and is a directory (symlinks are followed).
pub(crate) async fn validate_source_is_dir(path: &Path) -> Result<(), error::Error> {
    match tokio::fs::metadata(path).await {
        Ok(md) if md.is_dir() => Ok(()),
        Ok(_) => Err(error::not_found(format!(
            "{} is not a directory",
            path.display()
        ))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(error::not_found(format!(
            "{} does not exist",
            path.display()
        ))),
        Err(err) => Err(err.into()),
    }
}

/// Ensure nothing (not even a dangling symlink) exists at `path`.
pub(crate) async fn validate_destination_is_vacant(path: &Path) -> Result<(), error::Error> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(_) => Err(error::already_exists(format!(
            "{} already exists",
            path.display()
        ))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
