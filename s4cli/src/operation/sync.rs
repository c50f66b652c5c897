/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use aws_sdk_s3::error::DisplayErrorContext;
use walkdir::WalkDir;

use crate::client::Handle;
use crate::error::{self, DisplayErrorChain};
use crate::types::FailedUpload;

use super::upload::{Upload, UploadInput};
use super::{validate_source_is_dir, DEFAULT_DELIMITER};

/// Input for uploading a local directory tree under a key prefix
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct SyncInput {
    source: PathBuf,
    key_prefix: String,
}

impl SyncInput {
    /// Creates a new builder-style object to manufacture [`SyncInput`]
    pub fn builder() -> SyncInputBuilder {
        SyncInputBuilder::default()
    }

    /// The local directory to upload from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The key prefix objects are uploaded under, always delimiter terminated unless empty
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }
}

/// Builder for [`SyncInput`]
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct SyncInputBuilder {
    pub(crate) source: Option<PathBuf>,
    pub(crate) key_prefix: Option<String>,
}

impl SyncInputBuilder {
    /// The local directory to upload from.
    /// Required.
    pub fn source(mut self, input: impl Into<PathBuf>) -> Self {
        self.source = Some(input.into());
        self
    }

    /// The key prefix to upload under. A trailing `/` is appended when missing.
    ///
    /// Defaults to the bucket root. An empty prefix also means the bucket root and is left
    /// empty, since suffixing it would start every key with `/`.
    pub fn key_prefix(mut self, input: impl Into<String>) -> Self {
        self.key_prefix = Some(input.into());
        self
    }

    /// Consumes the builder and constructs a [`SyncInput`]
    pub fn build(self) -> Result<SyncInput, error::Error> {
        let source = self
            .source
            .ok_or_else(|| error::invalid_input("source is required"))?;
        let key_prefix = self.key_prefix.unwrap_or_default();
        let key_prefix = normalize_key_prefix(&key_prefix).into_owned();
        Ok(SyncInput { source, key_prefix })
    }
}

/// Fluent builder for constructing a recursive directory upload
#[derive(Debug)]
pub struct SyncFluentBuilder {
    handle: Arc<Handle>,
    inner: SyncInputBuilder,
}

impl SyncFluentBuilder {
    pub(crate) fn new(handle: Arc<Handle>) -> Self {
        Self {
            handle,
            inner: SyncInputBuilder::default(),
        }
    }

    /// The local directory to upload from.
    /// Required.
    pub fn source(mut self, input: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.source(input);
        self
    }

    /// The key prefix to upload under. A trailing `/` is appended when missing.
    ///
    /// An empty prefix uploads to the bucket root.
    pub fn key_prefix(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key_prefix(input);
        self
    }

    /// Walk the directory and upload every regular file, one at a time
    #[tracing::instrument(skip_all, level = "debug", name = "sync", fields(
        bucket = self.handle.config.bucket(),
        key_prefix = self.inner.key_prefix.as_deref().unwrap_or_default(),
    ))]
    pub async fn send(self) -> Result<SyncOutput, error::Error> {
        let input = self.inner.build()?;
        SyncDirectory::orchestrate(&self.handle, input).await
    }
}

/// Output of a recursive directory upload
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct SyncOutput {
    objects_uploaded: u64,
    total_bytes_transferred: u64,
    failed_transfers: Vec<FailedUpload>,
}

impl SyncOutput {
    /// The number of objects successfully uploaded
    pub fn objects_uploaded(&self) -> u64 {
        self.objects_uploaded
    }

    /// Total bytes sent across every successful upload
    pub fn total_bytes_transferred(&self) -> u64 {
        self.total_bytes_transferred
    }

    /// Every file (or directory entry) that could not be uploaded
    pub fn failed_transfers(&self) -> &[FailedUpload] {
        &self.failed_transfers
    }
}

/// Operation struct for recursive directory upload
#[derive(Clone, Default, Debug)]
pub(crate) struct SyncDirectory;

impl SyncDirectory {
    /// Execute a single `Sync` transfer operation.
    ///
    /// Only a missing root directory fails the whole operation. Failures of individual entries
    /// are logged, collected into the output, and the walk moves on.
    pub(crate) async fn orchestrate(
        handle: &Handle,
        input: SyncInput,
    ) -> Result<SyncOutput, error::Error> {
        validate_source_is_dir(input.source()).await?;

        let mut output = SyncOutput::default();
        for entry in walker(input.source(), handle.config.follow_symlinks()) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let source = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| input.source().to_path_buf());
                    record_failure(&mut output, source, None, err.into());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                if entry.path_is_symlink() && !entry.file_type().is_dir() {
                    tracing::debug!("skipping symbolic link {:?}", entry.path());
                }
                continue;
            }

            let key = match derive_object_key(input.source(), entry.path(), input.key_prefix()) {
                Ok(key) => key,
                Err(err) => {
                    record_failure(&mut output, entry.into_path(), None, err);
                    continue;
                }
            };

            let upload = UploadInput {
                source: entry.path().to_path_buf(),
                key: key.clone(),
            };
            match Upload::orchestrate(handle, upload).await {
                Ok(uploaded) => {
                    output.objects_uploaded += 1;
                    output.total_bytes_transferred += uploaded.bytes_transferred();
                }
                Err(err) => record_failure(&mut output, entry.into_path(), Some(key), err),
            }
        }

        Ok(output)
    }
}

fn record_failure(
    output: &mut SyncOutput,
    source: PathBuf,
    key: Option<String>,
    error: error::Error,
) {
    tracing::error!("{}: {}", source.display(), DisplayErrorChain(&error));
    tracing::debug!("{}: {}", source.display(), DisplayErrorContext(&error));
    output.failed_transfers.push(FailedUpload { source, key, error });
}

/// Depth-first walk in file name order.
///
/// `walkdir` keeps track of the ancestors of every directory it descends into, so following
/// symlinks can't loop forever: a link back to an ancestor is yielded as an error instead.
fn walker(root: &Path, follow_symlinks: bool) -> WalkDir {
    WalkDir::new(root)
        .follow_links(follow_symlinks)
        .sort_by_file_name()
}

/// Append the delimiter to a non-empty prefix that doesn't already end with one.
pub(crate) fn normalize_key_prefix(prefix: &str) -> Cow<'_, str> {
    if prefix.is_empty() || prefix.ends_with(DEFAULT_DELIMITER) {
        Cow::Borrowed(prefix)
    } else {
        Cow::Owned(format!("{prefix}{DEFAULT_DELIMITER}"))
    }
}

/// Map `path` (somewhere under `root`) to its object key under `key_prefix`.
///
/// Path components are joined with `/` regardless of the platform separator, so
/// `/a/b` + `up/` + `/a/b/c/d.txt` gives `up/c/d.txt`.
pub fn derive_object_key(
    root: &Path,
    path: &Path,
    key_prefix: &str,
) -> Result<String, error::Error> {
    let relative = path.strip_prefix(root).map_err(|_| {
        error::invalid_input(format!(
            "{} should be a path directly or indirectly under {}",
            path.display(),
            root.display()
        ))
    })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    error::invalid_input(format!("{} is not valid UTF-8", path.display()))
                })?;
                parts.push(part);
            }
            Component::CurDir => {}
            _ => {
                return Err(error::invalid_input(format!(
                    "{} cannot be mapped to an object key",
                    path.display()
                )))
            }
        }
    }

    if parts.is_empty() {
        return Err(error::invalid_input(format!(
            "{} has no path relative to {}",
            path.display(),
            root.display()
        )));
    }

    let relative = parts.join(DEFAULT_DELIMITER);
    let relative = relative.trim_start_matches(DEFAULT_DELIMITER);
    Ok(format!("{key_prefix}{relative}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_normalize_key_prefix() {
        assert_eq!("up/", normalize_key_prefix("up"));
        assert_eq!("up/", normalize_key_prefix("up/"));
        assert_eq!("a/b/", normalize_key_prefix("a/b"));
        assert_eq!("", normalize_key_prefix(""));
        assert!(matches!(normalize_key_prefix("up/"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_input_normalizes_prefix() {
        let input = SyncInput::builder()
            .source("/tmp/dir")
            .key_prefix("uploads")
            .build()
            .unwrap();
        assert_eq!("uploads/", input.key_prefix());

        let input = SyncInput::builder().source("/tmp/dir").build().unwrap();
        assert_eq!("", input.key_prefix());
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn test_derive_object_key() {
        let root = Path::new("/a/b");
        let cases = [
            ("/a/b/c/d.txt", "up/", "up/c/d.txt"),
            ("/a/b/d.txt", "up/", "up/d.txt"),
            ("/a/b/c/e/f/g.txt", "backups/2023/", "backups/2023/c/e/f/g.txt"),
            ("/a/b/c/d.txt", "", "c/d.txt"),
            ("/a/b/with space.txt", "up/", "up/with space.txt"),
        ];

        for (path, prefix, expected) in cases {
            let actual = derive_object_key(root, Path::new(path), prefix).unwrap();
            assert_eq!(expected, actual, "path={path} prefix={prefix}");
        }
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn test_derive_object_key_trailing_slash_on_root() {
        let actual =
            derive_object_key(Path::new("/a/b/"), Path::new("/a/b/c/d.txt"), "up/").unwrap();
        assert_eq!("up/c/d.txt", actual);
    }

    #[cfg(target_family = "windows")]
    #[test]
    fn test_derive_object_key_normalizes_separator() {
        let actual = derive_object_key(
            Path::new(r"C:\a\b"),
            Path::new(r"C:\a\b\c\d.txt"),
            "up/",
        )
        .unwrap();
        assert_eq!("up/c/d.txt", actual);
    }

    #[test]
    fn test_derive_object_key_outside_root() {
        let err = derive_object_key(Path::new("/a/b"), Path::new("/x/y.txt"), "up/").unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn test_derive_object_key_non_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = Path::new("/a/b");
        let path = root.join(OsStr::from_bytes(b"bad\xffname"));
        let err = derive_object_key(root, &path, "up/").unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());
    }
}
