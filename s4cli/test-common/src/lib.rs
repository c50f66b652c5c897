/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::{fs, io, io::Write};

use async_trait::async_trait;
use s4cli::error::{Error, ErrorKind};
use s4cli::logging::StatusLine;
use s4cli::storage::ObjectStore;
use tempfile::{tempdir, TempDir};

/// Create a directory structure rooted at `recursion_root`, containing files with sizes
/// specified in `files`
pub fn create_test_dir(recursion_root: Option<&str>, files: Vec<(&str, usize)>) -> TempDir {
    let temp_dir = match recursion_root {
        Some(root) => TempDir::with_prefix(root).unwrap(),
        None => tempdir().unwrap(),
    };

    for (path, size) in files {
        let full_path = temp_dir.path().join(path);
        let parent = full_path.parent().unwrap();

        fs::create_dir_all(parent).unwrap();

        let mut file = fs::File::create(&full_path).unwrap();
        file.write_all(&vec![0; size]).unwrap();
    }

    temp_dir
}

/// A call made against a [`RecordingStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `put_object(bucket, key, source)`
    Put {
        bucket: String,
        key: String,
        source: PathBuf,
    },
    /// `get_object(bucket, key, destination)`
    Get {
        bucket: String,
        key: String,
        destination: PathBuf,
    },
}

/// In-memory [`ObjectStore`] that records every call and can be told to fail specific keys
#[derive(Debug, Default)]
pub struct RecordingStore {
    calls: Mutex<Vec<StoreCall>>,
    failing_keys: HashSet<String>,
    objects: Vec<(String, Vec<u8>)>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `put_object`/`get_object` for `key` with [`ErrorKind::TransferFailed`]
    pub fn fail_key(mut self, key: impl Into<String>) -> Self {
        self.failing_keys.insert(key.into());
        self
    }

    /// Serve `data` for `key` from `get_object`
    pub fn with_object(mut self, key: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.objects.push((key.into(), data.into()));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Keys passed to `put_object`, in call order
    pub fn put_keys(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Put { key, .. } => Some(key),
                _ => None,
            })
            .collect()
    }

    fn check_key(&self, key: &str) -> Result<(), Error> {
        if self.failing_keys.contains(key) {
            return Err(Error::new(
                ErrorKind::TransferFailed,
                format!("injected failure for {key}"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put_object(&self, bucket: &str, key: &str, source: &Path) -> Result<u64, Error> {
        self.calls.lock().unwrap().push(StoreCall::Put {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            source: source.to_path_buf(),
        });
        self.check_key(key)?;
        Ok(fs::metadata(source)?.len())
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> Result<u64, Error> {
        self.calls.lock().unwrap().push(StoreCall::Get {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            destination: destination.to_path_buf(),
        });
        self.check_key(key)?;
        let (_, data) = self
            .objects
            .iter()
            .find(|(k, _)| k == key)
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("no such key {key}")))?;
        fs::write(destination, data)?;
        Ok(data.len() as u64)
    }
}

/// Build a config for `bucket` with throwaway credentials
pub fn test_config(bucket: &str) -> s4cli::Config {
    s4cli::Config::builder()
        .access_key_id("AKIDEXAMPLE")
        .secret_access_key("wJalrXUtnFEMI/K7MDENG")
        .bucket(bucket)
        .build()
        .unwrap()
}

/// A client backed by `store`
pub fn test_client(bucket: &str, store: Arc<RecordingStore>) -> s4cli::Client {
    s4cli::Client::with_store(test_config(bucket), store)
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` and return what it logged at `info` and above, rendered as the binary renders it
pub fn capture_status_lines(f: impl FnOnce()) -> String {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .event_format(StatusLine)
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buf.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}
