/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::error;

/// The object storage capabilities the transfer operations rely on.
///
/// Implementations own retries, signing and streaming. Each call transfers exactly one object
/// and returns the number of bytes moved.
#[async_trait]
pub trait ObjectStore: Send + Sync + Debug {
    /// Upload the file at `source` to `bucket` under `key`.
    async fn put_object(&self, bucket: &str, key: &str, source: &Path)
        -> Result<u64, error::Error>;

    /// Download `key` from `bucket` into a new file at `destination`.
    ///
    /// Must never overwrite an existing file.
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> Result<u64, error::Error>;
}

/// [`ObjectStore`] backed by the Amazon S3 SDK client
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    /// Wrap an existing S3 client
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Build an S3 client that signs with the static credentials in `config`
    pub fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            config.access_key_id(),
            config.secret_access_key(),
            None,
            None,
            "s4cli-static",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region().to_owned()))
            .credentials_provider(credentials)
            .build();

        Self::new(aws_sdk_s3::Client::from_conf(s3_config))
    }

    /// The underlying SDK client
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
    ) -> Result<u64, error::Error> {
        let body = ByteStream::from_path(source).await?;
        let (lower, upper) = body.size_hint();
        let content_length = upper.unwrap_or(lower);

        let resp = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await?;

        tracing::debug!(e_tag = ?resp.e_tag(), "put object {key} complete");
        Ok(content_length)
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> Result<u64, error::Error> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let dest = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .await?;

        match write_body(resp.body, dest).await {
            Ok(written) => Ok(written),
            Err(err) => {
                // don't leave a truncated object behind, it would block the next attempt
                if let Err(rm_err) = fs::remove_file(destination).await {
                    tracing::debug!("failed to remove partial download {destination:?}: {rm_err}");
                }
                Err(err)
            }
        }
    }
}

async fn write_body(mut body: ByteStream, mut dest: fs::File) -> Result<u64, error::Error> {
    let mut written = 0u64;
    while let Some(chunk) = body.try_next().await? {
        tracing::trace!("recv'd chunk size={}", chunk.len());
        dest.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    dest.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use aws_sdk_s3::operation::get_object::GetObjectOutput;
    use aws_sdk_s3::operation::put_object::PutObjectOutput;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
    use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
    use aws_smithy_runtime_api::http::StatusCode;
    use aws_smithy_types::body::SdkBody;

    const NO_SUCH_KEY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
  <Code>NoSuchKey</Code>
  <Message>The specified key does not exist.</Message>
  <Key>missing</Key>
  <RequestId>4442587FB7D0A2F9</RequestId>
</Error>"#;

    fn no_such_key_http_resp() -> HttpResponse {
        HttpResponse::new(
            StatusCode::try_from(404).unwrap(),
            SdkBody::from(NO_SUCH_KEY),
        )
    }

    #[test]
    fn test_from_config_uses_region() {
        let config = Config::builder()
            .access_key_id("AKIDEXAMPLE")
            .secret_access_key("secret")
            .bucket("test-bucket")
            .region("ap-southeast-2")
            .build()
            .unwrap();
        let store = S3Store::from_config(&config);
        assert_eq!(
            Some("ap-southeast-2"),
            store.client().config().region().map(|r| r.as_ref())
        );
    }

    #[tokio::test]
    async fn test_put_object_sends_bucket_and_key() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("file.txt");
        std::fs::write(&source, b"every adolescent dog goes bonkers early").unwrap();

        let put_object = mock!(aws_sdk_s3::Client::put_object)
            .match_requests(|r| {
                r.bucket() == Some("test-bucket") && r.key() == Some("up/file.txt")
            })
            .then_output(|| PutObjectOutput::builder().e_tag("test-etag").build());
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put_object]);

        let store = S3Store::new(client);
        let sent = store
            .put_object("test-bucket", "up/file.txt", &source)
            .await
            .unwrap();
        assert_eq!(39, sent);
    }

    #[tokio::test]
    async fn test_get_object_writes_body_to_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested/out.txt");

        let get_object = mock!(aws_sdk_s3::Client::get_object)
            .match_requests(|r| r.bucket() == Some("test-bucket") && r.key() == Some("k"))
            .then_output(|| {
                GetObjectOutput::builder()
                    .content_length(5)
                    .body(ByteStream::from_static(b"hello"))
                    .build()
            });
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&get_object]);

        let store = S3Store::new(client);
        let received = store.get_object("test-bucket", "k", &dest).await.unwrap();
        assert_eq!(5, received);
        assert_eq!(b"hello".to_vec(), std::fs::read(&dest).unwrap());
    }

    #[tokio::test]
    async fn test_get_object_missing_key_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.txt");

        let get_object = mock!(aws_sdk_s3::Client::get_object)
            .match_requests(|r| r.key() == Some("missing"))
            .then_http_response(no_such_key_http_resp);
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&get_object]);

        let store = S3Store::new(client);
        let err = store
            .get_object("test-bucket", "missing", &dest)
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::NotFound, err.kind());
        assert!(err.to_string().contains("not found"));
        assert!(!dest.exists());
    }
}
