/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_sdk_s3::error::ProvideErrorMetadata;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: Use [`DisplayErrorChain`] for a one line message, or
/// [`aws_sdk_s3::error::DisplayErrorContext`] to include debug detail of the whole chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// General categories of transfer errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Command line or operation input validation issues
    InputInvalid,

    /// Local source file/directory or remote object/bucket does not exist
    NotFound,

    /// Download destination already exists locally
    AlreadyExists,

    /// The service rejected the supplied credentials
    AccessDenied,

    /// Local I/O errors
    IOError,

    /// Any other failure surfaced by the storage client
    TransferFailed,
}

impl Error {
    /// Creates a new transfer [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::NotFound => write!(f, "resource not found"),
            ErrorKind::AlreadyExists => write!(f, "resource already exists"),
            ErrorKind::AccessDenied => write!(f, "access denied"),
            ErrorKind::IOError => write!(f, "I/O error"),
            ErrorKind::TransferFailed => write!(f, "transfer failed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        let kind = match value.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists,
            _ => ErrorKind::IOError,
        };
        Self::new(kind, value)
    }
}

impl From<walkdir::Error> for Error {
    fn from(value: walkdir::Error) -> Self {
        // a loop is a property of the tree being walked, not an I/O failure
        let kind = if value.loop_ancestor().is_some() {
            ErrorKind::InputInvalid
        } else {
            ErrorKind::IOError
        };
        Self::new(kind, value)
    }
}

impl From<aws_smithy_types::byte_stream::error::Error> for Error {
    fn from(value: aws_smithy_types::byte_stream::error::Error) -> Self {
        Self::new(ErrorKind::TransferFailed, value)
    }
}

impl<E, R> From<aws_sdk_s3::error::SdkError<E, R>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: Send + Sync + fmt::Debug + 'static,
{
    fn from(value: aws_sdk_s3::error::SdkError<E, R>) -> Self {
        let kind = match value.code() {
            Some("NotFound" | "NoSuchKey" | "NoSuchBucket") => ErrorKind::NotFound,
            Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch") => {
                ErrorKind::AccessDenied
            }
            _ => ErrorKind::TransferFailed,
        };

        Error::new(kind, value)
    }
}

/// Displays an error followed by each of its sources, separated by `: `.
///
/// Unlike [`aws_sdk_s3::error::DisplayErrorContext`] this never appends the `Debug` form, so it
/// fits on a status line.
#[derive(Debug)]
pub struct DisplayErrorChain<'a, E>(pub &'a E);

impl<E> fmt::Display for DisplayErrorChain<'_, E>
where
    E: std::error::Error,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {err}")?;
            source = err.source();
        }
        Ok(())
    }
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

pub(crate) fn not_found<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::NotFound, err)
}

pub(crate) fn already_exists<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::AlreadyExists, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::error::{DisplayErrorContext, ErrorMetadata, SdkError};
    use aws_sdk_s3::operation::get_object::GetObjectError;
    use aws_sdk_s3::operation::put_object::PutObjectError;
    use aws_smithy_runtime_api::http::{Response, StatusCode};
    use aws_smithy_types::body::SdkBody;

    fn service_error<E>(err: E) -> SdkError<E, Response> {
        let raw = Response::new(StatusCode::try_from(400).unwrap(), SdkBody::empty());
        SdkError::service_error(err, raw)
    }

    #[test]
    fn test_sdk_error_no_such_key_is_not_found() {
        let err = service_error(GetObjectError::generic(
            ErrorMetadata::builder().code("NoSuchKey").build(),
        ));
        assert_eq!(&ErrorKind::NotFound, Error::from(err).kind());
    }

    #[test]
    fn test_sdk_error_access_denied() {
        let err = service_error(PutObjectError::generic(
            ErrorMetadata::builder()
                .code("AccessDenied")
                .message("Access Denied")
                .build(),
        ));
        let err = Error::from(err);
        assert_eq!(&ErrorKind::AccessDenied, err.kind());
        assert!(format!("{}", DisplayErrorContext(&err)).contains("AccessDenied"));
    }

    #[test]
    fn test_sdk_error_other_codes_are_transfer_failures() {
        let err = service_error(PutObjectError::generic(
            ErrorMetadata::builder().code("SlowDown").build(),
        ));
        assert_eq!(&ErrorKind::TransferFailed, Error::from(err).kind());
    }

    #[test]
    fn test_display_error_chain_is_plain() {
        let err = not_found("/nonexist does not exist");
        let rendered = DisplayErrorChain(&err).to_string();
        assert_eq!("resource not found: /nonexist does not exist", rendered);

        let io = Error::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "permission denied",
        ));
        assert_eq!(
            "I/O error: permission denied",
            DisplayErrorChain(&io).to_string()
        );
    }

    #[test]
    fn test_io_error_kinds() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(&ErrorKind::NotFound, Error::from(missing).kind());

        let exists = std::io::Error::new(std::io::ErrorKind::AlreadyExists, "there");
        assert_eq!(&ErrorKind::AlreadyExists, Error::from(exists).kind());

        let other = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(&ErrorKind::IOError, Error::from(other).kind());
    }
}
