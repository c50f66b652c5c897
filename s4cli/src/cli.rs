/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::client::Client;
use crate::config::{Config, DEFAULT_REGION};
use crate::error;
use crate::operation::download::DownloadOutput;
use crate::operation::sync::SyncOutput;
use crate::operation::upload::UploadOutput;

/// Usage examples printed after the help text and after every usage error
pub const USAGE_EXAMPLES: &str = "\
How to use:

For upload a file:
s4cli upload /path/file_upload.ext s3/upload/file_upload.ext AWS_KEY AWS_SECRET S3_BUCKET AWS_REGION

For upload a directory:
s4cli sync /path/directory s3/upload_dir/ AWS_KEY AWS_SECRET S3_BUCKET AWS_REGION

For download a file:
s4cli download /path/file_download.ext s3/download/file_download.ext AWS_KEY AWS_SECRET S3_BUCKET AWS_REGION";

/// Status line logged when no arguments were given at all
const MISSING_ARGUMENTS: &str = "incorrect number of arguments";

/// Log a command line parse failure as an `ERROR` status line, then write the usage text to `out`.
///
/// Help and version requests are not failures and are written to `out` as they are.
pub fn report_usage_error(err: &clap::Error, out: &mut impl io::Write) -> io::Result<()> {
    use clap::error::ErrorKind;

    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => write!(out, "{}", err.render()),
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            tracing::error!("{MISSING_ARGUMENTS}");
            write!(out, "{}", err.render())
        }
        _ => {
            tracing::error!("{}", usage_error_message(err));
            writeln!(out, "\n{USAGE_EXAMPLES}")
        }
    }
}

/// The parse failure on a single line, without clap's `error:` tag or its `--help` hint
pub fn usage_error_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let rendered = rendered.strip_prefix("error: ").unwrap_or(&rendered);
    rendered
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Command line arguments. Everything but the region is positional and required.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "s4cli")]
#[command(about = "Simple AWS S3 console client: upload, download or sync local files.")]
#[command(after_help = USAGE_EXAMPLES, arg_required_else_help = true)]
pub struct Cli {
    /// Transfer to perform
    #[arg(value_enum)]
    action: Action,

    /// Local file (upload, download) or directory (sync)
    local_path: PathBuf,

    /// Object key (upload, download) or key prefix (sync)
    remote: String,

    /// AWS access key ID
    access_key_id: String,

    /// AWS secret access key
    secret_access_key: String,

    /// Bucket name
    bucket: String,

    /// AWS region
    #[arg(default_value = DEFAULT_REGION)]
    region: String,

    /// Don't descend into symbolically linked files or directories during sync
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    no_follow_symlinks: bool,
}

/// The transfer named by the first positional argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Action {
    /// Upload a single file to an object key
    Upload,
    /// Upload a directory tree under a key prefix
    Sync,
    /// Download an object to a new local file
    Download,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Upload => write!(f, "upload"),
            Action::Sync => write!(f, "sync"),
            Action::Download => write!(f, "download"),
        }
    }
}

impl Cli {
    /// The requested action
    pub fn action(&self) -> Action {
        self.action
    }

    /// Split the arguments into the transfer to run and the configuration to run it with
    pub fn into_parts(self) -> Result<(Request, Config), error::Error> {
        let config = Config::builder()
            .access_key_id(self.access_key_id)
            .secret_access_key(self.secret_access_key)
            .bucket(self.bucket)
            .region(self.region)
            .follow_symlinks(!self.no_follow_symlinks)
            .build()?;

        let request = Request {
            action: self.action,
            local_path: self.local_path,
            remote: self.remote,
        };
        Ok((request, config))
    }
}

/// A single transfer, detached from credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    action: Action,
    local_path: PathBuf,
    remote: String,
}

impl Request {
    /// The requested action
    pub fn action(&self) -> Action {
        self.action
    }

    /// Local file or directory
    pub fn local_path(&self) -> &std::path::Path {
        &self.local_path
    }

    /// Object key or key prefix
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Run the transfer to completion
    pub async fn send(self, client: &Client) -> Result<Outcome, error::Error> {
        let outcome = match self.action {
            Action::Upload => client
                .upload()
                .source(self.local_path)
                .key(self.remote)
                .send()
                .await
                .map(Outcome::Uploaded)?,
            Action::Sync => client
                .sync()
                .source(self.local_path)
                .key_prefix(self.remote)
                .send()
                .await
                .map(Outcome::Synced)?,
            Action::Download => client
                .download()
                .key(self.remote)
                .destination(self.local_path)
                .send()
                .await
                .map(Outcome::Downloaded)?,
        };
        Ok(outcome)
    }
}

/// What a completed [`Request`] did
#[derive(Debug)]
pub enum Outcome {
    /// Single file uploaded
    Uploaded(UploadOutput),
    /// Directory tree walked; some files may have failed
    Synced(SyncOutput),
    /// Single object downloaded
    Downloaded(DownloadOutput),
}

impl Outcome {
    /// Whether every transfer that was attempted succeeded
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Synced(output) => output.failed_transfers().is_empty(),
            _ => true,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Uploaded(output) => write!(
                f,
                "uploaded {} bytes to {}",
                output.bytes_transferred(),
                output.key()
            ),
            Outcome::Synced(output) => write!(
                f,
                "uploaded {} objects totalling {} bytes, {} failed",
                output.objects_uploaded(),
                output.total_bytes_transferred(),
                output.failed_transfers().len()
            ),
            Outcome::Downloaded(output) => write!(
                f,
                "downloaded {} bytes to {}",
                output.bytes_transferred(),
                output.destination().display()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::Parser;

    const CREDS: [&str; 3] = ["AKIDEXAMPLE", "secret", "test-bucket"];

    fn args(action: &str, extra: &[&str]) -> Vec<String> {
        let mut args = vec!["s4cli", action, "/tmp/file.txt", "up/file.txt"];
        args.extend(CREDS);
        args.extend(extra);
        args.into_iter().map(str::to_owned).collect()
    }

    #[test]
    fn test_parse_all_actions() {
        for (name, action) in [
            ("upload", Action::Upload),
            ("sync", Action::Sync),
            ("download", Action::Download),
        ] {
            let cli = Cli::try_parse_from(args(name, &[])).unwrap();
            assert_eq!(action, cli.action());
        }
    }

    #[test]
    fn test_region_defaults() {
        let (_, config) = Cli::try_parse_from(args("upload", &[]))
            .unwrap()
            .into_parts()
            .unwrap();
        assert_eq!(DEFAULT_REGION, config.region());
        assert_eq!("test-bucket", config.bucket());
        assert!(config.follow_symlinks());

        let (request, config) = Cli::try_parse_from(args("download", &["eu-central-1"]))
            .unwrap()
            .into_parts()
            .unwrap();
        assert_eq!("eu-central-1", config.region());
        assert_eq!(Action::Download, request.action());
        assert_eq!("up/file.txt", request.remote());
    }

    #[test]
    fn test_no_follow_symlinks_flag() {
        let (_, config) = Cli::try_parse_from(args("sync", &["--no-follow-symlinks"]))
            .unwrap()
            .into_parts()
            .unwrap();
        assert!(!config.follow_symlinks());
    }

    #[test]
    fn test_unknown_action_is_usage_error() {
        let err = Cli::try_parse_from(args("copy", &[])).unwrap_err();
        assert_eq!(ErrorKind::InvalidValue, err.kind());
        assert!(err.use_stderr());
    }

    #[test]
    fn test_no_arguments_is_usage_error() {
        let err = Cli::try_parse_from(["s4cli"]).unwrap_err();
        assert_eq!(
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand,
            err.kind()
        );
        assert_ne!(0, err.exit_code());
    }

    #[test]
    fn test_too_few_arguments_is_usage_error() {
        let err = Cli::try_parse_from(["s4cli", "upload", "/tmp/file.txt", "key", "AKID", "secret"])
            .unwrap_err();
        assert_eq!(ErrorKind::MissingRequiredArgument, err.kind());
    }

    #[test]
    fn test_usage_error_message_is_one_line() {
        let err = Cli::try_parse_from(args("copy", &[])).unwrap_err();
        let message = usage_error_message(&err);
        assert!(message.starts_with("invalid value 'copy'"), "{message}");
        assert!(!message.contains('\n'));
        assert!(!message.contains("--help"));

        let err = Cli::try_parse_from(["s4cli", "upload", "/tmp/file.txt", "key", "AKID", "secret"])
            .unwrap_err();
        let message = usage_error_message(&err);
        assert!(message.contains("<BUCKET>"), "{message}");
    }

    #[test]
    fn test_help_is_not_a_usage_error() {
        let err = Cli::try_parse_from(["s4cli", "--help"]).unwrap_err();
        assert_eq!(ErrorKind::DisplayHelp, err.kind());

        let mut out = Vec::new();
        report_usage_error(&err, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("How to use:"));
    }

    #[test]
    fn test_too_many_arguments_is_usage_error() {
        let err = Cli::try_parse_from(args("upload", &["us-east-1", "extra"])).unwrap_err();
        assert_eq!(ErrorKind::UnknownArgument, err.kind());
    }
}
