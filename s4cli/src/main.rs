/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::process::ExitCode;

use aws_sdk_s3::error::DisplayErrorContext;
use clap::Parser;
use s4cli::cli::{report_usage_error, Cli};
use s4cli::error::DisplayErrorChain;

const BANNER: &str =
    "---------------------------- Simple AWS S3 Client ----------------------------";

fn usage_error(err: clap::Error) -> ExitCode {
    if let Err(io_err) = report_usage_error(&err, &mut std::io::stdout()) {
        tracing::debug!("failed to write usage: {io_err}");
    }
    ExitCode::from(err.exit_code().clamp(0, u8::MAX as i32) as u8)
}

fn failure(err: &s4cli::error::Error) -> ExitCode {
    tracing::error!("{}", DisplayErrorChain(err));
    tracing::debug!("{}", DisplayErrorContext(err));
    ExitCode::FAILURE
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    s4cli::logging::init();
    println!("{BANNER}\n");

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return usage_error(err),
    };

    tracing::debug!("requested action: {}", cli.action());
    let (request, config) = match cli.into_parts() {
        Ok(parts) => parts,
        Err(err) => return failure(&err),
    };

    let client = s4cli::Client::new(config);
    match request.send(&client).await {
        Ok(outcome) => {
            tracing::info!("{outcome}");
            if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => failure(&err),
    }
}
