/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::{net::IpAddr, time::Duration};

use clap::Parser;
use s3::{creds::Credentials, Region};

use crate::{
    op::authenticate::{Directory, StaticDirectory},
    store::{s3::S3Store, MaildropStore},
    Core,
};

/// POP3 endpoint exposing an S3-backed maildrop.
#[derive(Debug, Parser)]
#[command(name = "s3-maildrop", version, about)]
pub struct Cli {
    /// Address to bind the listener on
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to run the POP3 server on
    #[arg(short, long, default_value_t = 110)]
    pub port: u16,

    /// S3 bucket to use as the backend mail store
    #[arg(long = "s3-bucket", env = "MAILDROP_S3_BUCKET")]
    pub bucket: String,

    /// S3 region
    #[arg(long = "s3-region", env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom endpoint for S3-compatible stores
    #[arg(long = "s3-endpoint", env = "MAILDROP_S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Prefix to filter objects within the bucket
    #[arg(long = "s3-object-prefix", env = "MAILDROP_S3_PREFIX")]
    pub prefix: Option<String>,

    /// Access key; falls back to the standard AWS credential chain
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Secret key; falls back to the standard AWS credential chain
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Username accepted at login; any username is accepted when unset
    #[arg(long, env = "MAILDROP_AUTH_USER")]
    pub auth_user: Option<String>,

    /// Shared secret checked by the PASS command
    #[arg(long, env = "MAILDROP_AUTH_SECRET", hide_env_values = true)]
    pub auth_secret: String,

    /// Backend request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub store_timeout: u64,

    /// Idle timeout before authentication, in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_unauth: u64,

    /// Idle timeout after authentication, in seconds
    #[arg(long, default_value_t = 600)]
    pub timeout_auth: u64,
}

impl Cli {
    pub fn into_core(self) -> crate::Result<Core> {
        let region = if let Some(endpoint) = &self.endpoint {
            Region::Custom {
                region: self.region.clone(),
                endpoint: endpoint.clone(),
            }
        } else {
            self.region
                .parse()
                .map_err(|err| crate::store::Error::Internal(format!("invalid S3 region: {err}")))?
        };
        let credentials = Credentials::new(
            self.access_key.as_deref(),
            self.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(crate::store::Error::from)?;

        Ok(Core {
            store: MaildropStore::S3(S3Store::open(
                &self.bucket,
                region,
                credentials,
                Duration::from_secs(self.store_timeout),
            )?),
            directory: Directory::Static(StaticDirectory {
                username: self.auth_user,
                secret: self.auth_secret,
            }),
            prefix: self.prefix,
            timeout_unauth: Duration::from_secs(self.timeout_unauth),
            timeout_auth: Duration::from_secs(self.timeout_auth),
        })
    }
}
