/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::{error::Error, mailbox::MessageCache, Session, SessionStream, State};

const MAX_AUTH_FAILURES: u32 = 3;

/// Authenticator backends. The core only consults this contract point;
/// checking policy lives behind it.
pub enum Directory {
    Static(StaticDirectory),
}

/// Compares against a configured shared secret, and optionally a fixed
/// username.
pub struct StaticDirectory {
    pub username: Option<String>,
    pub secret: String,
}

impl Directory {
    pub async fn authenticate(&self, username: &str, secret: &str) -> bool {
        match self {
            Directory::Static(directory) => {
                directory
                    .username
                    .as_deref()
                    .map_or(true, |expected| expected == username)
                    && directory.secret == secret
            }
        }
    }
}

impl<T: SessionStream> Session<T> {
    pub async fn handle_user(&mut self, name: String) -> crate::Result<()> {
        match &mut self.state {
            State::NotAuthenticated { username, .. } => {
                // A changed identity discards any progress toward the
                // previous one; USER itself always succeeds.
                *username = Some(name);
            }
            State::Authenticated { username, .. } if *username != name => {
                // Switching identities drops the snapshot and cache and
                // forces re-authentication.
                self.state = State::NotAuthenticated {
                    auth_failures: 0,
                    username: Some(name),
                };
            }
            State::Authenticated { .. } => (),
        }
        self.write_ok("user accepted").await
    }

    pub async fn handle_pass(&mut self, secret: String) -> crate::Result<()> {
        let username = match &self.state {
            State::NotAuthenticated {
                username: Some(username),
                ..
            } => username.clone(),
            _ => return Err(Error::protocol("username was not provided")),
        };

        if !self.core.directory.authenticate(&username, &secret).await {
            tracing::debug!(remote = %self.remote_addr, username = %username, "login denied");
            return Err(self.auth_failure());
        }

        // Exactly one listing, immediately after the credential check and
        // before any mailbox-dependent command is answered. On failure the
        // session stays unauthenticated.
        let mailbox = self.fetch_mailbox().await?;

        tracing::info!(
            remote = %self.remote_addr,
            username = %username,
            total = mailbox.messages.len(),
            "authenticated"
        );
        self.state = State::Authenticated {
            username,
            mailbox,
            cache: MessageCache::default(),
        };
        self.write_ok("pass accepted").await
    }

    fn auth_failure(&mut self) -> Error {
        if let State::NotAuthenticated { auth_failures, .. } = &mut self.state {
            *auth_failures += 1;
            if *auth_failures >= MAX_AUTH_FAILURES {
                return Error::TooManyAuthFailures;
            }
        }
        Error::protocol("pass denied")
    }
}
