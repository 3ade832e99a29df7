/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::borrow::Cow;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::{
    error::Error, protocol::response::Response, Session, SessionResult, SessionStream, State,
    SERVER_GREETING,
};

impl<T: SessionStream> Session<T> {
    pub async fn run(mut self) {
        if self.write_bytes(SERVER_GREETING.as_bytes()).await.is_ok() {
            self.handle_conn().await;
        }
        tracing::info!(remote = %self.remote_addr, "session ended");
    }

    pub async fn handle_conn(&mut self) {
        let mut buf = vec![0; 8192];
        let mut shutdown_rx = self.shutdown_rx.clone();

        loop {
            tokio::select! {
                result = tokio::time::timeout(
                    if matches!(self.state, State::NotAuthenticated { .. }) {
                        self.core.timeout_unauth
                    } else {
                        self.core.timeout_auth
                    },
                    self.stream.read(&mut buf)) => {
                    match result {
                        Ok(Ok(bytes_read)) => {
                            if bytes_read > 0 {
                                match self.ingest(&buf[..bytes_read]).await {
                                    SessionResult::Continue => (),
                                    SessionResult::Close => break,
                                }
                            } else {
                                tracing::debug!(remote = %self.remote_addr, "connection closed by peer");
                                break;
                            }
                        }
                        Ok(Err(err)) => {
                            tracing::debug!(remote = %self.remote_addr, reason = %err, "read error");
                            break;
                        }
                        Err(_) => {
                            tracing::debug!(remote = %self.remote_addr, "connection timed out");
                            self.write_bytes(&b"-ERR Connection timed out.\r\n"[..]).await.ok();
                            break;
                        }
                    }
                }
                _ = shutdown_rx.changed() => {
                    self.write_bytes(&b"-ERR Server shutting down.\r\n"[..]).await.ok();
                    break;
                }
            }
        }
    }

    pub async fn write_bytes(&mut self, bytes: impl AsRef<[u8]>) -> crate::Result<()> {
        let bytes = bytes.as_ref();
        tracing::trace!(
            remote = %self.remote_addr,
            size = bytes.len(),
            output = %String::from_utf8_lossy(bytes),
            "raw output"
        );
        self.stream.write_all(bytes).await?;
        self.stream.flush().await?;
        Ok(())
    }

    pub async fn write_ok(&mut self, message: impl Into<Cow<'static, str>>) -> crate::Result<()> {
        self.write_bytes(Response::Ok(message.into()).serialize())
            .await
    }

    /// Reports an error to the client; returns whether the session may
    /// keep serving commands.
    pub async fn write_err(&mut self, err: Error) -> bool {
        let disconnect = err.must_disconnect();
        let response = err.serialize();
        tracing::debug!(remote = %self.remote_addr, reason = %err, "command failed");

        if err.should_write_err() && self.write_bytes(response).await.is_err() {
            return false;
        }

        !disconnect
    }
}
