/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::borrow::Cow;

use crate::{protocol::response::Response, store};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Recoverable protocol-level error, answered with a single `-ERR`
    /// line while the session stays open.
    #[error("{0}")]
    Protocol(Cow<'static, str>),
    #[error(transparent)]
    Store(#[from] store::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("too many authentication attempts")]
    TooManyAuthFailures,
}

impl Error {
    pub fn protocol(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Protocol(message.into())
    }

    /// Whether the connection must be torn down after reporting the error.
    pub fn must_disconnect(&self) -> bool {
        matches!(self, Error::Io(_) | Error::TooManyAuthFailures)
    }

    pub fn should_write_err(&self) -> bool {
        !matches!(self, Error::Io(_))
    }

    pub fn serialize(&self) -> Vec<u8> {
        // Backend details go to the log, not to the client.
        let message: Cow<'static, str> = match self {
            Error::Protocol(message) => message.clone(),
            Error::Store(_) => "message store is unavailable".into(),
            Error::TooManyAuthFailures => "too many authentication attempts".into(),
            Error::Io(_) => "internal server error".into(),
        };
        Response::Err(message).serialize()
    }
}
