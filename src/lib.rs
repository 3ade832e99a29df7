/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::{net::IpAddr, sync::Arc, time::Duration};

use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::watch,
};

use crate::{
    mailbox::{Mailbox, MessageCache},
    op::authenticate::Directory,
    protocol::request::Parser,
    store::MaildropStore,
};

pub mod client;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod op;
pub mod protocol;
pub mod session;
pub mod store;

pub use error::{Error, Result};

pub(crate) static SERVER_GREETING: &str = "+OK s3-maildrop POP3 at your service.\r\n";

pub trait SessionStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> SessionStream for T {}

/// Shared collaborators and settings, read-only across sessions.
pub struct Core {
    pub store: MaildropStore,
    pub directory: Directory,
    pub prefix: Option<String>,
    pub timeout_unauth: Duration,
    pub timeout_auth: Duration,
}

pub struct Session<T: SessionStream> {
    pub core: Arc<Core>,
    pub receiver: Parser,
    pub state: State,
    pub stream: T,
    pub remote_addr: IpAddr,
    pub shutdown_rx: watch::Receiver<bool>,
}

pub enum State {
    NotAuthenticated {
        auth_failures: u32,
        username: Option<String>,
    },
    Authenticated {
        username: String,
        mailbox: Mailbox,
        cache: MessageCache,
    },
}

pub enum SessionResult {
    Continue,
    Close,
}

impl<T: SessionStream> Session<T> {
    pub fn new(
        core: Arc<Core>,
        stream: T,
        remote_addr: IpAddr,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Session {
            core,
            receiver: Parser::default(),
            state: State::NotAuthenticated {
                auth_failures: 0,
                username: None,
            },
            stream,
            remote_addr,
            shutdown_rx,
        }
    }
}

impl State {
    pub fn mailbox(&self) -> &Mailbox {
        match self {
            State::Authenticated { mailbox, .. } => mailbox,
            _ => unreachable!(),
        }
    }

    pub fn mailbox_mut(&mut self) -> &mut Mailbox {
        match self {
            State::Authenticated { mailbox, .. } => mailbox,
            _ => unreachable!(),
        }
    }

    pub fn cache(&self) -> &MessageCache {
        match self {
            State::Authenticated { cache, .. } => cache,
            _ => unreachable!(),
        }
    }

    pub fn cache_mut(&mut self) -> &mut MessageCache {
        match self {
            State::Authenticated { cache, .. } => cache,
            _ => unreachable!(),
        }
    }
}
