/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::sync::Arc;

use ahash::AHashMap;

use crate::{error::Error, Session, SessionStream};

/// Object created by the SES receipt-rule setup, never a message.
pub const SES_SETUP_NOTIFICATION: &str = "AMAZON_SES_SETUP_NOTIFICATION";

/// The mailbox snapshot built from a single listing at login. Message
/// order, and with it the 1-based wire numbering, is fixed for the whole
/// session; only the `deleted` flags change afterwards.
#[derive(Default)]
pub struct Mailbox {
    pub messages: Vec<Message>,
}

pub struct Message {
    pub uid: String,
    pub key: String,
    pub size: u64,
    pub deleted: bool,
}

/// Message contents fetched so far, keyed by uid. Populated lazily, never
/// invalidated; bounded by the session lifetime.
#[derive(Default)]
pub struct MessageCache {
    messages: AHashMap<String, Arc<CachedMessage>>,
}

pub struct CachedMessage {
    pub raw: Vec<u8>,
    pub header: String,
    pub body_lines: Vec<String>,
}

impl Mailbox {
    /// Count and octet total of the messages not marked deleted.
    pub fn stat(&self) -> (u32, u64) {
        self.messages
            .iter()
            .filter(|message| !message.deleted)
            .fold((0, 0), |(count, size), message| {
                (count + 1, size + message.size)
            })
    }

    pub fn get(&self, msg: u32) -> crate::Result<&Message> {
        let total = self.messages.len();
        self.messages
            .get(msg.saturating_sub(1) as usize)
            .ok_or_else(|| no_such_message(total))
    }

    pub fn get_mut(&mut self, msg: u32) -> crate::Result<&mut Message> {
        let total = self.messages.len();
        self.messages
            .get_mut(msg.saturating_sub(1) as usize)
            .ok_or_else(|| no_such_message(total))
    }
}

fn no_such_message(total: usize) -> Error {
    Error::protocol(format!(
        "no such message, only {total} messages in maildrop"
    ))
}

impl MessageCache {
    pub fn get(&self, uid: &str) -> Option<Arc<CachedMessage>> {
        self.messages.get(uid).cloned()
    }

    pub fn insert(&mut self, uid: String, message: CachedMessage) -> Arc<CachedMessage> {
        let message = Arc::new(message);
        self.messages.insert(uid, message.clone());
        message
    }
}

impl CachedMessage {
    /// Splits raw message bytes at the first blank-line boundary into the
    /// header block and individual body lines.
    pub fn parse(raw: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&raw).into_owned();
        let (header, body) = match text.split_once("\r\n\r\n") {
            Some((header, body)) => (header.to_string(), body.to_string()),
            None => (text, String::new()),
        };
        let body_lines = if body.is_empty() {
            Vec::new()
        } else {
            body.split("\r\n").map(str::to_string).collect()
        };
        CachedMessage {
            raw,
            header,
            body_lines,
        }
    }

    pub fn size(&self) -> u64 {
        self.raw.len() as u64
    }
}

impl<T: SessionStream> Session<T> {
    /// Builds the session's mailbox snapshot from one backend listing.
    pub async fn fetch_mailbox(&self) -> crate::Result<Mailbox> {
        let prefix = self.core.prefix.as_deref();
        let mut objects = self.core.store.list_objects(prefix).await?;

        // Backend timestamps are RFC 3339, so lexicographic order is
        // chronological. This order defines the message numbers for the
        // rest of the session.
        objects.sort_by(|a, b| a.last_modified.cmp(&b.last_modified));

        let mut mailbox = Mailbox::default();
        for object in objects {
            let uid = object
                .key
                .strip_prefix(prefix.unwrap_or_default())
                .unwrap_or(&object.key)
                .trim_start_matches('/')
                .to_string();
            if uid == SES_SETUP_NOTIFICATION {
                continue;
            }
            mailbox.messages.push(Message {
                uid,
                key: object.key,
                size: object.size,
                deleted: false,
            });
        }

        tracing::debug!(
            remote = %self.remote_addr,
            total = mailbox.messages.len(),
            "mailbox snapshot built"
        );
        Ok(mailbox)
    }

    /// Resolves a message number to its content, fetching from the backend
    /// on first access and caching for the rest of the session. A backend
    /// failure leaves the cache untouched.
    pub async fn fetch_message(&mut self, msg: u32) -> crate::Result<Arc<CachedMessage>> {
        let (uid, key) = {
            let message = self.state.mailbox().get(msg)?;
            if message.deleted {
                return Err(Error::protocol(format!("message {msg} deleted")));
            }
            (message.uid.clone(), message.key.clone())
        };

        if let Some(cached) = self.state.cache().get(&uid) {
            return Ok(cached);
        }

        let raw = self.core.store.get_object(&key).await?;
        tracing::debug!(remote = %self.remote_addr, uid = %uid, size = raw.len(), "message fetched");
        Ok(self.state.cache_mut().insert(uid, CachedMessage::parse(raw)))
    }
}
