/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::sync::Arc;

pub mod memory;
pub mod s3;

use self::{memory::MemoryStore, s3::S3Store};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("S3 error: {0}")]
    S3(#[from] ::s3::error::S3Error),
    #[error("S3 credentials error: {0}")]
    Credentials(#[from] ::s3::creds::error::CredentialsError),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

/// Object metadata as reported by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    /// RFC 3339 timestamp; lexicographic order is chronological.
    pub last_modified: String,
}

pub enum MaildropStore {
    S3(S3Store),
    Memory(Arc<MemoryStore>),
}

impl MaildropStore {
    /// Lists objects under the given prefix, ordered by key.
    pub async fn list_objects(&self, prefix: Option<&str>) -> Result<Vec<ObjectInfo>> {
        match self {
            MaildropStore::S3(store) => store.list_objects(prefix).await,
            MaildropStore::Memory(store) => store.list_objects(prefix).await,
        }
    }

    pub async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        match self {
            MaildropStore::S3(store) => store.get_object(key).await,
            MaildropStore::Memory(store) => store.get_object(key).await,
        }
    }
}
