/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{Error, ObjectInfo, Result};

/// In-memory object store used by the test suite. Counts backend calls so
/// cache behavior is observable, and injects failures on demand.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<Vec<(ObjectInfo, Vec<u8>)>>,
    fail_list: AtomicBool,
    fail_get: AtomicBool,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        key: impl Into<String>,
        data: impl Into<Vec<u8>>,
        last_modified: impl Into<String>,
    ) {
        let data = data.into();
        self.objects.lock().push((
            ObjectInfo {
                key: key.into(),
                size: data.len() as u64,
                last_modified: last_modified.into(),
            },
            data,
        ));
    }

    pub fn fail_listings(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::Relaxed);
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::Relaxed);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::Relaxed)
    }

    pub(super) async fn list_objects(&self, prefix: Option<&str>) -> Result<Vec<ObjectInfo>> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_list.load(Ordering::Relaxed) {
            return Err(Error::Internal("injected listing failure".to_string()));
        }
        let prefix = prefix.unwrap_or_default();
        let mut listing = self
            .objects
            .lock()
            .iter()
            .filter(|(info, _)| info.key.starts_with(prefix))
            .map(|(info, _)| info.clone())
            .collect::<Vec<_>>();
        listing.sort_unstable_by(|a, b| a.key.cmp(&b.key));
        Ok(listing)
    }

    pub(super) async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        self.get_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_get.load(Ordering::Relaxed) {
            return Err(Error::Internal("injected fetch failure".to_string()));
        }
        self.objects
            .lock()
            .iter()
            .find(|(info, _)| info.key == key)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| Error::NotFound(key.to_string()))
    }
}
