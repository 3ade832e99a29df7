/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::time::Duration;

use s3::{creds::Credentials, Bucket, Region};

use super::{Error, ObjectInfo, Result};

pub struct S3Store {
    bucket: Bucket,
}

impl S3Store {
    pub fn open(
        bucket: &str,
        region: Region,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(S3Store {
            bucket: Bucket::new(bucket, region, credentials)?
                .with_path_style()
                .with_request_timeout(timeout)?,
        })
    }

    pub(super) async fn list_objects(&self, prefix: Option<&str>) -> Result<Vec<ObjectInfo>> {
        let mut objects = Vec::new();
        for page in self
            .bucket
            .list(prefix.unwrap_or_default().to_string(), None)
            .await?
        {
            for object in page.contents {
                objects.push(ObjectInfo {
                    key: object.key,
                    size: object.size,
                    last_modified: object.last_modified,
                });
            }
        }
        Ok(objects)
    }

    pub(super) async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let response = self.bucket.get_object(key).await?;
        if (200..300).contains(&response.status_code()) {
            Ok(response.to_vec())
        } else if response.status_code() == 404 {
            Err(Error::NotFound(key.to_string()))
        } else {
            Err(Error::Internal(format!(
                "S3 error code {}: {}",
                response.status_code(),
                String::from_utf8_lossy(response.as_slice())
            )))
        }
    }
}
