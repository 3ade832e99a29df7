/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::{protocol::response::Response, Session, SessionStream};

impl<T: SessionStream> Session<T> {
    pub async fn handle_retr(&mut self, msg: u32) -> crate::Result<()> {
        let message = self.fetch_message(msg).await?;
        let response = Response::Message {
            bytes: message.raw.clone(),
        }
        .serialize();
        self.write_bytes(response).await
    }

    pub async fn handle_top(&mut self, msg: u32, n: u32) -> crate::Result<()> {
        let message = self.fetch_message(msg).await?;
        let response = Response::Top {
            header: message.header.clone(),
            lines: message
                .body_lines
                .iter()
                .take(n as usize)
                .cloned()
                .collect(),
        }
        .serialize();
        self.write_bytes(response).await
    }
}
