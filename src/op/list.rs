/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::{error::Error, protocol::response::Response, Session, SessionStream};

impl<T: SessionStream> Session<T> {
    pub async fn handle_stat(&mut self) -> crate::Result<()> {
        let (count, size) = self.state.mailbox().stat();
        self.write_ok(format!("{count} {size}")).await
    }

    pub async fn handle_list(&mut self, msg: Option<u32>) -> crate::Result<()> {
        let response = {
            let mailbox = self.state.mailbox();
            match msg {
                Some(msg) => {
                    let message = mailbox.get(msg)?;
                    if message.deleted {
                        return Err(Error::protocol(format!("message {msg} deleted")));
                    }
                    Response::Ok(format!("{msg} {}", message.size).into())
                }
                None => {
                    let (_, size) = mailbox.stat();
                    Response::List {
                        entries: mailbox
                            .messages
                            .iter()
                            .enumerate()
                            .filter(|(_, message)| !message.deleted)
                            .map(|(num, message)| (num as u32 + 1, message.size))
                            .collect(),
                        size,
                    }
                }
            }
        };
        self.write_bytes(response.serialize()).await
    }

    pub async fn handle_uidl(&mut self, msg: Option<u32>) -> crate::Result<()> {
        let response = {
            let mailbox = self.state.mailbox();
            match msg {
                Some(msg) => {
                    let message = mailbox.get(msg)?;
                    if message.deleted {
                        return Err(Error::protocol(format!("message {msg} deleted")));
                    }
                    Response::Ok(format!("{msg} {}", message.uid).into())
                }
                None => Response::Uidl {
                    entries: mailbox
                        .messages
                        .iter()
                        .enumerate()
                        .filter(|(_, message)| !message.deleted)
                        .map(|(num, message)| (num as u32 + 1, message.uid.clone()))
                        .collect(),
                },
            }
        };
        self.write_bytes(response.serialize()).await
    }
}
