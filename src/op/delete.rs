/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::{error::Error, Session, SessionStream, State};

impl<T: SessionStream> Session<T> {
    /// Marks a message deleted for this session only; backend objects are
    /// never mutated.
    pub async fn handle_dele(&mut self, msg: u32) -> crate::Result<()> {
        {
            let message = self.state.mailbox_mut().get_mut(msg)?;
            if message.deleted {
                return Err(Error::protocol(format!("message {msg} already deleted")));
            }
            message.deleted = true;
        }
        tracing::debug!(remote = %self.remote_addr, msg = msg, "message marked deleted");
        self.write_ok(format!("message {msg} deleted")).await
    }

    pub async fn handle_rset(&mut self) -> crate::Result<()> {
        let mut count = 0;
        for message in &mut self.state.mailbox_mut().messages {
            if message.deleted {
                count += 1;
                message.deleted = false;
            }
        }
        self.write_ok(format!("{count} messages undeleted")).await
    }

    /// Clears all session state, then responds; the caller closes the
    /// connection only after this response is fully written.
    pub async fn handle_quit(&mut self) -> crate::Result<()> {
        self.state = State::NotAuthenticated {
            auth_failures: 0,
            username: None,
        };
        self.write_ok("s3-maildrop POP3 signing off").await
    }
}
