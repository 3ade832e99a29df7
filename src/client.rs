/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::{
    error::Error,
    protocol::{request, Command},
    Session, SessionResult, SessionStream, State,
};

impl<T: SessionStream> Session<T> {
    pub async fn ingest(&mut self, bytes: &[u8]) -> SessionResult {
        let mut bytes = bytes.iter();
        let mut requests = Vec::with_capacity(2);

        loop {
            match self.receiver.parse(&mut bytes) {
                Ok(Some(request)) => requests.push(request),
                // Blank line: no response bytes at all.
                Ok(None) => (),
                Err(request::Error::LineTooLong) => {
                    if !self.write_err(Error::protocol("line too long")).await {
                        return SessionResult::Close;
                    }
                }
                Err(request::Error::NeedsMoreData) => break,
            }
        }

        for request in requests {
            let result = match Command::parse(request)
                .and_then(|command| self.validate_request(command))
            {
                Ok(command) => match command {
                    Command::User { name } => self
                        .handle_user(name)
                        .await
                        .map(|_| SessionResult::Continue),
                    Command::Pass { secret } => self
                        .handle_pass(secret)
                        .await
                        .map(|_| SessionResult::Continue),
                    Command::Quit => self.handle_quit().await.map(|_| SessionResult::Close),
                    Command::Stat => self.handle_stat().await.map(|_| SessionResult::Continue),
                    Command::List { msg } => {
                        self.handle_list(msg).await.map(|_| SessionResult::Continue)
                    }
                    Command::Retr { msg } => {
                        self.handle_retr(msg).await.map(|_| SessionResult::Continue)
                    }
                    Command::Top { msg, n } => self
                        .handle_top(msg, n)
                        .await
                        .map(|_| SessionResult::Continue),
                    Command::Uidl { msg } => {
                        self.handle_uidl(msg).await.map(|_| SessionResult::Continue)
                    }
                    Command::Dele { msg } => {
                        self.handle_dele(msg).await.map(|_| SessionResult::Continue)
                    }
                    Command::Rset => self.handle_rset().await.map(|_| SessionResult::Continue),
                    Command::Noop => self.write_ok("").await.map(|_| SessionResult::Continue),
                    Command::Capa => self.handle_capa().await.map(|_| SessionResult::Continue),
                },
                Err(err) => Err(err),
            };

            match result {
                Ok(SessionResult::Continue) => (),
                Ok(result) => return result,
                Err(err) => {
                    if !self.write_err(err).await {
                        return SessionResult::Close;
                    }
                }
            }
        }

        SessionResult::Continue
    }

    fn validate_request(&self, command: Command) -> crate::Result<Command> {
        match &command {
            Command::Capa | Command::Quit | Command::Noop | Command::User { .. } => Ok(command),
            Command::Pass { .. } => match &self.state {
                State::NotAuthenticated {
                    username: Some(_), ..
                } => Ok(command),
                State::NotAuthenticated { username: None, .. } => {
                    Err(Error::protocol("username was not provided"))
                }
                State::Authenticated { .. } => Err(Error::protocol("already authenticated")),
            },
            Command::Stat
            | Command::List { .. }
            | Command::Uidl { .. }
            | Command::Retr { .. }
            | Command::Top { .. }
            | Command::Dele { .. }
            | Command::Rset => {
                if matches!(self.state, State::Authenticated { .. }) {
                    Ok(command)
                } else {
                    Err(Error::protocol("not authenticated"))
                }
            }
        }
    }
}
