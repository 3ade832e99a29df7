/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod request;
pub mod response;

use crate::error::Error;
use request::Request;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Authorization state
    User { name: String },
    Pass { secret: String },
    Quit,

    // Transaction state
    Stat,
    List { msg: Option<u32> },
    Retr { msg: u32 },
    Dele { msg: u32 },
    Noop,
    Rset,
    Top { msg: u32, n: u32 },
    Uidl { msg: Option<u32> },

    // Extensions
    Capa,
}

impl Command {
    pub fn parse(request: Request) -> crate::Result<Self> {
        let Request { verb, argument } = request;
        Ok(match verb.as_str() {
            "USER" => Command::User { name: argument },
            "PASS" => Command::Pass { secret: argument },
            "QUIT" => Command::Quit,
            "STAT" => Command::Stat,
            "LIST" => Command::List {
                msg: parse_optional_message_number(&argument)?,
            },
            "UIDL" => Command::Uidl {
                msg: parse_optional_message_number(&argument)?,
            },
            "RETR" => Command::Retr {
                msg: parse_message_number(&argument)?,
            },
            "DELE" => Command::Dele {
                msg: parse_message_number(&argument)?,
            },
            "TOP" => {
                let mut args = argument.split_whitespace();
                let msg = parse_message_number(args.next().unwrap_or_default())?;
                let n = args
                    .next()
                    .and_then(|n| n.parse::<u32>().ok())
                    .ok_or_else(no_such_message)?;
                Command::Top { msg, n }
            }
            "NOOP" => Command::Noop,
            "RSET" => Command::Rset,
            "CAPA" => Command::Capa,
            _ => return Err(Error::protocol(format!("unknown command: {verb}"))),
        })
    }
}

fn no_such_message() -> Error {
    Error::protocol("no such message")
}

/// Message numbers are 1-based; zero, negative and non-numeric arguments
/// are the same error class as an out-of-range number.
fn parse_message_number(argument: &str) -> crate::Result<u32> {
    argument
        .parse::<u32>()
        .ok()
        .filter(|msg| *msg > 0)
        .ok_or_else(no_such_message)
}

fn parse_optional_message_number(argument: &str) -> crate::Result<Option<u32>> {
    if argument.is_empty() {
        Ok(None)
    } else {
        parse_message_number(argument).map(Some)
    }
}
