/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::slice::Iter;

/// A raw command line split into a normalized verb and its argument
/// string. Verb recognition happens at dispatch, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub verb: String,
    pub argument: String,
}

/// Longest command line accepted before the input is discarded; RFC 1939
/// commands fit in a fraction of this.
const MAX_LINE_LEN: usize = 4096;

pub enum Error {
    NeedsMoreData,
    LineTooLong,
}

#[derive(Default)]
pub struct Parser {
    buf: Vec<u8>,
    discarding: bool,
}

impl Parser {
    /// Consumes bytes until a full line is available. `Ok(None)` is a
    /// blank line, which must produce no response bytes at all. A line
    /// exceeding `MAX_LINE_LEN` is reported once and then discarded up to
    /// its terminator, so the buffer stays bounded no matter what the
    /// peer streams.
    pub fn parse(&mut self, bytes: &mut Iter<'_, u8>) -> Result<Option<Request>, Error> {
        for &byte in bytes {
            if self.discarding {
                if byte == b'\n' {
                    self.discarding = false;
                }
                continue;
            }
            if byte == b'\n' {
                let line = std::mem::take(&mut self.buf);
                return Ok(Self::split(&String::from_utf8_lossy(&line)));
            }
            self.buf.push(byte);
            if self.buf.len() > MAX_LINE_LEN {
                self.buf.clear();
                self.discarding = true;
                return Err(Error::LineTooLong);
            }
        }
        Err(Error::NeedsMoreData)
    }

    fn split(line: &str) -> Option<Request> {
        let line = line.strip_suffix('\r').unwrap_or(line).trim();
        if line.is_empty() {
            return None;
        }
        let (verb, argument) = match line.split_once(char::is_whitespace) {
            Some((verb, argument)) => (verb, argument.trim()),
            None => (line, ""),
        };
        Some(Request {
            verb: verb.to_ascii_uppercase(),
            argument: argument.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, Parser, Request};

    fn requests(parser: &mut Parser, bytes: &[u8]) -> Vec<Option<Request>> {
        let mut bytes = bytes.iter();
        let mut parsed = Vec::new();
        while let Ok(request) = parser.parse(&mut bytes) {
            parsed.push(request);
        }
        parsed
    }

    fn request(verb: &str, argument: &str) -> Option<Request> {
        Some(Request {
            verb: verb.to_string(),
            argument: argument.to_string(),
        })
    }

    #[test]
    fn split_verb_and_argument() {
        let mut parser = Parser::default();
        assert_eq!(
            requests(&mut parser, b"LIST 2\r\n"),
            vec![request("LIST", "2")]
        );
        assert_eq!(
            requests(&mut parser, b"retr 1\r\n"),
            vec![request("RETR", "1")]
        );
        assert_eq!(
            requests(&mut parser, b"USER  bob \r\n"),
            vec![request("USER", "bob")]
        );
        // Bare LF without CR is tolerated.
        assert_eq!(requests(&mut parser, b"STAT\n"), vec![request("STAT", "")]);
    }

    #[test]
    fn blank_line_is_a_no_op() {
        let mut parser = Parser::default();
        assert_eq!(requests(&mut parser, b"\r\n"), vec![None]);
        assert_eq!(requests(&mut parser, b"   \r\n"), vec![None]);
    }

    #[test]
    fn oversized_line_is_discarded() {
        let mut parser = Parser::default();
        let flood = vec![b'a'; 10_000];
        let mut bytes = flood.iter();
        assert!(matches!(parser.parse(&mut bytes), Err(Error::LineTooLong)));
        // The rest of the line is swallowed without a second report, and
        // nothing of it stays buffered.
        assert!(matches!(parser.parse(&mut bytes), Err(Error::NeedsMoreData)));
        assert!(parser.buf.is_empty());
        // Parsing resumes at the next line boundary.
        let mut bytes = b"tail of the flood\r\nNOOP\r\n".iter();
        assert_eq!(parser.parse(&mut bytes).ok(), Some(request("NOOP", "")));
    }

    #[test]
    fn partial_lines_resume() {
        let mut parser = Parser::default();
        assert_eq!(requests(&mut parser, b"LI"), vec![]);
        assert_eq!(
            requests(&mut parser, b"ST 3\r\nNOOP\r\n"),
            vec![request("LIST", "3"), request("NOOP", "")]
        );
    }
}
