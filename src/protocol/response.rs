/*
 * SPDX-FileCopyrightText: 2024 s3-maildrop contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::borrow::Cow;

pub enum Response {
    Ok(Cow<'static, str>),
    Err(Cow<'static, str>),
    /// LIST full form: totals line plus per-message sizes, no sentinel.
    List { entries: Vec<(u32, u64)>, size: u64 },
    /// UIDL full form, terminated by the dot sentinel.
    Uidl { entries: Vec<(u32, String)> },
    /// TOP: header block, blank line, up to the requested body lines.
    Top { header: String, lines: Vec<String> },
    /// RETR: octet-counted raw message.
    Message { bytes: Vec<u8> },
    Capability,
}

impl Response {
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Response::Ok(message) => {
                let mut buf = Vec::with_capacity(message.len() + 6);
                buf.extend_from_slice(b"+OK");
                if !message.is_empty() {
                    buf.push(b' ');
                    buf.extend_from_slice(message.as_bytes());
                }
                buf.extend_from_slice(b"\r\n");
                buf
            }
            Response::Err(message) => {
                let mut buf = Vec::with_capacity(message.len() + 7);
                buf.extend_from_slice(b"-ERR ");
                buf.extend_from_slice(message.as_bytes());
                buf.extend_from_slice(b"\r\n");
                buf
            }
            Response::List { entries, size } => {
                let mut buf = Vec::with_capacity(entries.len() * 8 + 32);
                buf.extend_from_slice(
                    format!("+OK {} messages ({} octets)\r\n", entries.len(), size).as_bytes(),
                );
                for (num, octets) in entries {
                    buf.extend_from_slice(format!("{num} {octets}\r\n").as_bytes());
                }
                buf
            }
            Response::Uidl { entries } => {
                let mut buf = Vec::with_capacity(entries.len() * 16 + 10);
                buf.extend_from_slice(b"+OK\r\n");
                for (num, uid) in entries {
                    buf.extend_from_slice(format!("{num} {uid}\r\n").as_bytes());
                }
                buf.extend_from_slice(b".\r\n");
                buf
            }
            Response::Top { header, lines } => {
                let mut text = String::with_capacity(header.len() + lines.len() * 40 + 2);
                text.push_str(header);
                text.push_str("\r\n\r\n");
                for line in lines {
                    text.push_str(line);
                    text.push_str("\r\n");
                }
                let mut buf = Vec::with_capacity(text.len() + 32);
                buf.extend_from_slice(b"+OK top of message follows\r\n");
                write_multiline(&mut buf, text.as_bytes());
                buf.extend_from_slice(b".\r\n");
                buf
            }
            Response::Message { bytes } => {
                let mut buf = Vec::with_capacity(bytes.len() + 16);
                buf.extend_from_slice(b"+OK ");
                buf.extend_from_slice(bytes.len().to_string().as_bytes());
                buf.extend_from_slice(b" octets\r\n");
                write_multiline(&mut buf, bytes);
                buf.extend_from_slice(b".\r\n");
                buf
            }
            Response::Capability => {
                let mut buf = Vec::with_capacity(128);
                buf.extend_from_slice(b"+OK Capability list follows\r\n");
                for capa in [
                    "USER",
                    "TOP",
                    "UIDL",
                    "RESP-CODES",
                    "PIPELINING",
                    "EXPIRE NEVER",
                    "IMPLEMENTATION s3-maildrop",
                ] {
                    buf.extend_from_slice(capa.as_bytes());
                    buf.extend_from_slice(b"\r\n");
                }
                buf.extend_from_slice(b".\r\n");
                buf
            }
        }
    }
}

/// Transparency procedure: byte-stuff lines starting with a dot and make
/// sure every line ends with CRLF, without duplicating a terminator the
/// payload already carries.
fn write_multiline(buf: &mut Vec<u8>, bytes: &[u8]) {
    let mut last_byte = 0;
    for &byte in bytes {
        if byte == b'\n' && last_byte != b'\r' {
            buf.push(b'\r');
        }
        if byte == b'.' && (last_byte == b'\n' || last_byte == 0) {
            buf.push(b'.');
        }
        buf.push(byte);
        last_byte = byte;
    }
    if last_byte != b'\n' {
        buf.extend_from_slice(b"\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::Response;

    #[test]
    fn serialize_response() {
        for (response, expected) in [
            (
                Response::Ok("message 1 deleted".into()),
                "+OK message 1 deleted\r\n",
            ),
            (Response::Ok("".into()), "+OK\r\n"),
            (
                Response::Err("no such message".into()),
                "-ERR no such message\r\n",
            ),
            (
                Response::List {
                    entries: vec![(1, 10), (2, 20)],
                    size: 30,
                },
                "+OK 2 messages (30 octets)\r\n1 10\r\n2 20\r\n",
            ),
            (
                Response::Uidl {
                    entries: vec![(1, "a".to_string()), (2, "b".to_string())],
                },
                "+OK\r\n1 a\r\n2 b\r\n.\r\n",
            ),
        ] {
            assert_eq!(expected, String::from_utf8(response.serialize()).unwrap());
        }
    }

    #[test]
    fn serialize_top() {
        assert_eq!(
            String::from_utf8(
                Response::Top {
                    header: "Subject: test".to_string(),
                    lines: Vec::new(),
                }
                .serialize()
            )
            .unwrap(),
            "+OK top of message follows\r\nSubject: test\r\n\r\n.\r\n",
        );
        assert_eq!(
            String::from_utf8(
                Response::Top {
                    header: "Subject: test".to_string(),
                    lines: vec!["first".to_string(), ".second".to_string()],
                }
                .serialize()
            )
            .unwrap(),
            "+OK top of message follows\r\nSubject: test\r\n\r\nfirst\r\n..second\r\n.\r\n",
        );
    }

    #[test]
    fn serialize_message_transparency() {
        // Dot-stuffing plus CRLF normalization of a bare "\r\n"-less tail.
        assert_eq!(
            String::from_utf8(
                Response::Message {
                    bytes: "Subject: test\r\n\r\n.\r\ntest.\r\n.test\r\na"
                        .as_bytes()
                        .to_vec(),
                }
                .serialize()
            )
            .unwrap(),
            "+OK 35 octets\r\nSubject: test\r\n\r\n..\r\ntest.\r\n..test\r\na\r\n.\r\n",
        );
        // A payload that already ends with CRLF gets no extra terminator.
        assert_eq!(
            String::from_utf8(
                Response::Message {
                    bytes: b"hi\r\n".to_vec(),
                }
                .serialize()
            )
            .unwrap(),
            "+OK 4 octets\r\nhi\r\n.\r\n",
        );
    }
}
