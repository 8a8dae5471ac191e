//! JSON Lines message records.
//!
//! One object per line:
//! `{"conversation": 1, "seq": 5, "reply": false, "payload": "12..."}`.
//! Blank lines and lines starting with `#` are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use super::{MessageEvent, MessageSource, SourceError};
use crate::protocols::afp::{ConversationId, Direction};

#[derive(Debug, Deserialize)]
struct MessageRecord {
    conversation: u64,
    seq: u16,
    reply: bool,
    payload: String,
}

pub struct JsonLinesSource<R = BufReader<File>> {
    reader: R,
    line: usize,
    buf: String,
}

impl JsonLinesSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    fn record_error(&self, message: impl Into<String>) -> SourceError {
        SourceError::Record {
            line: self.line,
            message: message.into(),
        }
    }
}

impl<R: BufRead> MessageSource for JsonLinesSource<R> {
    fn next_message(&mut self) -> Result<Option<MessageEvent>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let record: MessageRecord =
                serde_json::from_str(text).map_err(|err| self.record_error(err.to_string()))?;
            let payload = decode_payload(&record.payload)
                .map_err(|err| self.record_error(format!("invalid hex payload: {err}")))?;
            let direction = if record.reply {
                Direction::Reply
            } else {
                Direction::Request
            };
            return Ok(Some(MessageEvent {
                conversation: ConversationId(record.conversation),
                seq: record.seq,
                direction,
                payload,
            }));
        }
    }
}

/// Decode a hex payload; ASCII whitespace between digits is ignored.
fn decode_payload(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(digits)
}
