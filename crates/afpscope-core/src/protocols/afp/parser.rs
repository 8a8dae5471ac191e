use serde::{Deserialize, Serialize};
use tracing::warn;

use super::commands::{DecodeCtx, command_entry, command_name};
use super::error::AfpError;
use super::fields;
use super::layout;
use super::reader::AfpReader;
use super::session::{ConversationId, SessionStore, TransactionKey};
use super::tree::{FieldNode, FieldSink, FieldTree, FieldValue};

pub const ORPHAN_SUMMARY: &str = "AFP reply (no matching request)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Request,
    Reply,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Request => "request",
            Direction::Reply => "reply",
        }
    }
}

/// One complete AFP message as delivered by the transport.
#[derive(Debug, Clone, Copy)]
pub struct AfpMessage<'a> {
    pub conversation: ConversationId,
    pub seq: u16,
    pub direction: Direction,
    pub payload: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStatus {
    /// Every decoder step succeeded.
    Complete,
    /// A field ran past the payload; nodes up to the failure are kept.
    Partial,
    /// Reply without a recorded request.
    Orphaned,
}

/// Undecoded bytes at the end of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailing {
    pub offset: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedMessage {
    pub summary: String,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<u8>,
    pub status: DecodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing: Option<Trailing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Keep the field tree; summaries and statuses are produced either way.
    pub include_fields: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            include_fields: true,
        }
    }
}

/// Decode one message, pairing replies with their request through `store`.
pub fn decode_message(
    store: &mut SessionStore,
    message: &AfpMessage<'_>,
    options: DecodeOptions,
) -> DecodedMessage {
    let key = TransactionKey::new(message.conversation, message.seq);
    let reader = AfpReader::new(message.payload);

    let command = match message.direction {
        Direction::Request => match reader.read_u8(layout::COMMAND_OFFSET) {
            Ok(code) => store.record_request(key, code),
            Err(_) => return empty_request(),
        },
        Direction::Reply => match store.lookup(key) {
            Some(code) => code,
            None => {
                warn!(
                    conversation = message.conversation.0,
                    seq = message.seq,
                    "reply without matching request"
                );
                return orphaned();
            }
        },
    };

    let mut summary = format!("{} {}", command_name(command), message.direction.as_str());
    let mut tree = FieldTree::new();
    let entry = command_entry(command);

    let (start, decoder) = match message.direction {
        Direction::Request => {
            let start = layout::COMMAND_OFFSET + 1;
            tree.add(&fields::COMMAND, layout::COMMAND_OFFSET..start, FieldValue::Uint(u64::from(command)));
            (start, entry.and_then(|entry| entry.request))
        }
        // Replies carry no command byte; the node is synthesized.
        Direction::Reply => {
            tree.add(&fields::COMMAND, 0..0, FieldValue::Uint(u64::from(command)));
            (0, entry.and_then(|entry| entry.reply))
        }
    };

    let result = match decoder {
        Some(decoder) => {
            let mut ctx = DecodeCtx {
                sink: &mut tree,
                reader,
                summary: &mut summary,
            };
            decoder(&mut ctx, start)
        }
        None => Ok(start),
    };

    let (status, error, trailing) = match result {
        Ok(end) => {
            let trailing = (end < reader.len()).then(|| Trailing {
                offset: end,
                len: reader.len() - end,
            });
            (DecodeStatus::Complete, None, trailing)
        }
        Err(err) => {
            warn!(
                conversation = message.conversation.0,
                seq = message.seq,
                command,
                error = %err,
                "partial decode"
            );
            (DecodeStatus::Partial, Some(err.to_string()), None)
        }
    };

    let fields = if options.include_fields {
        tree.finish()
    } else {
        Vec::new()
    };

    DecodedMessage {
        summary,
        direction: message.direction,
        command: Some(command),
        status,
        error,
        fields,
        trailing,
    }
}

fn orphaned() -> DecodedMessage {
    DecodedMessage {
        summary: ORPHAN_SUMMARY.to_string(),
        direction: Direction::Reply,
        command: None,
        status: DecodeStatus::Orphaned,
        error: None,
        fields: Vec::new(),
        trailing: None,
    }
}

fn empty_request() -> DecodedMessage {
    DecodedMessage {
        summary: "AFP request".to_string(),
        direction: Direction::Request,
        command: None,
        status: DecodeStatus::Partial,
        error: Some(AfpError::EmptyPayload.to_string()),
        fields: Vec::new(),
        trailing: None,
    }
}
