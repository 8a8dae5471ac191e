//! Message sources.
//!
//! A source yields complete AFP messages in delivery order together with the
//! direction, transport sequence number and conversation they belong to.
//! Transport framing and reassembly happen before this layer.

mod jsonl;

pub use jsonl::JsonLinesSource;

use thiserror::Error;

use crate::protocols::afp::{ConversationId, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub conversation: ConversationId,
    pub seq: u16,
    pub direction: Direction,
    pub payload: Vec<u8>,
}

pub trait MessageSource {
    fn next_message(&mut self) -> Result<Option<MessageEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid message record at line {line}: {message}")]
    Record { line: usize, message: String },
}
