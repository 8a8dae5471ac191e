//! AppleTalk Filing Protocol (AFP 2.x/3.0) decoding.
//!
//! The dispatcher pairs each reply with the request it answers through a
//! [`SessionStore`] keyed by conversation and transport sequence number, then
//! runs the command's request or reply decoder. Parameter records are driven
//! by 16-bit presence bitmaps whose width tables live in `bitmap`; names that
//! a record stores by offset are side-read without moving the cursor.
//!
//! Decoding never fails a whole run: an out-of-bounds field stops the current
//! message, which is reported as partial with the fields decoded so far.
//! Bytes past the last decoded field are reported as a trailing extent.
//!
//! Version française (résumé):
//! Le module décode les messages AFP. Les réponses sont associées aux
//! requêtes via `SessionStore`; les enregistrements à bitmap suivent les
//! tables de `bitmap`. Un champ tronqué n'interrompt que le message courant.

pub mod bitmap;
pub mod commands;
pub mod date;
pub mod enumerate;
pub mod error;
pub mod fields;
pub mod layout;
pub mod name;
pub mod parser;
pub mod reader;
pub mod session;
pub mod tree;

pub use date::AfpDate;
pub use error::AfpError;
pub use parser::{
    AfpMessage, DecodeOptions, DecodeStatus, DecodedMessage, Direction, Trailing, decode_message,
};
pub use session::{ConversationId, SessionStore, TransactionKey};
pub use tree::{FieldNode, FieldSink, FieldTree, FieldValue};
