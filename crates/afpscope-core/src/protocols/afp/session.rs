use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Opaque identity of one client/server conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub u64);

/// Key of one outstanding transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionKey {
    pub conversation: ConversationId,
    pub seq: u16,
}

impl TransactionKey {
    pub fn new(conversation: ConversationId, seq: u16) -> Self {
        Self { conversation, seq }
    }
}

/// Request/reply correlation table.
///
/// Replies carry no command code, so the command of each request is kept
/// under its `(conversation, seq)` key. Entries are only dropped in bulk by
/// [`SessionStore::reset_epoch`]; a later request reusing a key keeps the
/// first command.
#[derive(Debug, Default)]
pub struct SessionStore {
    transactions: HashMap<TransactionKey, u8>,
    epoch: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the command of a request; returns the command stored under the
    /// key, which is `command` unless the key was already known.
    pub fn record_request(&mut self, key: TransactionKey, command: u8) -> u8 {
        let stored = *self.transactions.entry(key).or_insert_with(|| {
            debug!(
                conversation = key.conversation.0,
                seq = key.seq,
                command,
                "transaction recorded"
            );
            command
        });
        stored
    }

    pub fn lookup(&self, key: TransactionKey) -> Option<u8> {
        self.transactions.get(&key).copied()
    }

    /// Forget every transaction, e.g. before a new pass over the input.
    pub fn reset_epoch(&mut self) {
        let dropped = self.transactions.len();
        self.transactions.clear();
        self.epoch += 1;
        debug!(epoch = self.epoch, dropped, "session store reset");
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversationId, SessionStore, TransactionKey};

    #[test]
    fn reply_finds_request_command() {
        let mut store = SessionStore::new();
        let key = TransactionKey::new(ConversationId(1), 5);
        assert_eq!(store.record_request(key, 18), 18);
        assert_eq!(store.lookup(key), Some(18));
        assert_eq!(store.lookup(TransactionKey::new(ConversationId(1), 6)), None);
        assert_eq!(store.lookup(TransactionKey::new(ConversationId(2), 5)), None);
    }

    #[test]
    fn first_request_wins() {
        let mut store = SessionStore::new();
        let key = TransactionKey::new(ConversationId(7), 1);
        store.record_request(key, 24);
        assert_eq!(store.record_request(key, 9), 24);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reset_clears_and_bumps_epoch() {
        let mut store = SessionStore::new();
        store.record_request(TransactionKey::new(ConversationId(1), 1), 2);
        assert!(!store.is_empty());
        store.reset_epoch();
        assert!(store.is_empty());
        assert_eq!(store.epoch(), 1);
        assert_eq!(store.lookup(TransactionKey::new(ConversationId(1), 1)), None);
    }
}
