//! afpscope core library for offline AFP message decoding.
//!
//! This crate implements the pipeline used by the CLI: message sources feed
//! the analysis layer, which drives the AFP decoder (layout/reader/parser)
//! and collects the decoded messages into a deterministic report. Decoding is
//! byte-oriented and side-effect free; all I/O is isolated in `source`
//! modules.
//!
//! Invariants:
//! - Messages appear in the report in input order.
//! - A reply is decoded with the command of the request that shares its
//!   conversation and sequence number; without one it is orphaned.
//! - A malformed message never stops the run; it is reported as partial.
//!
//! Version française (résumé):
//! Cette crate fournit le cœur de décodage hors ligne : sources -> analyse ->
//! décodeur AFP (layout/reader/parser) -> rapport déterministe. Les E/S
//! restent dans `source`. Garanties : ordre d'entrée conservé, réponses
//! associées à leur requête, message tronqué signalé comme partiel.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use afpscope_core::{DecodeOptions, analyze_message_file};
//!
//! let report = analyze_message_file(Path::new("session.jsonl"), DecodeOptions::default())?;
//! println!("messages: {}", report.summary.messages);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
pub mod protocols;
mod source;

pub use analysis::{AnalysisError, analyze_message_file, analyze_source};
pub use protocols::afp::{
    AfpDate, AfpError, AfpMessage, ConversationId, DecodeOptions, DecodeStatus, DecodedMessage,
    Direction, FieldNode, FieldSink, FieldTree, FieldValue, SessionStore, Trailing,
    TransactionKey, decode_message,
};
pub use source::{JsonLinesSource, MessageEvent, MessageSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Decoded messages of one input, in input order.
///
/// # Examples
/// ```
/// use afpscope_core::make_stub_report;
///
/// let report = make_stub_report("session.jsonl", 123);
/// assert_eq!(report.report_version, afpscope_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Input file metadata.
    pub input: InputInfo,
    /// Message and transaction counts.
    pub summary: ReportSummary,
    /// Decoded messages in input order.
    pub messages: Vec<MessageReport>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use afpscope_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "afpscope".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "afpscope");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "afpscope").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input file metadata embedded in reports.
///
/// # Examples
/// ```
/// use afpscope_core::InputInfo;
///
/// let input = InputInfo {
///     path: "session.jsonl".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Counts over all decoded messages.
///
/// # Examples
/// ```
/// use afpscope_core::ReportSummary;
///
/// let summary = ReportSummary::default();
/// assert_eq!(summary.messages, 0);
/// assert!(!summary.has_issues());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Messages read from the input.
    pub messages: u64,
    pub requests: u64,
    pub replies: u64,
    /// Messages decoded without error.
    pub complete: u64,
    /// Messages cut short by a malformed field.
    pub partial: u64,
    /// Replies without a recorded request.
    pub orphaned: u64,
    /// Messages whose command code has no decoder.
    pub unknown_commands: u64,
    /// Distinct transactions recorded by the session store.
    pub transactions: u64,
}

impl ReportSummary {
    /// True when any message is partial or orphaned.
    pub fn has_issues(&self) -> bool {
        self.partial > 0 || self.orphaned > 0
    }
}

/// One decoded message with its position and session identity.
///
/// # Examples
/// ```
/// use afpscope_core::{ConversationId, DecodeStatus, DecodedMessage, Direction, MessageReport};
///
/// let message = MessageReport {
///     index: 0,
///     conversation: ConversationId(1),
///     seq: 5,
///     decoded: DecodedMessage {
///         summary: "FPLogin request".to_string(),
///         direction: Direction::Request,
///         command: Some(18),
///         status: DecodeStatus::Complete,
///         error: None,
///         fields: Vec::new(),
///         trailing: None,
///     },
/// };
/// assert_eq!(message.decoded.summary, "FPLogin request");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReport {
    /// Zero-based position in the input.
    pub index: u64,
    pub conversation: ConversationId,
    pub seq: u16,
    #[serde(flatten)]
    pub decoded: DecodedMessage,
}

/// Build a stub report with base fields filled and no messages.
///
/// # Examples
/// ```
/// use afpscope_core::make_stub_report;
///
/// let report = make_stub_report("session.jsonl", 123);
/// assert_eq!(report.input.bytes, 123);
/// assert!(report.messages.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "afpscope".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        summary: ReportSummary::default(),
        messages: vec![],
    }
}
