use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::protocols::afp::{AfpMessage, DecodeOptions, SessionStore, decode_message};
use crate::source::{JsonLinesSource, MessageEvent, MessageSource, SourceError};
use crate::{MessageReport, Report, make_stub_report};

mod summary;

use summary::tally;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub fn analyze_message_file(path: &Path, options: DecodeOptions) -> Result<Report, AnalysisError> {
    let source = JsonLinesSource::open(path)?;
    analyze_source(path, source, options)
}

/// Decode every message of `source` with a fresh session store.
pub fn analyze_source<S: MessageSource>(
    path: &Path,
    mut source: S,
    options: DecodeOptions,
) -> Result<Report, AnalysisError> {
    let mut store = SessionStore::new();
    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());

    while let Some(MessageEvent {
        conversation,
        seq,
        direction,
        payload,
    }) = source.next_message()?
    {
        let message = AfpMessage {
            conversation,
            seq,
            direction,
            payload: &payload,
        };
        let decoded = decode_message(&mut store, &message, options);
        tally(&mut report.summary, &decoded);
        report.messages.push(MessageReport {
            index: report.messages.len() as u64,
            conversation,
            seq,
            decoded,
        });
    }

    report.summary.transactions = store.len() as u64;
    debug!(
        messages = report.summary.messages,
        transactions = report.summary.transactions,
        "analysis finished"
    );
    Ok(report)
}
