use thiserror::Error;

/// Errors returned while decoding a single AFP message.
///
/// Every variant aborts the current message only; fields emitted before the
/// failure are kept and the message is reported as partially decoded.
///
/// # Examples
/// ```
/// use afpscope_core::AfpError;
///
/// let err = AfpError::TooShort { needed: 8, actual: 4 };
/// assert!(err.to_string().contains("payload too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AfpError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("missing NUL terminator for string at offset {offset}")]
    MissingTerminator { offset: usize },
    #[error("empty payload")]
    EmptyPayload,
}
