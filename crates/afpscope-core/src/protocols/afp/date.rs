use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use super::layout;

/// An AFP date: signed seconds since 2000-01-01T00:00:00Z.
///
/// The raw pattern `0x80000000` means "not set" and is kept as a distinct
/// variant instead of being converted.
///
/// # Examples
/// ```
/// use afpscope_core::AfpDate;
///
/// assert_eq!(AfpDate::from_raw(0).unix_seconds(), Some(946_684_800));
/// assert_eq!(AfpDate::from_raw(0x8000_0000), AfpDate::NotSet);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AfpDate {
    NotSet,
    Set { raw: u32, unix: i64 },
}

impl AfpDate {
    pub fn from_raw(raw: u32) -> Self {
        if raw == layout::DATE_NOT_SET {
            return AfpDate::NotSet;
        }
        let unix = (raw as i32) as i64 + layout::DATE_DELTA;
        AfpDate::Set { raw, unix }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, AfpDate::Set { .. })
    }

    pub fn unix_seconds(&self) -> Option<i64> {
        match self {
            AfpDate::NotSet => None,
            AfpDate::Set { unix, .. } => Some(*unix),
        }
    }

    pub fn to_rfc3339(&self) -> Option<String> {
        let unix = self.unix_seconds()?;
        OffsetDateTime::from_unix_timestamp(unix)
            .ok()
            .and_then(|dt| dt.format(&Rfc3339).ok())
    }
}

impl std::fmt::Display for AfpDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_rfc3339() {
            Some(text) => write!(f, "{text}"),
            None => write!(f, "not set"),
        }
    }
}
