use crate::ReportSummary;
use crate::protocols::afp::commands::command_entry;
use crate::protocols::afp::{DecodeStatus, DecodedMessage, Direction};

pub(super) fn tally(summary: &mut ReportSummary, decoded: &DecodedMessage) {
    summary.messages += 1;
    match decoded.direction {
        Direction::Request => summary.requests += 1,
        Direction::Reply => summary.replies += 1,
    }
    match decoded.status {
        DecodeStatus::Complete => summary.complete += 1,
        DecodeStatus::Partial => summary.partial += 1,
        DecodeStatus::Orphaned => summary.orphaned += 1,
    }
    if decoded
        .command
        .is_some_and(|code| command_entry(code).is_none())
    {
        summary.unknown_commands += 1;
    }
}
