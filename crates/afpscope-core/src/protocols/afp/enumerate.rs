use tracing::debug;

use super::bitmap::{BitmapContext, DIR_FIELDS, FILE_FIELDS, parse_bitmap};
use super::error::AfpError;
use super::fields;
use super::layout;
use super::name::name_at_offset;
use super::reader::AfpReader;
use super::tree::{FieldSink, FieldValue};

/// Decode `count` enumerate records starting at `offset`.
///
/// Each record is `[size][flag][fields][pad?]`; the flag's high bit selects
/// the directory bitmap. The next record always starts at `start + size`,
/// whatever the field parse consumed.
pub fn decode_enumerate_records(
    sink: &mut dyn FieldSink,
    reader: &AfpReader<'_>,
    offset: usize,
    file_bitmap: u16,
    dir_bitmap: u16,
    count: u16,
) -> Result<usize, AfpError> {
    let mut offset = offset;
    for index in 0..usize::from(count) {
        let start = offset;
        let size = reader.read_u8(start)? as usize;
        let flag = reader.read_u8(start + 1)?;
        let is_dir = flag & layout::DIR_FLAG != 0;
        let (bitmap, table) = if is_dir {
            (dir_bitmap, &DIR_FIELDS)
        } else {
            (file_bitmap, &FILE_FIELDS)
        };
        let record_base = start + 2;

        // A broken name only costs the label; the field parse reports it.
        let label = name_at_offset(reader, record_base, bitmap, table)
            .ok()
            .flatten()
            .unwrap_or_else(|| format!("line {}", index + 1));

        sink.open(
            &fields::ENUMERATE_RECORD,
            start..start + size,
            FieldValue::None,
            Some(label),
        );
        sink.add(&fields::STRUCT_SIZE, start..start + 1, FieldValue::Uint(size as u64));
        sink.add(&fields::FILE_FLAG, start + 1..record_base, FieldValue::Bool(is_dir));

        let mut end = parse_bitmap(sink, reader, record_base, bitmap, table, BitmapContext::default())?;
        if end % 2 == 1 && reader.remaining(end) > 0 {
            sink.add(&fields::PAD, end..end + layout::PAD_LEN, FieldValue::None);
            end += layout::PAD_LEN;
        }
        sink.close();

        let parsed = end - start;
        if parsed != size {
            debug!(
                record = index + 1,
                declared = size,
                parsed,
                "enumerate record size differs from parsed length"
            );
        }
        offset = start + size;
    }
    Ok(offset)
}
