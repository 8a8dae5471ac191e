//! Presence-bitmap records.
//!
//! Volume, directory and file parameter records are a 16-bit bitmap followed
//! by the selected fields in bit order. One table per record kind drives both
//! the emitting parser here and the name replay in [`super::name`].

use std::ops::Range;

use super::date::AfpDate;
use super::error::AfpError;
use super::fields::{self, Field};
use super::layout;
use super::reader::{AfpReader, bytes_to_hex, bytes_to_text};
use super::tree::{FieldSink, FieldValue};

/// One boolean sub-field of a flags integer.
#[derive(Debug)]
pub struct FlagBit {
    pub mask: u32,
    pub field: &'static Field,
    /// Not meaningful on shared (file/dir) parameter records.
    pub hidden_when_shared: bool,
}

/// A flags integer broken down into boolean sub-fields.
#[derive(Debug)]
pub struct FlagGroup {
    pub field: &'static Field,
    /// Display prefix; the value is appended as `0x%04x`.
    pub label: Option<&'static str>,
    pub flags: &'static [FlagBit],
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Uint,
    Date,
    Bytes,
    Flags(&'static FlagGroup),
    /// 2-byte offset from the record base to a length-prefixed name.
    NameOffset {
        name: &'static Field,
        /// The name used to label the record (long name, volume name).
        primary: bool,
    },
    /// Advanced over without interpretation.
    Reserved,
}

/// One entry of a bitmap width table.
#[derive(Debug)]
pub struct BitmapField {
    pub mask: u16,
    pub width: usize,
    pub kind: FieldKind,
    /// Field emitted for the decoded value.
    pub field: &'static Field,
    /// Boolean sub-field of the bitmap itself.
    pub bit: &'static Field,
}

/// A bitmap kind: the bitmap field and its entries in wire order.
#[derive(Debug)]
pub struct BitmapTable {
    pub bitmap: &'static Field,
    pub entries: &'static [BitmapField],
}

impl BitmapTable {
    /// Bytes occupied by the fixed part of a record for `bitmap`.
    pub fn fixed_len(&self, bitmap: u16) -> usize {
        self.entries
            .iter()
            .filter(|entry| bitmap & entry.mask != 0)
            .map(|entry| entry.width)
            .sum()
    }
}

/// Per-call decoding context.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapContext {
    /// Record comes from a call shared by files and directories.
    pub shared: bool,
}

macro_rules! flag {
    ($mask:expr, $field:ident) => {
        FlagBit {
            mask: $mask as u32,
            field: &fields::$field,
            hidden_when_shared: false,
        }
    };
    ($mask:expr, $field:ident, shared_hidden) => {
        FlagBit {
            mask: $mask as u32,
            field: &fields::$field,
            hidden_when_shared: true,
        }
    };
}

pub static VOL_ATTRIBUTES: FlagGroup = FlagGroup {
    field: &fields::VOL_ATTRIBUTE,
    label: None,
    flags: &[
        flag!(layout::VOL_READ_ONLY, VOL_ATTRIBUTE_READ_ONLY),
        flag!(layout::VOL_HAS_PASSWORD, VOL_ATTRIBUTE_PASSWD),
        flag!(layout::VOL_SUPPORTS_FILE_IDS, VOL_ATTRIBUTE_FILE_IDS),
        flag!(layout::VOL_SUPPORTS_CAT_SEARCH, VOL_ATTRIBUTE_CAT_SEARCH),
        flag!(layout::VOL_SUPPORTS_BLANK_PRIVS, VOL_ATTRIBUTE_BLANK_PRIVS),
        flag!(layout::VOL_SUPPORTS_UNIX_PRIVS, VOL_ATTRIBUTE_UNIX_PRIVS),
        flag!(layout::VOL_SUPPORTS_UTF8_NAMES, VOL_ATTRIBUTE_UTF8_NAMES),
    ],
};

pub static FILE_ATTRIBUTES: FlagGroup = FlagGroup {
    field: &fields::FILE_ATTRIBUTE,
    label: Some("File Attributes"),
    flags: &[
        flag!(layout::INVISIBLE_BIT, FILE_ATTRIBUTE_INVISIBLE),
        flag!(layout::MULTI_USER_BIT, FILE_ATTRIBUTE_MULTI_USER, shared_hidden),
        flag!(layout::SYSTEM_BIT, FILE_ATTRIBUTE_SYSTEM),
        flag!(layout::DATA_ALREADY_OPEN_BIT, FILE_ATTRIBUTE_DF_OPEN, shared_hidden),
        flag!(layout::RSRC_ALREADY_OPEN_BIT, FILE_ATTRIBUTE_RF_OPEN, shared_hidden),
        flag!(layout::WRITE_INHIBIT_BIT, FILE_ATTRIBUTE_WRITE_INHIBIT, shared_hidden),
        flag!(layout::BACKUP_NEEDED_BIT, FILE_ATTRIBUTE_BACKUP_NEEDED),
        flag!(layout::RENAME_INHIBIT_BIT, FILE_ATTRIBUTE_RENAME_INHIBIT),
        flag!(layout::DELETE_INHIBIT_BIT, FILE_ATTRIBUTE_DELETE_INHIBIT),
        flag!(layout::COPY_PROTECT_BIT, FILE_ATTRIBUTE_COPY_PROTECT, shared_hidden),
        flag!(layout::SET_CLEAR_BIT, FILE_ATTRIBUTE_SET_CLEAR),
    ],
};

// Directory attributes reuse the file attribute bit positions.
pub static DIR_ATTRIBUTES: FlagGroup = FlagGroup {
    field: &fields::DIR_ATTRIBUTE,
    label: Some("Directory Attributes"),
    flags: &[
        flag!(layout::INVISIBLE_BIT, DIR_ATTRIBUTE_INVISIBLE),
        flag!(layout::MULTI_USER_BIT, DIR_ATTRIBUTE_SHARE),
        flag!(layout::SYSTEM_BIT, DIR_ATTRIBUTE_SYSTEM),
        flag!(layout::DATA_ALREADY_OPEN_BIT, DIR_ATTRIBUTE_MOUNTED),
        flag!(layout::RSRC_ALREADY_OPEN_BIT, DIR_ATTRIBUTE_IN_EXPORTED),
        flag!(layout::BACKUP_NEEDED_BIT, DIR_ATTRIBUTE_BACKUP_NEEDED),
        flag!(layout::RENAME_INHIBIT_BIT, DIR_ATTRIBUTE_RENAME_INHIBIT),
        flag!(layout::DELETE_INHIBIT_BIT, DIR_ATTRIBUTE_DELETE_INHIBIT),
        flag!(layout::SET_CLEAR_BIT, DIR_ATTRIBUTE_SET_CLEAR),
    ],
};

pub static ACCESS_RIGHTS: FlagGroup = FlagGroup {
    field: &fields::DIR_AR,
    label: None,
    flags: &[
        flag!(layout::AR_OWNER_SEARCH, DIR_AR_O_SEARCH),
        flag!(layout::AR_OWNER_READ, DIR_AR_O_READ),
        flag!(layout::AR_OWNER_WRITE, DIR_AR_O_WRITE),
        flag!(layout::AR_GROUP_SEARCH, DIR_AR_G_SEARCH),
        flag!(layout::AR_GROUP_READ, DIR_AR_G_READ),
        flag!(layout::AR_GROUP_WRITE, DIR_AR_G_WRITE),
        flag!(layout::AR_EVERYONE_SEARCH, DIR_AR_E_SEARCH),
        flag!(layout::AR_EVERYONE_READ, DIR_AR_E_READ),
        flag!(layout::AR_EVERYONE_WRITE, DIR_AR_E_WRITE),
        flag!(layout::AR_USER_SEARCH, DIR_AR_U_SEARCH),
        flag!(layout::AR_USER_READ, DIR_AR_U_READ),
        flag!(layout::AR_USER_WRITE, DIR_AR_U_WRITE),
        flag!(layout::AR_BLANK, DIR_AR_BLANK),
        flag!(layout::AR_USER_IS_OWNER, DIR_AR_U_OWN),
    ],
};

pub static ACCESS_MODE: FlagGroup = FlagGroup {
    field: &fields::ACCESS_MODE,
    label: None,
    flags: &[
        flag!(layout::ACCESS_READ, ACCESS_READ),
        flag!(layout::ACCESS_WRITE, ACCESS_WRITE),
        flag!(layout::ACCESS_DENY_READ, ACCESS_DENY_READ),
        flag!(layout::ACCESS_DENY_WRITE, ACCESS_DENY_WRITE),
    ],
};

pub static LOCK_FLAGS: FlagGroup = FlagGroup {
    field: &fields::LOCK_FLAGS,
    label: None,
    flags: &[
        flag!(layout::UNLOCK_FLAG, LOCK_OP),
        flag!(layout::FROM_END_FLAG, LOCK_FROM),
    ],
};

macro_rules! entry {
    ($mask:expr, $width:expr, $kind:expr, $field:ident, $bit:ident) => {
        BitmapField {
            mask: $mask,
            width: $width,
            kind: $kind,
            field: &fields::$field,
            bit: &fields::$bit,
        }
    };
}

pub static VOL_FIELDS: BitmapTable = BitmapTable {
    bitmap: &fields::VOL_BITMAP,
    entries: &[
        entry!(layout::VOL_ATTRIBUTE_BIT, 2, FieldKind::Flags(&VOL_ATTRIBUTES), VOL_ATTRIBUTE, VOL_BITMAP_ATTRIBUTES),
        entry!(layout::VOL_SIGNATURE_BIT, 2, FieldKind::Uint, VOL_SIGNATURE, VOL_BITMAP_SIGNATURE),
        entry!(layout::VOL_CREATE_DATE_BIT, 4, FieldKind::Date, VOL_CREATION_DATE, VOL_BITMAP_CREATE_DATE),
        entry!(layout::VOL_MOD_DATE_BIT, 4, FieldKind::Date, VOL_MODIFICATION_DATE, VOL_BITMAP_MOD_DATE),
        entry!(layout::VOL_BACKUP_DATE_BIT, 4, FieldKind::Date, VOL_BACKUP_DATE, VOL_BITMAP_BACKUP_DATE),
        entry!(layout::VOL_ID_BIT, 2, FieldKind::Uint, VOL_ID, VOL_BITMAP_ID),
        entry!(layout::VOL_BYTES_FREE_BIT, 4, FieldKind::Uint, VOL_BYTES_FREE, VOL_BITMAP_BYTES_FREE),
        entry!(layout::VOL_BYTES_TOTAL_BIT, 4, FieldKind::Uint, VOL_BYTES_TOTAL, VOL_BITMAP_BYTES_TOTAL),
        entry!(
            layout::VOL_NAME_BIT,
            2,
            FieldKind::NameOffset { name: &fields::VOL_NAME, primary: true },
            BITMAP_OFFSET,
            VOL_BITMAP_NAME
        ),
        entry!(layout::VOL_EXT_BYTES_FREE_BIT, 8, FieldKind::Uint, VOL_EXT_BYTES_FREE, VOL_BITMAP_EXT_BYTES_FREE),
        entry!(layout::VOL_EXT_BYTES_TOTAL_BIT, 8, FieldKind::Uint, VOL_EXT_BYTES_TOTAL, VOL_BITMAP_EXT_BYTES_TOTAL),
        entry!(layout::VOL_BLOCK_SIZE_BIT, 4, FieldKind::Uint, VOL_BLOCK_SIZE, VOL_BITMAP_BLOCK_SIZE),
    ],
};

pub static DIR_FIELDS: BitmapTable = BitmapTable {
    bitmap: &fields::DIR_BITMAP,
    entries: &[
        entry!(layout::ATTRIBUTE_BIT, 2, FieldKind::Flags(&DIR_ATTRIBUTES), DIR_ATTRIBUTE, DIR_BITMAP_ATTRIBUTES),
        entry!(layout::PARENT_DIR_ID_BIT, 4, FieldKind::Uint, DID, DIR_BITMAP_DID),
        entry!(layout::CREATE_DATE_BIT, 4, FieldKind::Date, CREATION_DATE, DIR_BITMAP_CREATE_DATE),
        entry!(layout::MOD_DATE_BIT, 4, FieldKind::Date, MODIFICATION_DATE, DIR_BITMAP_MOD_DATE),
        entry!(layout::BACKUP_DATE_BIT, 4, FieldKind::Date, BACKUP_DATE, DIR_BITMAP_BACKUP_DATE),
        entry!(layout::FINDER_INFO_BIT, layout::FINDER_INFO_LEN, FieldKind::Bytes, FINDER_INFO, DIR_BITMAP_FINDER_INFO),
        entry!(
            layout::LONG_NAME_BIT,
            2,
            FieldKind::NameOffset { name: &fields::PATH_NAME, primary: true },
            BITMAP_OFFSET,
            DIR_BITMAP_LONG_NAME
        ),
        entry!(
            layout::SHORT_NAME_BIT,
            2,
            FieldKind::NameOffset { name: &fields::PATH_NAME, primary: false },
            BITMAP_OFFSET,
            DIR_BITMAP_SHORT_NAME
        ),
        entry!(layout::NODE_ID_BIT, 4, FieldKind::Uint, FILE_ID, DIR_BITMAP_FID),
        entry!(layout::OFFSPRING_COUNT_BIT, 2, FieldKind::Uint, DIR_OFFSPRING, DIR_BITMAP_OFFSPRING),
        entry!(layout::OWNER_ID_BIT, 4, FieldKind::Uint, DIR_OWNER_ID, DIR_BITMAP_OWNER_ID),
        entry!(layout::GROUP_ID_BIT, 4, FieldKind::Uint, DIR_GROUP_ID, DIR_BITMAP_GROUP_ID),
        entry!(layout::ACCESS_RIGHTS_BIT, 4, FieldKind::Flags(&ACCESS_RIGHTS), DIR_AR, DIR_BITMAP_ACCESS_RIGHTS),
        entry!(layout::UTF8_NAME_BIT, 2, FieldKind::Reserved, RESERVED, DIR_BITMAP_UTF8_NAME),
        entry!(layout::DIR_UNIX_PRIVS_BIT, 4, FieldKind::Reserved, RESERVED, DIR_BITMAP_UNIX_PRIVS),
    ],
};

pub static FILE_FIELDS: BitmapTable = BitmapTable {
    bitmap: &fields::FILE_BITMAP,
    entries: &[
        entry!(layout::ATTRIBUTE_BIT, 2, FieldKind::Flags(&FILE_ATTRIBUTES), FILE_ATTRIBUTE, FILE_BITMAP_ATTRIBUTES),
        entry!(layout::PARENT_DIR_ID_BIT, 4, FieldKind::Uint, DID, FILE_BITMAP_DID),
        entry!(layout::CREATE_DATE_BIT, 4, FieldKind::Date, CREATION_DATE, FILE_BITMAP_CREATE_DATE),
        entry!(layout::MOD_DATE_BIT, 4, FieldKind::Date, MODIFICATION_DATE, FILE_BITMAP_MOD_DATE),
        entry!(layout::BACKUP_DATE_BIT, 4, FieldKind::Date, BACKUP_DATE, FILE_BITMAP_BACKUP_DATE),
        entry!(layout::FINDER_INFO_BIT, layout::FINDER_INFO_LEN, FieldKind::Bytes, FINDER_INFO, FILE_BITMAP_FINDER_INFO),
        entry!(
            layout::LONG_NAME_BIT,
            2,
            FieldKind::NameOffset { name: &fields::PATH_NAME, primary: true },
            BITMAP_OFFSET,
            FILE_BITMAP_LONG_NAME
        ),
        entry!(
            layout::SHORT_NAME_BIT,
            2,
            FieldKind::NameOffset { name: &fields::PATH_NAME, primary: false },
            BITMAP_OFFSET,
            FILE_BITMAP_SHORT_NAME
        ),
        entry!(layout::NODE_ID_BIT, 4, FieldKind::Uint, FILE_ID, FILE_BITMAP_FID),
        entry!(layout::DATA_FORK_LEN_BIT, 4, FieldKind::Uint, DATA_FORK_LEN, FILE_BITMAP_DATA_FORK_LEN),
        entry!(layout::RSRC_FORK_LEN_BIT, 4, FieldKind::Uint, RSRC_FORK_LEN, FILE_BITMAP_RSRC_FORK_LEN),
        entry!(layout::EXT_DATA_FORK_LEN_BIT, 8, FieldKind::Uint, EXT_DATA_FORK_LEN, FILE_BITMAP_EXT_DATA_FORK_LEN),
        entry!(layout::LAUNCH_LIMIT_BIT, 2, FieldKind::Reserved, RESERVED, FILE_BITMAP_LAUNCH_LIMIT),
        entry!(layout::UTF8_NAME_BIT, 2, FieldKind::Reserved, RESERVED, FILE_BITMAP_UTF8_NAME),
        entry!(layout::EXT_RSRC_FORK_LEN_BIT, 8, FieldKind::Uint, EXT_RSRC_FORK_LEN, FILE_BITMAP_EXT_RSRC_FORK_LEN),
        entry!(layout::FILE_UNIX_PRIVS_BIT, 4, FieldKind::Uint, UNIX_PRIVS, FILE_BITMAP_UNIX_PRIVS),
    ],
};

/// Read a big-endian unsigned integer of 1, 2, 4 or 8 bytes.
pub fn read_uint(reader: &AfpReader<'_>, offset: usize, width: usize) -> Result<u64, AfpError> {
    match width {
        1 => reader.read_u8(offset).map(u64::from),
        2 => reader.read_u16_be(offset).map(u64::from),
        4 => reader.read_u32_be(offset).map(u64::from),
        _ => reader.read_u64_be(offset),
    }
}

/// Emit a flags integer with one boolean child per known bit.
pub fn emit_flags(
    sink: &mut dyn FieldSink,
    group: &'static FlagGroup,
    range: Range<usize>,
    value: u32,
    ctx: BitmapContext,
) {
    let label = group
        .label
        .map(|prefix| format!("{prefix}: 0x{value:04x}"));
    sink.open(group.field, range.clone(), FieldValue::Uint(u64::from(value)), label);
    for flag in group.flags {
        if ctx.shared && flag.hidden_when_shared {
            continue;
        }
        sink.add(flag.field, range.clone(), FieldValue::Bool(value & flag.mask != 0));
    }
    sink.close();
}

/// Read a flags integer of `width` bytes at `offset` and emit it.
pub fn decode_flags(
    sink: &mut dyn FieldSink,
    reader: &AfpReader<'_>,
    offset: usize,
    width: usize,
    group: &'static FlagGroup,
) -> Result<u32, AfpError> {
    let value = read_uint(reader, offset, width)? as u32;
    emit_flags(sink, group, offset..offset + width, value, BitmapContext::default());
    Ok(value)
}

fn decode_bitmap(
    sink: &mut dyn FieldSink,
    reader: &AfpReader<'_>,
    offset: usize,
    table: &'static BitmapTable,
) -> Result<u16, AfpError> {
    let bitmap = reader.read_u16_be(offset)?;
    let range = offset..offset + 2;
    sink.open(table.bitmap, range.clone(), FieldValue::Uint(u64::from(bitmap)), None);
    for entry in table.entries {
        sink.add(entry.bit, range.clone(), FieldValue::Bool(bitmap & entry.mask != 0));
    }
    sink.close();
    Ok(bitmap)
}

/// Emit the volume bitmap at `offset`. The caller advances by 2.
pub fn decode_vol_bitmap(
    sink: &mut dyn FieldSink,
    reader: &AfpReader<'_>,
    offset: usize,
) -> Result<u16, AfpError> {
    decode_bitmap(sink, reader, offset, &VOL_FIELDS)
}

/// Emit the directory bitmap at `offset`. The caller advances by 2.
pub fn decode_dir_bitmap(
    sink: &mut dyn FieldSink,
    reader: &AfpReader<'_>,
    offset: usize,
) -> Result<u16, AfpError> {
    decode_bitmap(sink, reader, offset, &DIR_FIELDS)
}

/// Emit the file bitmap at `offset`. The caller advances by 2.
pub fn decode_file_bitmap(
    sink: &mut dyn FieldSink,
    reader: &AfpReader<'_>,
    offset: usize,
) -> Result<u16, AfpError> {
    decode_bitmap(sink, reader, offset, &FILE_FIELDS)
}

/// Decode the fields selected by `bitmap` starting at `record_base`.
///
/// Returns the end of the record: the cursor after the fixed part, or the
/// end of the furthest indirected name when that lies further.
pub fn parse_bitmap(
    sink: &mut dyn FieldSink,
    reader: &AfpReader<'_>,
    record_base: usize,
    bitmap: u16,
    table: &'static BitmapTable,
    ctx: BitmapContext,
) -> Result<usize, AfpError> {
    let mut cursor = record_base;
    let mut max_side_read: Option<usize> = None;

    for entry in table.entries {
        if bitmap & entry.mask == 0 {
            continue;
        }
        let range = cursor..cursor + entry.width;
        match entry.kind {
            FieldKind::Uint => {
                let value = read_uint(reader, cursor, entry.width)?;
                sink.add(entry.field, range, FieldValue::Uint(value));
            }
            FieldKind::Date => {
                let raw = reader.read_u32_be(cursor)?;
                sink.add(entry.field, range, FieldValue::Date(AfpDate::from_raw(raw)));
            }
            FieldKind::Bytes => {
                let bytes = reader.read_slice(range.clone())?;
                sink.add(entry.field, range, FieldValue::Bytes(bytes_to_hex(bytes)));
            }
            FieldKind::Flags(group) => {
                let value = read_uint(reader, cursor, entry.width)? as u32;
                emit_flags(sink, group, range, value, ctx);
            }
            FieldKind::NameOffset { name, .. } => {
                let name_offset = reader.read_u16_be(cursor)?;
                sink.add(entry.field, range, FieldValue::Uint(u64::from(name_offset)));
                if name_offset != 0 {
                    let end = side_read_name(sink, reader, record_base + name_offset as usize, name)?;
                    max_side_read = Some(max_side_read.map_or(end, |max| max.max(end)));
                }
            }
            FieldKind::Reserved => {
                reader.read_slice(range.clone())?;
                sink.add(entry.field, range, FieldValue::None);
            }
        }
        cursor += entry.width;
    }

    Ok(max_side_read.map_or(cursor, |side| side.max(cursor)))
}

/// Emit the length-prefixed name at `offset`; returns its end offset.
fn side_read_name(
    sink: &mut dyn FieldSink,
    reader: &AfpReader<'_>,
    offset: usize,
    name: &'static Field,
) -> Result<usize, AfpError> {
    let bytes = reader.read_pascal(offset)?;
    let start = offset + 1;
    let end = start + bytes.len();
    sink.add(&fields::PATH_LEN, offset..start, FieldValue::Uint(bytes.len() as u64));
    sink.add(
        name,
        start..end,
        FieldValue::Text(bytes_to_text(bytes, layout::NAME_NUL_PLACEHOLDER)),
    );
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::afp::tree::{FieldNode, FieldTree, find_all, find_field};

    fn run(
        payload: &[u8],
        bitmap: u16,
        table: &'static BitmapTable,
        ctx: BitmapContext,
    ) -> (Result<usize, AfpError>, Vec<FieldNode>) {
        let reader = AfpReader::new(payload);
        let mut tree = FieldTree::new();
        let end = parse_bitmap(&mut tree, &reader, 0, bitmap, table, ctx);
        (end, tree.finish())
    }

    #[test]
    fn bitmap_node_lists_every_bit() {
        let payload = 0x0120u16.to_be_bytes();
        let reader = AfpReader::new(&payload);
        let mut tree = FieldTree::new();
        let bitmap = decode_vol_bitmap(&mut tree, &reader, 0).unwrap();
        assert_eq!(bitmap, 0x0120);

        let nodes = tree.finish();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].children.len(), VOL_FIELDS.entries.len());
        let set: Vec<_> = nodes[0]
            .children
            .iter()
            .filter(|node| node.value == FieldValue::Bool(true))
            .map(|node| node.id.as_str())
            .collect();
        assert_eq!(set, ["afp.vol_bitmap.id", "afp.vol_bitmap.name"]);
    }

    fn check_all_subsets(table: &'static BitmapTable) {
        let defined = table.entries.iter().fold(0u16, |acc, entry| acc | entry.mask);
        let name_bits = table
            .entries
            .iter()
            .filter(|entry| matches!(entry.kind, FieldKind::NameOffset { .. }))
            .fold(0u16, |acc, entry| acc | entry.mask);

        for bitmap in 0..=u16::MAX {
            if bitmap & !(defined & !name_bits) != 0 {
                continue;
            }
            let expected_len = table.fixed_len(bitmap);
            let payload = vec![0u8; expected_len];
            let (end, nodes) = run(&payload, bitmap, table, BitmapContext::default());
            assert_eq!(end.unwrap(), expected_len, "{} {bitmap:#06x}", table.bitmap.id);

            let expected: Vec<_> = table
                .entries
                .iter()
                .filter(|entry| bitmap & entry.mask != 0)
                .map(|entry| entry.field.id)
                .collect();
            let ids: Vec<_> = nodes.iter().map(|node| node.id.as_str()).collect();
            assert_eq!(ids, expected, "{} {bitmap:#06x}", table.bitmap.id);

            let mut offset = 0;
            for (node, entry) in nodes
                .iter()
                .zip(table.entries.iter().filter(|entry| bitmap & entry.mask != 0))
            {
                assert_eq!((node.offset, node.len), (offset, entry.width));
                offset += entry.width;
            }
        }
    }

    #[test]
    fn every_file_subset_emits_in_order_and_ends_at_fixed_len() {
        check_all_subsets(&FILE_FIELDS);
    }

    #[test]
    fn every_dir_subset_emits_in_order_and_ends_at_fixed_len() {
        check_all_subsets(&DIR_FIELDS);
    }

    #[test]
    fn every_vol_subset_emits_in_order_and_ends_at_fixed_len() {
        check_all_subsets(&VOL_FIELDS);
    }

    #[test]
    fn fields_are_emitted_in_table_order() {
        let bitmap = layout::NODE_ID_BIT | layout::PARENT_DIR_ID_BIT | layout::OFFSPRING_COUNT_BIT;
        let mut payload = Vec::new();
        payload.extend_from_slice(&2u32.to_be_bytes());
        payload.extend_from_slice(&77u32.to_be_bytes());
        payload.extend_from_slice(&5u16.to_be_bytes());

        let (end, nodes) = run(&payload, bitmap, &DIR_FIELDS, BitmapContext::default());
        assert_eq!(end.unwrap(), 10);
        let ids: Vec<_> = nodes.iter().map(|node| node.id.as_str()).collect();
        assert_eq!(ids, ["afp.did", "afp.file_id", "afp.dir_offspring"]);
        assert_eq!(nodes[1].value, FieldValue::Uint(77));
        assert_eq!(nodes[2].offset, 8);
    }

    #[test]
    fn long_name_is_read_through_offset() {
        let bitmap = layout::ATTRIBUTE_BIT | layout::LONG_NAME_BIT;
        // attributes, name offset 4, then the name.
        let payload = [0x00, 0x01, 0x00, 0x04, 3, b'a', b'b', b'c'];
        let (end, nodes) = run(&payload, bitmap, &DIR_FIELDS, BitmapContext::default());

        assert_eq!(end.unwrap(), 4 + 1 + 3);
        let name = find_field(&nodes, "afp.path_name").unwrap();
        assert_eq!(name.value, FieldValue::Text("abc".into()));
        assert_eq!(name.offset, 5);
        let attrs = find_field(&nodes, "afp.dir_attribute").unwrap();
        assert_eq!(attrs.label.as_deref(), Some("Directory Attributes: 0x0001"));
    }

    #[test]
    fn zero_name_offset_means_absent() {
        let bitmap = layout::LONG_NAME_BIT | layout::NODE_ID_BIT;
        let payload = [0x00, 0x00, 0, 0, 0, 9];
        let (end, nodes) = run(&payload, bitmap, &FILE_FIELDS, BitmapContext::default());
        assert_eq!(end.unwrap(), 6);
        assert!(find_field(&nodes, "afp.path_name").is_none());
        assert!(find_field(&nodes, "afp.bitmap_offset").is_some());
    }

    #[test]
    fn side_read_end_wins_over_cursor() {
        let bitmap = layout::LONG_NAME_BIT | layout::SHORT_NAME_BIT;
        // long name at 4, short name at 8.
        let payload = [0x00, 0x04, 0x00, 0x08, 3, b'L', b'o', b'n', 2, b'S', b'N'];
        let (end, nodes) = run(&payload, bitmap, &FILE_FIELDS, BitmapContext::default());
        assert_eq!(end.unwrap(), payload.len());
        assert_eq!(find_all(&nodes, "afp.path_name").len(), 2);
    }

    #[test]
    fn backward_name_offset_keeps_fixed_extent() {
        let bitmap = layout::LONG_NAME_BIT | layout::NODE_ID_BIT | layout::DATA_FORK_LEN_BIT;
        // The long-name offset points at the node id bytes: a 0-length name.
        let mut payload = vec![0x00, 0x02];
        payload.extend_from_slice(&0u32.to_be_bytes());
        payload.extend_from_slice(&512u32.to_be_bytes());

        let (end, nodes) = run(&payload, bitmap, &FILE_FIELDS, BitmapContext::default());
        assert_eq!(end.unwrap(), 10);
        assert_eq!(
            find_field(&nodes, "afp.data_fork_len").unwrap().value,
            FieldValue::Uint(512)
        );
        assert_eq!(find_field(&nodes, "afp.path_name").unwrap().len, 0);
    }

    #[test]
    fn volume_name_is_indirected() {
        let bitmap = layout::VOL_ID_BIT | layout::VOL_NAME_BIT;
        let payload = [0x00, 0x01, 0x00, 0x04, 4, b'H', b'o', b'm', b'e'];
        let (end, nodes) = run(&payload, bitmap, &VOL_FIELDS, BitmapContext::default());
        assert_eq!(end.unwrap(), 9);
        let name = find_field(&nodes, "afp.vol_name").unwrap();
        assert_eq!(name.value, FieldValue::Text("Home".into()));
    }

    #[test]
    fn shared_context_hides_fork_state_attributes() {
        let payload = 0xffffu16.to_be_bytes();
        let (_, plain) = run(&payload, layout::ATTRIBUTE_BIT, &FILE_FIELDS, BitmapContext::default());
        let (_, shared) = run(
            &payload,
            layout::ATTRIBUTE_BIT,
            &FILE_FIELDS,
            BitmapContext { shared: true },
        );
        assert_eq!(plain[0].children.len(), 11);
        assert_eq!(shared[0].children.len(), 6);
        for hidden in [
            "afp.file_attribute.multi_user",
            "afp.file_attribute.df_open",
            "afp.file_attribute.rf_open",
            "afp.file_attribute.write_inhibit",
            "afp.file_attribute.copy_protect",
        ] {
            assert!(find_field(&shared, hidden).is_none(), "{hidden}");
        }
    }

    #[test]
    fn reserved_bits_advance_without_value() {
        let bitmap = layout::LAUNCH_LIMIT_BIT | layout::UTF8_NAME_BIT | layout::FILE_UNIX_PRIVS_BIT;
        let payload = [0xaa, 0xaa, 0xbb, 0xbb, 0, 0, 0x01, 0xed];
        let (end, nodes) = run(&payload, bitmap, &FILE_FIELDS, BitmapContext::default());
        assert_eq!(end.unwrap(), 8);
        assert_eq!(find_all(&nodes, "afp.reserved").len(), 2);
        assert_eq!(
            find_field(&nodes, "afp.unix_privs").unwrap().value,
            FieldValue::Uint(0x1ed)
        );
    }

    #[test]
    fn dates_surface_not_set() {
        let payload = 0x8000_0000u32.to_be_bytes();
        let (_, nodes) = run(&payload, layout::BACKUP_DATE_BIT, &DIR_FIELDS, BitmapContext::default());
        assert_eq!(nodes[0].value, FieldValue::Date(AfpDate::NotSet));
    }

    #[test]
    fn truncated_record_fails() {
        let payload = [0u8; 3];
        let (end, nodes) = run(
            &payload,
            layout::ATTRIBUTE_BIT | layout::PARENT_DIR_ID_BIT,
            &FILE_FIELDS,
            BitmapContext::default(),
        );
        assert_eq!(end.unwrap_err(), AfpError::TooShort { needed: 6, actual: 3 });
        assert_eq!(nodes.len(), 1);
    }
}
