use super::bitmap::{BitmapTable, FieldKind};
use super::error::AfpError;
use super::fields;
use super::layout;
use super::reader::{AfpReader, bytes_to_text};
use super::tree::{FieldSink, FieldValue};

/// Display text for a typed name.
///
/// Short and long names are 8-bit text with NUL shown as `:`; Unicode names
/// are not decoded and only their extent is reported.
pub fn name_text(path_type: u8, bytes: &[u8]) -> String {
    match path_type {
        layout::PATH_UNICODE_NAMES => layout::UNICODE_NAME_PLACEHOLDER.to_string(),
        _ => bytes_to_text(bytes, layout::NAME_NUL_PLACEHOLDER),
    }
}

/// Decode a `[type][len][bytes]` name at `offset` under a group labelled
/// `"{label}: {name}"`, and append `": {name}"` to the summary.
///
/// Returns the offset just past the name.
pub fn decode_name_label(
    sink: &mut dyn FieldSink,
    summary: &mut String,
    reader: &AfpReader<'_>,
    offset: usize,
    label: &str,
) -> Result<usize, AfpError> {
    let path_type = reader.read_u8(offset)?;
    let len = reader.read_u8(offset + 1)? as usize;
    let start = offset + 2;
    let end = start + len;
    let bytes = reader.read_slice(start..end)?;
    let name = name_text(path_type, bytes);

    summary.push_str(": ");
    summary.push_str(&name);

    sink.open(
        &fields::PATH,
        offset..end,
        FieldValue::None,
        Some(format!("{label}: {name}")),
    );
    sink.add(&fields::PATH_TYPE, offset..offset + 1, FieldValue::Uint(u64::from(path_type)));
    sink.add(&fields::PATH_LEN, offset + 1..start, FieldValue::Uint(len as u64));
    sink.add(&fields::PATH_NAME, start..end, FieldValue::Text(name));
    sink.close();

    Ok(end)
}

/// [`decode_name_label`] with the default `Path` label.
pub fn decode_name(
    sink: &mut dyn FieldSink,
    summary: &mut String,
    reader: &AfpReader<'_>,
    offset: usize,
) -> Result<usize, AfpError> {
    decode_name_label(sink, summary, reader, offset, "Path")
}

/// Find the primary name of a bitmap record without emitting anything.
///
/// Replays the width table up to the long-name (or volume-name) entry and
/// reads the name it points at. An unset bit or a zero offset yields `None`.
pub fn name_at_offset(
    reader: &AfpReader<'_>,
    record_base: usize,
    bitmap: u16,
    table: &BitmapTable,
) -> Result<Option<String>, AfpError> {
    let mut cursor = record_base;
    for entry in table.entries {
        if bitmap & entry.mask == 0 {
            continue;
        }
        if let FieldKind::NameOffset { primary: true, .. } = entry.kind {
            let name_offset = reader.read_u16_be(cursor)? as usize;
            if name_offset == 0 {
                return Ok(None);
            }
            let bytes = reader.read_pascal(record_base + name_offset)?;
            return Ok(Some(bytes_to_text(bytes, layout::NAME_NUL_PLACEHOLDER)));
        }
        cursor += entry.width;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::{decode_name, decode_name_label, name_at_offset};
    use crate::protocols::afp::bitmap::{DIR_FIELDS, FILE_FIELDS};
    use crate::protocols::afp::layout;
    use crate::protocols::afp::reader::AfpReader;
    use crate::protocols::afp::tree::{FieldTree, FieldValue, find_field};

    #[test]
    fn long_name_with_nul_keeps_length() {
        let payload = [2, 3, b'a', 0, b'b', 0xff];
        let reader = AfpReader::new(&payload);
        let mut tree = FieldTree::new();
        let mut summary = String::from("FPDelete request");

        let end = decode_name(&mut tree, &mut summary, &reader, 0).unwrap();
        assert_eq!(end, 5);
        assert_eq!(summary, "FPDelete request: a:b");

        let nodes = tree.finish();
        assert_eq!(nodes[0].label.as_deref(), Some("Path: a:b"));
        assert_eq!(nodes[0].len, 5);
        let name = find_field(&nodes, "afp.path_name").unwrap();
        assert_eq!(name.value, FieldValue::Text("a:b".into()));
        assert_eq!(name.len, 3);
    }

    #[test]
    fn unicode_name_is_extent_only() {
        let payload = [3, 4, 0xe2, 0x82, 0xac, b'x'];
        let reader = AfpReader::new(&payload);
        let mut tree = FieldTree::new();
        let mut summary = String::new();

        let end = decode_name_label(&mut tree, &mut summary, &reader, 0, "New name").unwrap();
        assert_eq!(end, 6);
        let nodes = tree.finish();
        let name = find_field(&nodes, "afp.path_name").unwrap();
        assert_eq!(
            name.value,
            FieldValue::Text(layout::UNICODE_NAME_PLACEHOLDER.into())
        );
        assert_eq!(name.len, 4);
        assert!(nodes[0].label.as_deref().unwrap().starts_with("New name: "));
    }

    #[test]
    fn truncated_name_fails() {
        let payload = [2, 9, b'a'];
        let reader = AfpReader::new(&payload);
        let mut tree = FieldTree::new();
        let mut summary = String::new();
        assert!(decode_name(&mut tree, &mut summary, &reader, 0).is_err());
    }

    #[test]
    fn replay_finds_long_name() {
        let bitmap = layout::ATTRIBUTE_BIT | layout::PARENT_DIR_ID_BIT | layout::LONG_NAME_BIT;
        // 2 + 4 bytes, then offset 8 to the name.
        let mut payload = vec![0u8; 6];
        payload.extend_from_slice(&8u16.to_be_bytes());
        payload.extend_from_slice(&[4, b'D', b'o', b'c', b's']);
        let reader = AfpReader::new(&payload);

        let name = name_at_offset(&reader, 0, bitmap, &DIR_FIELDS).unwrap();
        assert_eq!(name.as_deref(), Some("Docs"));
    }

    #[test]
    fn replay_without_long_name_is_none() {
        let payload = [0u8; 8];
        let reader = AfpReader::new(&payload);
        let name = name_at_offset(&reader, 0, layout::NODE_ID_BIT, &FILE_FIELDS).unwrap();
        assert_eq!(name, None);
        let zero = name_at_offset(&reader, 0, layout::LONG_NAME_BIT, &FILE_FIELDS).unwrap();
        assert_eq!(zero, None);
    }
}
