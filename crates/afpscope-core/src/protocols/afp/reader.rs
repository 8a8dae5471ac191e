use super::error::AfpError;

/// Bounds-checked, read-only view over one AFP message.
///
/// The reader never holds a position of its own: every read names its
/// absolute offset and decoders thread the cursor explicitly, so a side-read
/// at an indirected offset cannot disturb the main cursor.
#[derive(Debug, Clone, Copy)]
pub struct AfpReader<'a> {
    payload: &'a [u8],
}

impl<'a> AfpReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn remaining(&self, offset: usize) -> usize {
        self.payload.len().saturating_sub(offset)
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, AfpError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(AfpError::TooShort {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_be(&self, offset: usize) -> Result<u16, AfpError> {
        let bytes = self.read_array::<2>(offset)?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_u32_be(&self, offset: usize) -> Result<u32, AfpError> {
        let bytes = self.read_array::<4>(offset)?;
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn read_i32_be(&self, offset: usize) -> Result<i32, AfpError> {
        let bytes = self.read_array::<4>(offset)?;
        Ok(i32::from_be_bytes(bytes))
    }

    pub fn read_u64_be(&self, offset: usize) -> Result<u64, AfpError> {
        let bytes = self.read_array::<8>(offset)?;
        Ok(u64::from_be_bytes(bytes))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], AfpError> {
        self.payload.get(range.clone()).ok_or(AfpError::TooShort {
            needed: range.end,
            actual: self.payload.len(),
        })
    }

    /// Read a length-prefixed byte string; returns the bytes without the
    /// length byte.
    pub fn read_pascal(&self, offset: usize) -> Result<&'a [u8], AfpError> {
        let len = self.read_u8(offset)? as usize;
        self.read_slice(offset + 1..offset + 1 + len)
    }

    /// Read a NUL-terminated byte string; returns the bytes including the
    /// terminator.
    pub fn read_cstring(&self, offset: usize) -> Result<&'a [u8], AfpError> {
        let tail = self.read_slice(offset..self.payload.len().max(offset))?;
        let nul = tail
            .iter()
            .position(|b| *b == 0)
            .ok_or(AfpError::MissingTerminator { offset })?;
        Ok(&tail[..=nul])
    }

    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], AfpError> {
        let bytes = self.read_slice(offset..offset + N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

/// Render bytes as 8-bit text, keeping the full length: protocol strings are
/// length-prefixed, so an embedded NUL is shown as `placeholder`.
pub fn bytes_to_text(bytes: &[u8], placeholder: char) -> String {
    bytes
        .iter()
        .map(|b| if *b == 0 { placeholder } else { *b as char })
        .collect()
}

/// Render bytes as lowercase hex.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::{AfpReader, bytes_to_hex, bytes_to_text};
    use crate::protocols::afp::error::AfpError;

    #[test]
    fn reads_big_endian_integers() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0];
        let reader = AfpReader::new(&data);
        assert_eq!(reader.read_u8(0).unwrap(), 0x12);
        assert_eq!(reader.read_u16_be(0).unwrap(), 0x1234);
        assert_eq!(reader.read_u32_be(4).unwrap(), 0x9abc_def0);
        assert_eq!(reader.read_u64_be(0).unwrap(), 0x1234_5678_9abc_def0);
        assert_eq!(reader.read_i32_be(4).unwrap(), 0x9abc_def0_u32 as i32);
    }

    #[test]
    fn out_of_bounds_read_reports_needed_length() {
        let data = [0u8; 3];
        let reader = AfpReader::new(&data);
        let err = reader.read_u32_be(1).unwrap_err();
        assert_eq!(err, AfpError::TooShort { needed: 5, actual: 3 });
    }

    #[test]
    fn pascal_string_respects_length_prefix() {
        let data = [3, b'a', b'b', b'c', b'd'];
        let reader = AfpReader::new(&data);
        assert_eq!(reader.read_pascal(0).unwrap(), b"abc");
        let short = [4, b'a'];
        assert!(AfpReader::new(&short).read_pascal(0).is_err());
    }

    #[test]
    fn cstring_includes_terminator() {
        let data = [b'p', b'w', 0, b'x'];
        let reader = AfpReader::new(&data);
        assert_eq!(reader.read_cstring(0).unwrap(), b"pw\0");
        let err = reader.read_cstring(3).unwrap_err();
        assert_eq!(err, AfpError::MissingTerminator { offset: 3 });
    }

    #[test]
    fn text_replaces_nul_without_truncating() {
        assert_eq!(bytes_to_text(b"a\0b", ':'), "a:b");
        assert_eq!(bytes_to_hex(&[0x00, 0xab]), "00ab");
    }
}
