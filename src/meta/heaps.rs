//! Read-only accessors for the #Strings, #Blob, and #GUID heaps.

use crate::meta::cursor::Cursor;
use crate::meta::error::{Error, Result};

/// The #Strings heap: null-terminated UTF-8 strings, offset-indexed.
#[derive(Debug, Default)]
pub struct StringHeap {
    data: Vec<u8>,
}

impl StringHeap {
    pub fn parse(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Look up the string starting at `offset`. Offset 0 is the empty string.
    pub fn get(&self, offset: u32) -> Result<&str> {
        let offset = offset as usize;
        if offset >= self.data.len() {
            return Err(Error::BadString(offset));
        }
        let end = self.data[offset..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(Error::BadString(offset))?;
        std::str::from_utf8(&self.data[offset..offset + end]).map_err(|_| Error::BadString(offset))
    }
}

/// The #Blob heap: compressed-length-prefixed byte runs, offset-indexed.
#[derive(Debug, Default)]
pub struct BlobHeap {
    data: Vec<u8>,
}

impl BlobHeap {
    pub fn parse(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Look up the blob starting at `offset`.
    pub fn get(&self, offset: u32) -> Result<&[u8]> {
        let offset = offset as usize;
        if offset >= self.data.len() {
            return Err(Error::BadBlob(offset));
        }
        let mut cur = Cursor::new(&self.data[offset..]);
        let len = cur.compressed_u32().map_err(|_| Error::BadBlob(offset))? as usize;
        let start = offset + cur.position();
        if start + len > self.data.len() {
            return Err(Error::BadBlob(offset));
        }
        Ok(&self.data[start..start + len])
    }
}

/// The #GUID heap: raw 16-byte entries, 1-based index.
#[derive(Debug, Default)]
pub struct GuidHeap {
    data: Vec<u8>,
}

impl GuidHeap {
    pub fn parse(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Look up a GUID by 1-based index. Index 0 is the null GUID.
    pub fn get(&self, index: u32) -> Result<[u8; 16]> {
        if index == 0 {
            return Ok([0u8; 16]);
        }
        let start = (index as usize - 1) * 16;
        let slice = self
            .data
            .get(start..start + 16)
            .ok_or(Error::BadGuid(index))?;
        let mut guid = [0u8; 16];
        guid.copy_from_slice(slice);
        Ok(guid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_heap_lookup() {
        let heap = StringHeap::parse(b"\0System\0String\0");
        assert_eq!(heap.get(0).unwrap(), "");
        assert_eq!(heap.get(1).unwrap(), "System");
        assert_eq!(heap.get(8).unwrap(), "String");
        assert!(heap.get(99).is_err());
    }

    #[test]
    fn string_heap_mid_string_offset_is_a_suffix() {
        // Offsets are raw, so pointing into a string yields its tail.
        let heap = StringHeap::parse(b"\0ToString\0");
        assert_eq!(heap.get(3).unwrap(), "String");
    }

    #[test]
    fn blob_heap_lookup() {
        let heap = BlobHeap::parse(&[0x00, 0x02, 0x06, 0x0E, 0x01, 0x20]);
        assert_eq!(heap.get(0).unwrap(), &[] as &[u8]);
        assert_eq!(heap.get(1).unwrap(), &[0x06, 0x0E]);
        assert_eq!(heap.get(4).unwrap(), &[0x20]);
    }

    #[test]
    fn blob_heap_rejects_overrun_length() {
        let heap = BlobHeap::parse(&[0x00, 0x7F, 0x01]);
        assert!(heap.get(1).is_err());
    }

    #[test]
    fn guid_heap_is_one_based() {
        let mut data = vec![0u8; 16];
        data.extend_from_slice(&[0xAB; 16]);
        let heap = GuidHeap::parse(&data);
        assert_eq!(heap.get(0).unwrap(), [0u8; 16]);
        assert_eq!(heap.get(1).unwrap(), [0u8; 16]);
        assert_eq!(heap.get(2).unwrap(), [0xAB; 16]);
        assert!(heap.get(3).is_err());
    }
}
