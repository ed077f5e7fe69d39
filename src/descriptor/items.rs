//! Short-item tokenizer for HID report descriptors.
//!
//! Each short item starts with a prefix byte split into tag (bits 7..4), type
//! (bits 3..2) and size code (bits 1..0), followed by 0, 1, 2 or 4 little-endian data
//! bytes. Long items (`0xFE`) carry their own size and are skipped.

use crate::error::CatalogError;

const LONG_ITEM_PREFIX: u8 = 0xFE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ItemType {
    Main,
    Global,
    Local,
    Reserved,
}

/// One short item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Item {
    pub kind: ItemType,
    pub tag: u8,
    /// Number of data bytes (0, 1, 2 or 4).
    pub size: u8,
    /// Data zero-extended to 32 bits.
    pub data: u32,
}

impl Item {
    /// Data sign-extended from its encoded width.
    pub fn signed(&self) -> i32 {
        match self.size {
            1 => self.data as u8 as i8 as i32,
            2 => self.data as u16 as i16 as i32,
            4 => self.data as i32,
            _ => 0,
        }
    }
}

/// Iterator over the short items of a descriptor.
pub(crate) struct Items<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Items<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn truncated(&self, at: usize) -> CatalogError {
        CatalogError::CapabilityQueryFailed(format!(
            "report descriptor truncated at byte {at} of {}",
            self.bytes.len()
        ))
    }
}

impl Iterator for Items<'_> {
    type Item = Result<Item, CatalogError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.pos;
            let prefix = *self.bytes.get(start)?;

            if prefix == LONG_ITEM_PREFIX {
                let Some(&len) = self.bytes.get(start + 1) else {
                    self.pos = self.bytes.len();
                    return Some(Err(self.truncated(start)));
                };
                let end = start + 3 + len as usize;
                if end > self.bytes.len() {
                    self.pos = self.bytes.len();
                    return Some(Err(self.truncated(start)));
                }
                self.pos = end;
                continue;
            }

            let size: u8 = match prefix & 0x03 {
                3 => 4,
                n => n,
            };
            let data_start = start + 1;
            let data_end = data_start + size as usize;
            let Some(raw) = self.bytes.get(data_start..data_end) else {
                self.pos = self.bytes.len();
                return Some(Err(self.truncated(start)));
            };
            self.pos = data_end;

            let data = raw
                .iter()
                .rev()
                .fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
            let kind = match (prefix >> 2) & 0x03 {
                0 => ItemType::Main,
                1 => ItemType::Global,
                2 => ItemType::Local,
                _ => ItemType::Reserved,
            };

            return Some(Ok(Item {
                kind,
                tag: prefix >> 4,
                size,
                data,
            }));
        }
    }
}
