//! Rectangle record parser
//!
//! This module decodes rectangle buffers arriving with request data.

use super::*;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io;

/// Decoder for fixed-size rectangle records
#[derive(Debug, Clone, Copy)]
pub struct RectParser {
    byte_order: ByteOrder,
}

impl RectParser {
    pub fn new(byte_order: ByteOrder) -> Self {
        RectParser { byte_order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Number of records in a buffer of `len` bytes
    pub fn record_count(len: usize) -> RegionResult<usize> {
        if len % RECT_RECORD_SIZE != 0 {
            return Err(RegionError::MalformedData { len });
        }
        Ok(len / RECT_RECORD_SIZE)
    }

    /// Decode every record in `data`.
    ///
    /// The buffer must hold a whole number of records; nothing is silently
    /// truncated.
    pub fn parse_rects(&self, data: &[u8]) -> RegionResult<Vec<Rect>> {
        let count = Self::record_count(data.len())?;
        let mut rects = Vec::with_capacity(count);
        let mut cursor = data;

        for _ in 0..count {
            let rect = self
                .read_rect(&mut cursor)
                .map_err(|_| RegionError::MalformedData { len: data.len() })?;
            rects.push(rect);
        }

        Ok(rects)
    }

    /// Decode `count` records that must fill `data` exactly
    pub fn parse_counted_rects(&self, data: &[u8], count: usize) -> RegionResult<Vec<Rect>> {
        let expected = count.checked_mul(RECT_RECORD_SIZE);
        if expected != Some(data.len()) {
            return Err(RegionError::CountMismatch {
                count,
                len: data.len(),
            });
        }
        self.parse_rects(data)
    }

    fn read_rect(&self, cursor: &mut &[u8]) -> io::Result<Rect> {
        Ok(Rect {
            left: self.read_i32(cursor)?,
            top: self.read_i32(cursor)?,
            right: self.read_i32(cursor)?,
            bottom: self.read_i32(cursor)?,
        })
    }

    fn read_i32(&self, cursor: &mut &[u8]) -> io::Result<i32> {
        match self.byte_order {
            ByteOrder::MSBFirst => cursor.read_i32::<BigEndian>(),
            ByteOrder::LSBFirst => cursor.read_i32::<LittleEndian>(),
        }
    }
}

impl Default for RectParser {
    fn default() -> Self {
        RectParser::new(ByteOrder::native())
    }
}
