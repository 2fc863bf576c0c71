//! Rectangle record encoder
//!
//! This module encodes region contents into reply data, honouring the
//! maximum reply size negotiated by the caller.

use super::*;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

/// Reply carrying encoded rectangles.
///
/// `data` holds the whole records that fit in the caller's buffer, while
/// `total_size` is the byte size of the complete region. A caller that sees
/// `total_size > data.len()` retries with a larger buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionData {
    pub data: Vec<u8>,
    pub total_size: u32,
    /// Buffer size the reply was encoded for
    pub max_size: u32,
}

impl RegionData {
    /// Whether every record made it into the reply
    pub fn is_complete(&self) -> bool {
        self.data.len() as u64 == self.total_size as u64
    }

    /// Number of records in the reply
    pub fn rect_count(&self) -> usize {
        self.data.len() / RECT_RECORD_SIZE
    }

    /// Turn a truncated reply into `BufferTooSmall`
    pub fn require_complete(self) -> RegionResult<Vec<u8>> {
        if self.is_complete() {
            Ok(self.data)
        } else {
            Err(RegionError::BufferTooSmall {
                total_size: self.total_size,
                max_size: self.max_size,
            })
        }
    }
}

/// Encoder for fixed-size rectangle records
#[derive(Debug, Clone, Copy)]
pub struct RectEncoder {
    byte_order: ByteOrder,
}

impl RectEncoder {
    pub fn new(byte_order: ByteOrder) -> Self {
        RectEncoder { byte_order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Encode all rectangles
    pub fn encode_rects(&self, rects: &[Rect]) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(rects.len() * RECT_RECORD_SIZE);
        for rect in rects {
            self.write_rect(&mut buffer, rect);
        }
        buffer
    }

    /// Encode as many whole records as fit in `max_size` bytes
    pub fn encode_reply(&self, rects: &[Rect], max_size: u32) -> RegionData {
        let total_size = rects
            .len()
            .saturating_mul(RECT_RECORD_SIZE)
            .min(u32::MAX as usize) as u32;
        let fit = (max_size as usize / RECT_RECORD_SIZE).min(rects.len());

        RegionData {
            data: self.encode_rects(&rects[..fit]),
            total_size,
            max_size,
        }
    }

    fn write_rect(&self, buffer: &mut Vec<u8>, rect: &Rect) {
        for value in [rect.left, rect.top, rect.right, rect.bottom] {
            // Writing into a Vec cannot fail
            let _ = match self.byte_order {
                ByteOrder::MSBFirst => buffer.write_i32::<BigEndian>(value),
                ByteOrder::LSBFirst => buffer.write_i32::<LittleEndian>(value),
            };
        }
    }
}

impl Default for RectEncoder {
    fn default() -> Self {
        RectEncoder::new(ByteOrder::native())
    }
}
