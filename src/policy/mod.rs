//! Request marshalling policy
//!
//! This module configures the limits the request layer applies to region
//! data coming from clients and to region replies going back to them.

use crate::protocol::{ByteOrder, RECT_RECORD_SIZE};

/// Marshalling policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarshalPolicy {
    /// Maximum rectangle records accepted in one request (0 = unlimited)
    pub max_rects_per_request: usize,

    /// Maximum bytes of region data in one reply (0 = unlimited)
    pub max_reply_size: u32,

    /// Byte order of rectangle records on the wire
    pub byte_order: ByteOrder,
}

impl Default for MarshalPolicy {
    fn default() -> Self {
        MarshalPolicy {
            max_rects_per_request: 65536,
            max_reply_size: 1024 * 1024,
            byte_order: ByteOrder::native(),
        }
    }
}

impl MarshalPolicy {
    /// Create a permissive policy (for testing) - no limits at all
    pub fn permissive() -> Self {
        MarshalPolicy {
            max_rects_per_request: 0,
            max_reply_size: 0,
            byte_order: ByteOrder::native(),
        }
    }

    /// Create a strict policy - small requests and replies only
    pub fn strict() -> Self {
        MarshalPolicy {
            max_rects_per_request: 4096,
            max_reply_size: 64 * 1024,
            byte_order: ByteOrder::native(),
        }
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Clamp a client's requested reply size to the policy cap
    pub fn reply_size(&self, requested: u32) -> u32 {
        if self.max_reply_size == 0 {
            requested
        } else {
            requested.min(self.max_reply_size)
        }
    }

    /// Whether a request carrying `len` bytes of records is within limits
    pub fn allows_request(&self, len: usize) -> bool {
        self.max_rects_per_request == 0 || len / RECT_RECORD_SIZE <= self.max_rects_per_request
    }
}
