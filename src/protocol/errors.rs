//! Region request error codes and error handling

use super::types::Rect;
use std::fmt;
use thiserror::Error;

/// Status codes reported back to the request layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    Length = 1,
    Alloc = 2,
    BufferOverflow = 3,
    Value = 4,
}

impl ErrorCode {
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(ErrorCode::Length),
            2 => Some(ErrorCode::Alloc),
            3 => Some(ErrorCode::BufferOverflow),
            4 => Some(ErrorCode::Value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Length => "Length: request data length incorrect",
            ErrorCode::Alloc => "Alloc: insufficient resources",
            ErrorCode::BufferOverflow => "BufferOverflow: reply does not fit the buffer",
            ErrorCode::Value => "Value: coordinates out of range",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while decoding or replying with region data.
///
/// Degenerate rectangles are not errors: they are dropped during
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("malformed region data: {len} bytes is not a multiple of 16")]
    MalformedData { len: usize },

    #[error("region record count {count} does not match {len} bytes of data")]
    CountMismatch { count: usize, len: usize },

    #[error("too many rectangles in request: {count} (limit {limit})")]
    TooManyRects { count: usize, limit: usize },

    #[error("buffer too small: {total_size} bytes needed, {max_size} available")]
    BufferTooSmall { total_size: u32, max_size: u32 },

    #[error("coordinates of region with extents {extents} overflow when transformed")]
    CoordinateOverflow { extents: Rect },
}

impl RegionError {
    /// Status code to send back to the client
    pub fn code(&self) -> ErrorCode {
        match self {
            RegionError::MalformedData { .. } | RegionError::CountMismatch { .. } => {
                ErrorCode::Length
            }
            RegionError::TooManyRects { .. } => ErrorCode::Alloc,
            RegionError::BufferTooSmall { .. } => ErrorCode::BufferOverflow,
            RegionError::CoordinateOverflow { .. } => ErrorCode::Value,
        }
    }

    /// Whether the error stems from bad request data
    pub fn is_malformed(&self) -> bool {
        self.code() == ErrorCode::Length
    }
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RegionError::MalformedData { len: 3 }.code(), ErrorCode::Length);
        assert_eq!(
            RegionError::CountMismatch { count: 2, len: 16 }.code(),
            ErrorCode::Length
        );
        assert_eq!(
            RegionError::TooManyRects { count: 9, limit: 8 }.code(),
            ErrorCode::Alloc
        );
        let overflow = RegionError::CoordinateOverflow {
            extents: Rect::new(i32::MIN, 0, 0, 10),
        };
        assert_eq!(overflow.code(), ErrorCode::Value);
        assert!(!overflow.is_malformed());
        assert!(RegionError::MalformedData { len: 3 }.is_malformed());
        assert_eq!(ErrorCode::from_u8(3), Some(ErrorCode::BufferOverflow));
        assert_eq!(ErrorCode::from_u8(4), Some(ErrorCode::Value));
        assert_eq!(ErrorCode::from_u8(0), None);
    }

    #[test]
    fn test_error_display() {
        let err = RegionError::MalformedData { len: 17 };
        assert_eq!(
            err.to_string(),
            "malformed region data: 17 bytes is not a multiple of 16"
        );
    }
}
