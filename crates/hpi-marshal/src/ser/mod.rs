// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte-order aware cursors shared by the marshal and demarshal engines.

pub mod byte_order;
pub mod cursor;

pub use byte_order::ByteOrder;
pub use cursor::{Cursor, CursorMut, VecWriter, WireWrite};

use std::fmt;

/// Low-level cursor error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerError {
    WriteFailed {
        offset: usize,
        needed: usize,
        available: usize,
    },
    ReadFailed {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

impl fmt::Display for SerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerError::WriteFailed {
                offset,
                needed,
                available,
            } => write!(
                f,
                "write failed at offset {}: need {} bytes, {} available",
                offset, needed, available
            ),
            SerError::ReadFailed {
                offset,
                needed,
                available,
            } => write!(
                f,
                "read failed at offset {}: need {} bytes, {} available",
                offset, needed, available
            ),
        }
    }
}

impl std::error::Error for SerError {}

pub type SerResult<T> = core::result::Result<T, SerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ser_error_display_variants() {
        let err = SerError::WriteFailed {
            offset: 12,
            needed: 4,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "write failed at offset 12: need 4 bytes, 2 available"
        );

        let err = SerError::ReadFailed {
            offset: 4,
            needed: 8,
            available: 0,
        };
        assert_eq!(
            err.to_string(),
            "read failed at offset 4: need 8 bytes, 0 available"
        );
    }
}
