// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire byte order.
//!
//! OpenHPI peers marshal in their own native order and announce it with a
//! single flag bit in the message header: `1` for little-endian, `0` for
//! big-endian. The receiver swaps only when the announced order differs
//! from its own.

/// Byte order of a marshaled buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the local host.
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// Decode the header endian bit.
    pub const fn from_flag(flag: u8) -> Self {
        if flag & 0x01 == 0x01 {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// Header endian bit for this order.
    pub const fn flag(self) -> u8 {
        match self {
            Self::Little => 1,
            Self::Big => 0,
        }
    }

    /// True when values in this order need no swapping on this host.
    pub const fn is_native(self) -> bool {
        self.flag() == Self::native().flag()
    }

    /// The opposite order.
    pub const fn swapped(self) -> Self {
        match self {
            Self::Little => Self::Big,
            Self::Big => Self::Little,
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_roundtrip() {
        assert_eq!(ByteOrder::from_flag(ByteOrder::Little.flag()), ByteOrder::Little);
        assert_eq!(ByteOrder::from_flag(ByteOrder::Big.flag()), ByteOrder::Big);
        // Only bit 0 is significant: version bits share the flags byte.
        assert_eq!(ByteOrder::from_flag(0x11), ByteOrder::Little);
        assert_eq!(ByteOrder::from_flag(0x10), ByteOrder::Big);
    }

    #[test]
    fn test_native_matches_target() {
        let probe = 1u16.to_ne_bytes();
        let expected = if probe[0] == 1 {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        };
        assert_eq!(ByteOrder::native(), expected);
        assert!(ByteOrder::native().is_native());
        assert!(!ByteOrder::native().swapped().is_native());
    }
}
