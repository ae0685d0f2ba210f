// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors for marshal buffers.
//!
//! The wire format is packed: no alignment, no padding, every primitive at its
//! fixed width in the cursor's byte order.

use super::{ByteOrder, SerError, SerResult};

/// Generate ordered write methods for primitive types.
///
/// Each generated method converts the value to the sink's byte order and
/// hands the bytes to `write_bytes`, which owns the bounds check.
macro_rules! impl_write_ordered {
    ($name:ident, $type:ty) => {
        fn $name(&mut self, value: $type) -> SerResult<()> {
            match self.byte_order() {
                ByteOrder::Little => self.write_bytes(&value.to_le_bytes()),
                ByteOrder::Big => self.write_bytes(&value.to_be_bytes()),
            }
        }
    };
}

/// Generate ordered read methods for primitive types.
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `SerError::ReadFailed` if short)
/// 2. Copies N bytes out of the buffer
/// 3. Converts them using the cursor's source byte order
/// 4. Advances the offset
macro_rules! impl_read_ordered {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> SerResult<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(match self.order {
                ByteOrder::Little => <$type>::from_le_bytes(bytes),
                ByteOrder::Big => <$type>::from_be_bytes(bytes),
            })
        }
    };
}

/// Destination for marshaled bytes.
///
/// Implementors only provide raw byte output; primitive writers are derived
/// from `byte_order()`.
pub trait WireWrite {
    fn byte_order(&self) -> ByteOrder;

    /// Bytes written so far.
    fn offset(&self) -> usize;

    fn write_bytes(&mut self, data: &[u8]) -> SerResult<()>;

    fn write_u8(&mut self, value: u8) -> SerResult<()> {
        self.write_bytes(&[value])
    }

    fn write_i8(&mut self, value: i8) -> SerResult<()> {
        self.write_bytes(&value.to_ne_bytes())
    }

    impl_write_ordered!(write_u16, u16);
    impl_write_ordered!(write_u32, u32);
    impl_write_ordered!(write_u64, u64);
    impl_write_ordered!(write_i16, i16);
    impl_write_ordered!(write_i32, i32);
    impl_write_ordered!(write_i64, i64);

    fn write_f32(&mut self, value: f32) -> SerResult<()> {
        self.write_u32(value.to_bits())
    }

    fn write_f64(&mut self, value: f64) -> SerResult<()> {
        self.write_u64(value.to_bits())
    }
}

/// Mutable cursor over a caller-supplied buffer (bounds-checked, never allocates).
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
    order: ByteOrder,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8], order: ByteOrder) -> Self {
        Self {
            buffer,
            offset: 0,
            order,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }
}

impl WireWrite for CursorMut<'_> {
    fn byte_order(&self) -> ByteOrder {
        self.order
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn write_bytes(&mut self, data: &[u8]) -> SerResult<()> {
        if data.len() > self.remaining() {
            return Err(SerError::WriteFailed {
                offset: self.offset,
                needed: data.len(),
                available: self.remaining(),
            });
        }
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }
}

/// Growable sink backing `marshal_to_vec`.
#[derive(Debug)]
pub struct VecWriter {
    buffer: Vec<u8>,
    order: ByteOrder,
}

impl VecWriter {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            buffer: Vec::new(),
            order,
        }
    }

    pub fn with_capacity(order: ByteOrder, capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            order,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl WireWrite for VecWriter {
    fn byte_order(&self) -> ByteOrder {
        self.order
    }

    fn offset(&self) -> usize {
        self.buffer.len()
    }

    fn write_bytes(&mut self, data: &[u8]) -> SerResult<()> {
        self.buffer.extend_from_slice(data);
        Ok(())
    }
}

/// Immutable cursor for reading (bounds-checked, zero-copy).
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
    order: ByteOrder,
}

impl<'a> Cursor<'a> {
    /// `order` is the byte order the buffer was written in.
    pub fn new(buffer: &'a [u8], order: ByteOrder) -> Self {
        Self {
            buffer,
            offset: 0,
            order,
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    pub fn read_u8(&mut self) -> SerResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> SerResult<i8> {
        Ok(i8::from_ne_bytes([self.read_u8()?]))
    }

    impl_read_ordered!(read_u16, u16, 2);
    impl_read_ordered!(read_u32, u32, 4);
    impl_read_ordered!(read_u64, u64, 8);
    impl_read_ordered!(read_i16, i16, 2);
    impl_read_ordered!(read_i32, i32, 4);
    impl_read_ordered!(read_i64, i64, 8);

    pub fn read_f32(&mut self) -> SerResult<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> SerResult<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_bytes(&mut self, len: usize) -> SerResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(SerError::ReadFailed {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }
}
