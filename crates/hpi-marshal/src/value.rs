// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values walked by the marshal engine.

use crate::error::DecodeError;

/// A value shaped like some [`TypeDescriptor`](crate::types::TypeDescriptor).
///
/// Struct fields are positional, in the descriptor's declared order. A union
/// value holds only the active arm; which arm that is follows from the
/// sibling discriminator field of the enclosing struct.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Void,
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Struct(Vec<Value>),
    Union(Box<Value>),
    /// Fixed and variable arrays alike.
    Array(Vec<Value>),
}

macro_rules! primitive_value {
    ($variant:ident, $type:ty, $getter:ident) => {
        impl Value {
            pub fn $getter(&self) -> Option<$type> {
                match self {
                    Self::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }

        impl From<$type> for Value {
            fn from(v: $type) -> Self {
                Self::$variant(v)
            }
        }
    };
}

primitive_value!(U8, u8, as_u8);
primitive_value!(U16, u16, as_u16);
primitive_value!(U32, u32, as_u32);
primitive_value!(U64, u64, as_u64);
primitive_value!(I8, i8, as_i8);
primitive_value!(I16, i16, as_i16);
primitive_value!(I32, i32, as_i32);
primitive_value!(I64, i64, as_i64);
primitive_value!(F32, f32, as_f32);
primitive_value!(F64, f64, as_f64);

impl Value {
    /// Short name of the variant, used in mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Struct(_) => "struct",
            Self::Union(_) => "union",
            Self::Array(_) => "array",
        }
    }

    /// Read an 8/16/32-bit integer as a discriminator or element count.
    ///
    /// Signed values are zero-extended from their own width, so an `i8` of -1
    /// selects 255, never `u32::MAX`.
    pub fn selector(&self) -> Option<u32> {
        match self {
            Self::U8(v) => Some(u32::from(*v)),
            Self::U16(v) => Some(u32::from(*v)),
            Self::U32(v) => Some(*v),
            Self::I8(v) => Some(u32::from(*v as u8)),
            Self::I16(v) => Some(u32::from(*v as u16)),
            Self::I32(v) => Some(*v as u32),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&[Value]> {
        match self {
            Self::Struct(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Active arm payload of a union value.
    pub fn union_value(&self) -> Option<&Value> {
        match self {
            Self::Union(v) => Some(v),
            _ => None,
        }
    }

    /// Struct field by position.
    pub fn field(&self, index: usize) -> Option<&Value> {
        self.as_fields()?.get(index)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

/// Takes fields out of a decoded struct value by position.
///
/// Used by derived `HpiType::from_value` implementations.
#[derive(Debug)]
pub struct FieldReader {
    type_name: &'static str,
    fields: Vec<Value>,
}

impl FieldReader {
    /// Fails unless `value` is a struct with exactly `expected` fields.
    pub fn new(type_name: &'static str, value: Value, expected: usize) -> Result<Self, DecodeError> {
        match value {
            Value::Struct(fields) if fields.len() == expected => Ok(Self { type_name, fields }),
            other => Err(DecodeError::TypeMismatch {
                expected: format!("{} ({} fields)", type_name, expected),
                found: match other.as_fields() {
                    Some(f) => format!("struct ({} fields)", f.len()),
                    None => other.kind_name().to_string(),
                },
            }),
        }
    }

    /// Discriminator or count stored in field `index`.
    pub fn selector(&self, index: usize) -> Result<u32, DecodeError> {
        self.fields
            .get(index)
            .and_then(Value::selector)
            .ok_or_else(|| DecodeError::TypeMismatch {
                expected: format!("{} selector field #{}", self.type_name, index),
                found: self
                    .fields
                    .get(index)
                    .map_or("nothing", Value::kind_name)
                    .to_string(),
            })
    }

    /// Move field `index` out, leaving `Value::Void` behind.
    pub fn take(&mut self, index: usize) -> Value {
        self.fields
            .get_mut(index)
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_accessors() {
        let v = Value::from(42u32);
        assert_eq!(v.as_u32(), Some(42));
        assert_eq!(v.as_i32(), None);
        assert_eq!(v.kind_name(), "u32");

        let v = Value::from(-21i64);
        assert_eq!(v.as_i64(), Some(-21));
    }

    #[test]
    fn test_selector_zero_extends() {
        assert_eq!(Value::U8(200).selector(), Some(200));
        assert_eq!(Value::I8(-1).selector(), Some(0xFF));
        assert_eq!(Value::I16(-2).selector(), Some(0xFFFE));
        assert_eq!(Value::I32(-1).selector(), Some(u32::MAX));
        assert_eq!(Value::U64(1).selector(), None);
        assert_eq!(Value::F32(1.0).selector(), None);
    }

    #[test]
    fn test_struct_and_union_access() {
        let v = Value::Struct(vec![
            Value::U8(1),
            Value::U32(0),
            Value::Union(Box::new(Value::I64(-21))),
        ]);
        assert_eq!(v.field(1), Some(&Value::U32(0)));
        assert_eq!(
            v.field(2).and_then(Value::union_value).and_then(Value::as_i64),
            Some(-21)
        );
        assert!(v.field(3).is_none());
    }

    #[test]
    fn test_vec_into_array() {
        let v = Value::from(vec![1u16, 2, 3]);
        let items = v.as_array().expect("array");
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].as_u16(), Some(3));
    }

    #[test]
    fn test_field_reader() {
        let value = Value::Struct(vec![Value::U8(2), Value::from(vec![7u32, 8])]);
        let mut reader = FieldReader::new("Config", value, 2).expect("two fields");
        assert_eq!(reader.selector(0).expect("count"), 2);
        assert!(reader.selector(1).is_err());
        assert_eq!(reader.take(1), Value::from(vec![7u32, 8]));
        assert_eq!(reader.take(1), Value::Void);

        let err = FieldReader::new("Config", Value::U8(0), 2).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { .. }));
    }
}
