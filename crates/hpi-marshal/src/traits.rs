// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed layer over the dynamic engine.
//!
//! [`HpiType`] ties a Rust type to its descriptor and converts between the
//! type and a [`Value`]; `#[derive(Marshal)]` writes the impls for HPI
//! structs and enums. [`HpiUnion`] is the tagged-enum counterpart used for
//! union fields.

use crate::demarshal::demarshal;
use crate::error::{DecodeError, MarshalError};
use crate::marshal::{marshal_to_vec, marshal_with_order};
use crate::ser::ByteOrder;
use crate::types::{fixed_array_of, primitive, PrimitiveKind, TypeDescriptor, UnionArm};
use crate::value::Value;
use std::sync::Arc;

/// A Rust type with a marshaling schema.
pub trait HpiType: Sized {
    fn type_descriptor() -> Arc<TypeDescriptor>;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, DecodeError>;
}

/// A Rust enum standing in for a discriminated union.
///
/// The discriminator is not part of the enum's value: it is a sibling field
/// of the struct holding the union.
pub trait HpiUnion: Sized {
    /// One arm per variant, keyed by discriminator value.
    fn arms() -> Vec<UnionArm>;

    /// Discriminator value selecting this variant.
    fn label(&self) -> u32;

    /// Payload of the active variant.
    fn to_value(&self) -> Value;

    fn from_arm(label: u32, payload: Value) -> Result<Self, DecodeError>;
}

macro_rules! impl_hpi_primitive {
    ($type:ty, $kind:ident, $getter:ident) => {
        impl HpiType for $type {
            fn type_descriptor() -> Arc<TypeDescriptor> {
                primitive(PrimitiveKind::$kind)
            }

            fn to_value(&self) -> Value {
                Value::from(*self)
            }

            fn from_value(value: Value) -> Result<Self, DecodeError> {
                value.$getter().ok_or_else(|| DecodeError::TypeMismatch {
                    expected: stringify!($type).into(),
                    found: value.kind_name().into(),
                })
            }
        }
    };
}

impl_hpi_primitive!(u8, U8, as_u8);
impl_hpi_primitive!(u16, U16, as_u16);
impl_hpi_primitive!(u32, U32, as_u32);
impl_hpi_primitive!(u64, U64, as_u64);
impl_hpi_primitive!(i8, I8, as_i8);
impl_hpi_primitive!(i16, I16, as_i16);
impl_hpi_primitive!(i32, I32, as_i32);
impl_hpi_primitive!(i64, I64, as_i64);
impl_hpi_primitive!(f32, F32, as_f32);
impl_hpi_primitive!(f64, F64, as_f64);

/// `SaHpiBoolT`: one byte, any nonzero value reads as true.
impl HpiType for bool {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        primitive(PrimitiveKind::U8)
    }

    fn to_value(&self) -> Value {
        Value::U8(u8::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::U8(v) => Ok(v != 0),
            other => Err(DecodeError::TypeMismatch {
                expected: "bool".into(),
                found: other.kind_name().into(),
            }),
        }
    }
}

impl HpiType for () {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        primitive(PrimitiveKind::Void)
    }

    fn to_value(&self) -> Value {
        Value::Void
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Void => Ok(()),
            other => Err(DecodeError::TypeMismatch {
                expected: "void".into(),
                found: other.kind_name().into(),
            }),
        }
    }
}

impl<T: HpiType, const N: usize> HpiType for [T; N] {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(fixed_array_of(T::type_descriptor(), N))
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(HpiType::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let items = match value {
            Value::Array(items) if items.len() == N => items,
            other => {
                return Err(DecodeError::TypeMismatch {
                    expected: format!("array of {}", N),
                    found: match other.as_array() {
                        Some(items) => format!("array of {}", items.len()),
                        None => other.kind_name().into(),
                    },
                })
            }
        };
        let decoded = items
            .into_iter()
            .map(T::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        decoded.try_into().map_err(|v: Vec<T>| DecodeError::TypeMismatch {
            expected: format!("array of {}", N),
            found: format!("array of {}", v.len()),
        })
    }
}

/// Value of a `#[hpi(count = "..")]` field.
pub fn var_array_to_value<T: HpiType>(items: &[T]) -> Value {
    Value::Array(items.iter().map(HpiType::to_value).collect())
}

/// Decode a `#[hpi(count = "..")]` field.
pub fn var_array_from_value<T: HpiType>(value: Value) -> Result<Vec<T>, DecodeError> {
    match value {
        Value::Array(items) => items.into_iter().map(T::from_value).collect(),
        other => Err(DecodeError::TypeMismatch {
            expected: "array".into(),
            found: other.kind_name().into(),
        }),
    }
}

/// Encode a `#[hpi(union = "..")]` field.
///
/// # Panics
///
/// If the active variant's label is not the value held by `selector`.
pub fn union_to_value<U: HpiUnion>(field: &str, selector: &Value, union: &U) -> Value {
    let label = union.label();
    match selector.selector() {
        Some(discriminator) if discriminator == label => Value::Union(Box::new(union.to_value())),
        found => panic!(
            "{}: union arm label {} does not match discriminator {:?}",
            field, label, found
        ),
    }
}

/// Decode a `#[hpi(union = "..")]` field given its discriminator.
pub fn union_from_value<U: HpiUnion>(label: u32, value: Value) -> Result<U, DecodeError> {
    match value {
        Value::Union(payload) => U::from_arm(label, *payload),
        other => Err(DecodeError::TypeMismatch {
            expected: "union".into(),
            found: other.kind_name().into(),
        }),
    }
}

/// Marshal a typed value into `buffer` in host byte order.
///
/// # Panics
///
/// If a union field's discriminator selects no arm, or not the arm held
/// by the value.
pub fn marshal_typed<T: HpiType>(value: &T, buffer: &mut [u8]) -> Result<usize, MarshalError> {
    marshal_typed_with_order(ByteOrder::native(), value, buffer)
}

/// # Panics
///
/// If a union field's discriminator selects no arm, or not the arm held
/// by the value.
pub fn marshal_typed_with_order<T: HpiType>(
    order: ByteOrder,
    value: &T,
    buffer: &mut [u8],
) -> Result<usize, MarshalError> {
    marshal_with_order(order, &T::type_descriptor(), &value.to_value(), buffer)
}

/// # Panics
///
/// If a union field's discriminator selects no arm, or not the arm held
/// by the value.
pub fn marshal_typed_to_vec<T: HpiType>(order: ByteOrder, value: &T) -> Result<Vec<u8>, MarshalError> {
    marshal_to_vec(order, &T::type_descriptor(), &value.to_value())
}

/// Demarshal a typed value written in `order`; returns it with the bytes consumed.
pub fn demarshal_typed<T: HpiType>(order: ByteOrder, buffer: &[u8]) -> Result<(T, usize), DecodeError> {
    let (value, used) = demarshal(order, &T::type_descriptor(), buffer)?;
    Ok((T::from_value(value)?, used))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_travels_as_u8() {
        assert_eq!(true.to_value(), Value::U8(1));
        assert!(bool::from_value(Value::U8(7)).expect("nonzero"));
        assert!(!bool::from_value(Value::U8(0)).expect("zero"));
        assert!(bool::from_value(Value::U32(1)).is_err());
    }

    #[test]
    fn test_array_roundtrip() {
        let data: [u16; 3] = [1, 0xFFFF, 42];
        let bytes = marshal_typed_to_vec(ByteOrder::Big, &data).expect("marshal");
        assert_eq!(bytes, vec![0, 1, 0xFF, 0xFF, 0, 42]);
        let (back, used) = demarshal_typed::<[u16; 3]>(ByteOrder::Big, &bytes).expect("decode");
        assert_eq!(back, data);
        assert_eq!(used, 6);
    }

    #[test]
    fn test_array_wrong_length_rejected() {
        let err = <[u8; 4]>::from_value(Value::from(vec![1u8, 2])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type mismatch: expected array of 4, found array of 2"
        );
    }

    #[test]
    fn test_primitive_mismatch() {
        let err = i64::from_value(Value::U64(5)).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { .. }));
    }

    #[test]
    fn test_var_array_helpers() {
        let value = var_array_to_value(&[3u32, 4]);
        assert_eq!(value, Value::from(vec![3u32, 4]));
        assert_eq!(var_array_from_value::<u32>(value).expect("decode"), vec![3, 4]);
        assert!(var_array_from_value::<u32>(Value::U8(1)).is_err());
    }
}
