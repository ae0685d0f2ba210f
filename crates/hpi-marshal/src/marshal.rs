// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode side of the engine.
//!
//! Values are written field by field in declared order with no padding. A
//! union writes only its active arm and a variable array only its elements;
//! the discriminator and count already went out as ordinary earlier fields.

use crate::config::MarshalConfig;
use crate::error::{MarshalError, SchemaError};
use crate::ser::{ByteOrder, CursorMut, VecWriter, WireWrite};
use crate::types::{FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind};
use crate::value::Value;
use std::sync::Arc;

/// Marshal `value` into `buffer` in host byte order.
///
/// Returns the number of bytes written. Host order is what OpenHPI peers
/// emit; the receiver learns it from the message header.
///
/// # Panics
///
/// If a union's discriminator field selects no arm. Producers must set a
/// valid discriminator before marshaling.
pub fn marshal(ty: &TypeDescriptor, value: &Value, buffer: &mut [u8]) -> Result<usize, MarshalError> {
    marshal_with_order(ByteOrder::native(), ty, value, buffer)
}

/// Marshal in an explicit byte order, e.g. big-endian for a canonical encoding.
///
/// # Panics
///
/// See [`marshal`].
pub fn marshal_with_order(
    order: ByteOrder,
    ty: &TypeDescriptor,
    value: &Value,
    buffer: &mut [u8],
) -> Result<usize, MarshalError> {
    let mut cursor = CursorMut::new(buffer, order);
    marshal_into(&mut cursor, ty, value)?;
    Ok(cursor.offset())
}

/// Marshal in the byte order configured in `config`.
///
/// # Panics
///
/// See [`marshal`].
pub fn marshal_with(
    config: &MarshalConfig,
    ty: &TypeDescriptor,
    value: &Value,
    buffer: &mut [u8],
) -> Result<usize, MarshalError> {
    marshal_with_order(config.byte_order, ty, value, buffer)
}

/// Marshal into a freshly allocated buffer.
///
/// # Panics
///
/// See [`marshal`].
pub fn marshal_to_vec(
    order: ByteOrder,
    ty: &TypeDescriptor,
    value: &Value,
) -> Result<Vec<u8>, MarshalError> {
    let mut writer = VecWriter::with_capacity(order, ty.wire_size().unwrap_or(0));
    marshal_into(&mut writer, ty, value)?;
    Ok(writer.into_bytes())
}

/// Marshal a parameter list, each value against its own descriptor.
///
/// # Panics
///
/// See [`marshal`].
pub fn marshal_array(
    order: ByteOrder,
    types: &[Arc<TypeDescriptor>],
    values: &[Value],
    buffer: &mut [u8],
) -> Result<usize, MarshalError> {
    let mut cursor = CursorMut::new(buffer, order);
    marshal_list_into(&mut cursor, types, values)?;
    Ok(cursor.offset())
}

pub(crate) fn marshal_list_into(
    writer: &mut dyn WireWrite,
    types: &[Arc<TypeDescriptor>],
    values: &[Value],
) -> Result<(), MarshalError> {
    if types.len() != values.len() {
        return Err(MarshalError::LengthMismatch {
            field: "parameter list".into(),
            count: types.len(),
            len: values.len(),
        });
    }
    for (ty, value) in types.iter().zip(values) {
        marshal_into(writer, ty, value)?;
    }
    Ok(())
}

/// Marshal through any [`WireWrite`] sink; custom codecs use this to nest.
///
/// # Panics
///
/// See [`marshal`].
pub fn marshal_into(
    writer: &mut dyn WireWrite,
    ty: &TypeDescriptor,
    value: &Value,
) -> Result<(), MarshalError> {
    match &ty.kind {
        TypeKind::Primitive(kind) => encode_primitive(writer, *kind, value),
        TypeKind::Struct(fields) => encode_struct(writer, ty, fields, value),
        TypeKind::Array(arr) => {
            let items = match value {
                Value::Array(items) => items,
                other => return Err(mismatch(&ty.name, other)),
            };
            if items.len() != arr.length {
                return Err(MarshalError::LengthMismatch {
                    field: ty.name.clone(),
                    count: arr.length,
                    len: items.len(),
                });
            }
            for item in items {
                marshal_into(writer, &arr.element, item)?;
            }
            Ok(())
        }
        TypeKind::Union(_) | TypeKind::VarArray(_) => Err(SchemaError::Detached {
            type_name: ty.name.clone(),
        }
        .into()),
        TypeKind::Custom(codec) => codec.marshal(value, writer),
    }
}

fn encode_struct(
    writer: &mut dyn WireWrite,
    ty: &TypeDescriptor,
    fields: &[FieldDescriptor],
    value: &Value,
) -> Result<(), MarshalError> {
    let items = match value {
        Value::Struct(items) if items.len() == fields.len() => items,
        Value::Struct(items) => {
            return Err(MarshalError::TypeMismatch {
                expected: format!("{} ({} fields)", ty.name, fields.len()),
                found: format!("struct ({} fields)", items.len()),
            })
        }
        other => return Err(mismatch(&ty.name, other)),
    };

    for (index, (field, item)) in fields.iter().zip(items).enumerate() {
        match &field.type_desc.kind {
            TypeKind::Union(u) => {
                let label = sibling_selector(ty, field, items, index, u.discriminator)?;
                let Some(arm) = u.arm(label) else {
                    panic!(
                        "{}.{}: no union arm for discriminator {}",
                        ty.name, field.name, label
                    );
                };
                let payload = match item {
                    Value::Union(payload) => payload,
                    other => return Err(mismatch(&field.type_desc.name, other)),
                };
                marshal_into(writer, &arm.type_desc, payload)?;
            }
            TypeKind::VarArray(v) => {
                let count = sibling_selector(ty, field, items, index, v.count_field)? as usize;
                let elements = match item {
                    Value::Array(elements) => elements,
                    other => return Err(mismatch(&field.type_desc.name, other)),
                };
                if elements.len() != count {
                    return Err(MarshalError::LengthMismatch {
                        field: format!("{}.{}", ty.name, field.name),
                        count,
                        len: elements.len(),
                    });
                }
                for element in elements {
                    marshal_into(writer, &v.element, element)?;
                }
            }
            _ => marshal_into(writer, &field.type_desc, item)?,
        }
    }
    Ok(())
}

/// Value of the discriminator/count field `selector` for field `index`.
fn sibling_selector(
    ty: &TypeDescriptor,
    field: &FieldDescriptor,
    items: &[Value],
    index: usize,
    selector: usize,
) -> Result<u32, MarshalError> {
    if selector >= index {
        return Err(SchemaError::SelectorNotBefore {
            type_name: ty.name.clone(),
            field: field.name.clone(),
            selector,
        }
        .into());
    }
    items[selector]
        .selector()
        .ok_or_else(|| MarshalError::TypeMismatch {
            expected: format!("integer selector for {}.{}", ty.name, field.name),
            found: items[selector].kind_name().to_string(),
        })
}

fn encode_primitive(
    writer: &mut dyn WireWrite,
    kind: PrimitiveKind,
    value: &Value,
) -> Result<(), MarshalError> {
    match (kind, value) {
        (PrimitiveKind::Void, Value::Void) => Ok(()),
        (PrimitiveKind::U8, Value::U8(v)) => Ok(writer.write_u8(*v)?),
        (PrimitiveKind::U16, Value::U16(v)) => Ok(writer.write_u16(*v)?),
        (PrimitiveKind::U32, Value::U32(v)) => Ok(writer.write_u32(*v)?),
        (PrimitiveKind::U64, Value::U64(v)) => Ok(writer.write_u64(*v)?),
        (PrimitiveKind::I8, Value::I8(v)) => Ok(writer.write_i8(*v)?),
        (PrimitiveKind::I16, Value::I16(v)) => Ok(writer.write_i16(*v)?),
        (PrimitiveKind::I32, Value::I32(v)) => Ok(writer.write_i32(*v)?),
        (PrimitiveKind::I64, Value::I64(v)) => Ok(writer.write_i64(*v)?),
        (PrimitiveKind::F32, Value::F32(v)) => Ok(writer.write_f32(*v)?),
        (PrimitiveKind::F64, Value::F64(v)) => Ok(writer.write_f64(*v)?),
        _ => Err(mismatch(kind.name(), value)),
    }
}

fn mismatch(expected: &str, found: &Value) -> MarshalError {
    MarshalError::TypeMismatch {
        expected: expected.to_string(),
        found: found.kind_name().to_string(),
    }
}
