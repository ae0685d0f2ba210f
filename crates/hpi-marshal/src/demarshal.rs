// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode side of the engine.
//!
//! Input bytes are untrusted: every failure is a [`DecodeError`], and
//! variable array counts are checked against [`MarshalConfig::max_array_len`]
//! and the bytes actually left before anything is allocated.

use crate::config::MarshalConfig;
use crate::error::{DecodeError, SchemaError};
use crate::ser::{ByteOrder, Cursor};
use crate::types::{FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind, VarArrayDescriptor};
use crate::value::Value;
use std::sync::Arc;

/// Demarshal one value written in `order`.
///
/// Returns the value and the number of bytes consumed.
pub fn demarshal(
    order: ByteOrder,
    ty: &TypeDescriptor,
    buffer: &[u8],
) -> Result<(Value, usize), DecodeError> {
    demarshal_with(&MarshalConfig::default(), order, ty, buffer)
}

/// [`demarshal`] with explicit decoding limits.
pub fn demarshal_with(
    config: &MarshalConfig,
    order: ByteOrder,
    ty: &TypeDescriptor,
    buffer: &[u8],
) -> Result<(Value, usize), DecodeError> {
    let mut cursor = Cursor::new(buffer, order);
    let value = Decoder::new(config).decode(&mut cursor, ty)?;
    Ok((value, cursor.offset()))
}

/// Demarshal a parameter list, one value per descriptor.
pub fn demarshal_array(
    order: ByteOrder,
    types: &[Arc<TypeDescriptor>],
    buffer: &[u8],
) -> Result<(Vec<Value>, usize), DecodeError> {
    demarshal_array_with(&MarshalConfig::default(), order, types, buffer)
}

pub fn demarshal_array_with(
    config: &MarshalConfig,
    order: ByteOrder,
    types: &[Arc<TypeDescriptor>],
    buffer: &[u8],
) -> Result<(Vec<Value>, usize), DecodeError> {
    let mut cursor = Cursor::new(buffer, order);
    let values = Decoder::new(config).decode_list(&mut cursor, types)?;
    Ok((values, cursor.offset()))
}

/// Demarshal from an existing cursor with default limits.
pub fn demarshal_from(cursor: &mut Cursor<'_>, ty: &TypeDescriptor) -> Result<Value, DecodeError> {
    demarshal_from_with(&MarshalConfig::default(), cursor, ty)
}

/// Demarshal from an existing cursor; custom codecs use this to nest,
/// passing on the config they were given.
pub fn demarshal_from_with(
    config: &MarshalConfig,
    cursor: &mut Cursor<'_>,
    ty: &TypeDescriptor,
) -> Result<Value, DecodeError> {
    Decoder::new(config).decode(cursor, ty)
}

/// Recursive-descent decoder carrying the configured limits.
pub(crate) struct Decoder<'c> {
    config: &'c MarshalConfig,
}

impl<'c> Decoder<'c> {
    pub(crate) fn new(config: &'c MarshalConfig) -> Self {
        Self { config }
    }

    pub(crate) fn decode_list(
        &self,
        cursor: &mut Cursor<'_>,
        types: &[Arc<TypeDescriptor>],
    ) -> Result<Vec<Value>, DecodeError> {
        types.iter().map(|ty| self.decode(cursor, ty)).collect()
    }

    pub(crate) fn decode(
        &self,
        cursor: &mut Cursor<'_>,
        ty: &TypeDescriptor,
    ) -> Result<Value, DecodeError> {
        match &ty.kind {
            TypeKind::Primitive(kind) => decode_primitive(cursor, *kind),
            TypeKind::Struct(fields) => self.decode_struct(cursor, ty, fields),
            TypeKind::Array(arr) => {
                let mut items = Vec::with_capacity(arr.length);
                for _ in 0..arr.length {
                    items.push(self.decode(cursor, &arr.element)?);
                }
                Ok(Value::Array(items))
            }
            TypeKind::Union(_) | TypeKind::VarArray(_) => Err(SchemaError::Detached {
                type_name: ty.name.clone(),
            }
            .into()),
            TypeKind::Custom(codec) => codec.demarshal(cursor, self.config),
        }
    }

    fn decode_struct(
        &self,
        cursor: &mut Cursor<'_>,
        ty: &TypeDescriptor,
        fields: &[FieldDescriptor],
    ) -> Result<Value, DecodeError> {
        let mut items: Vec<Value> = Vec::with_capacity(fields.len());
        for field in fields {
            let item = match &field.type_desc.kind {
                TypeKind::Union(u) => {
                    let label = sibling_selector(ty, field, &items, u.discriminator)?;
                    let arm = u.arm(label).ok_or_else(|| DecodeError::UnknownDiscriminator {
                        type_name: format!("{}.{}", ty.name, field.name),
                        value: label,
                    })?;
                    Value::Union(Box::new(self.decode(cursor, &arm.type_desc)?))
                }
                TypeKind::VarArray(v) => {
                    let count = sibling_selector(ty, field, &items, v.count_field)? as usize;
                    self.decode_var_array(cursor, ty, field, v, count)?
                }
                _ => self.decode(cursor, &field.type_desc)?,
            };
            items.push(item);
        }
        Ok(Value::Struct(items))
    }

    fn decode_var_array(
        &self,
        cursor: &mut Cursor<'_>,
        ty: &TypeDescriptor,
        field: &FieldDescriptor,
        v: &VarArrayDescriptor,
        count: usize,
    ) -> Result<Value, DecodeError> {
        let field_name = || format!("{}.{}", ty.name, field.name);

        if count > self.config.max_array_len {
            return Err(DecodeError::ArrayTooLarge {
                field: field_name(),
                count,
                limit: self.config.max_array_len,
            });
        }
        // Every element needs at least this many bytes, so a count the
        // remaining input cannot satisfy is rejected before allocating.
        let min = v.element.min_wire_size();
        if min > 0 && count.saturating_mul(min) > cursor.remaining() {
            return Err(DecodeError::ArrayTooLarge {
                field: field_name(),
                count,
                limit: cursor.remaining() / min,
            });
        }

        let mut items = Vec::new();
        items
            .try_reserve_exact(count)
            .map_err(|source| DecodeError::OutOfMemory {
                field: field_name(),
                count,
                source,
            })?;
        for _ in 0..count {
            items.push(self.decode(cursor, &v.element)?);
        }
        Ok(Value::Array(items))
    }
}

fn sibling_selector(
    ty: &TypeDescriptor,
    field: &FieldDescriptor,
    decoded: &[Value],
    selector: usize,
) -> Result<u32, DecodeError> {
    let Some(value) = decoded.get(selector) else {
        return Err(SchemaError::SelectorNotBefore {
            type_name: ty.name.clone(),
            field: field.name.clone(),
            selector,
        }
        .into());
    };
    value.selector().ok_or_else(|| {
        SchemaError::SelectorNotInteger {
            type_name: ty.name.clone(),
            field: field.name.clone(),
            selector,
        }
        .into()
    })
}

fn decode_primitive(cursor: &mut Cursor<'_>, kind: PrimitiveKind) -> Result<Value, DecodeError> {
    Ok(match kind {
        PrimitiveKind::Void => Value::Void,
        PrimitiveKind::U8 => Value::U8(cursor.read_u8()?),
        PrimitiveKind::U16 => Value::U16(cursor.read_u16()?),
        PrimitiveKind::U32 => Value::U32(cursor.read_u32()?),
        PrimitiveKind::U64 => Value::U64(cursor.read_u64()?),
        PrimitiveKind::I8 => Value::I8(cursor.read_i8()?),
        PrimitiveKind::I16 => Value::I16(cursor.read_i16()?),
        PrimitiveKind::I32 => Value::I32(cursor.read_i32()?),
        PrimitiveKind::I64 => Value::I64(cursor.read_i64()?),
        PrimitiveKind::F32 => Value::F32(cursor.read_f32()?),
        PrimitiveKind::F64 => Value::F64(cursor.read_f64()?),
    })
}
