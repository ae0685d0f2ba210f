// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the schema half of the marshaling model.
//!
//! Descriptors are immutable once built and shared through `Arc`, so one
//! `SensorReading` descriptor serves every struct that embeds a reading.
//! Where the wire layout needs a sibling value (union discriminators and
//! variable array counts) the descriptor stores the *index* of that sibling
//! in the enclosing struct's field list.

use crate::config::MarshalConfig;
use crate::error::{DecodeError, MarshalError};
use crate::ser::{Cursor, WireWrite};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Zero-width placeholder, marshals to nothing.
    Void,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// Size in bytes on the wire.
    pub const fn size(&self) -> usize {
        match self {
            Self::Void => 0,
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    /// Whether a field of this kind may select a union arm or size a variable array.
    pub const fn is_selector(&self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::I8 | Self::I16 | Self::I32
        )
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// User supplied encoding for types the descriptor vocabulary cannot express.
///
/// The codec sees the raw writer/cursor, so it must honour their byte order.
/// Nested decoding goes through [`crate::demarshal::demarshal_from_with`]
/// with the `config` handed in, so the caller's limits still apply.
pub trait CustomCodec: Send + Sync + fmt::Debug {
    fn marshal(&self, value: &Value, writer: &mut dyn WireWrite) -> Result<(), MarshalError>;

    fn demarshal(&self, cursor: &mut Cursor<'_>, config: &MarshalConfig) -> Result<Value, DecodeError>;

    /// Exact wire size, if it does not depend on the value.
    fn wire_size(&self) -> Option<usize> {
        None
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    /// Fields in wire order.
    Struct(Vec<FieldDescriptor>),
    /// Tagged union whose tag lives in a sibling field.
    Union(UnionDescriptor),
    /// Fixed number of elements, no length on the wire.
    Array(ArrayDescriptor),
    /// Element count taken from a sibling field.
    VarArray(VarArrayDescriptor),
    Custom(Arc<dyn CustomCodec>),
}

/// A complete type descriptor.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub name: String,
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a descriptor without validation; prefer the functions in
    /// [`crate::types`].
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?.iter().position(|f| f.name == name)
    }

    /// Largest number of bytes a value of this type marshals to.
    ///
    /// Exact unless a union is involved, since unions report their largest
    /// arm. `None` when the size is unbounded (variable arrays, custom codecs
    /// without a fixed size).
    pub fn wire_size(&self) -> Option<usize> {
        match &self.kind {
            TypeKind::Primitive(p) => Some(p.size()),
            TypeKind::Struct(fields) => fields
                .iter()
                .try_fold(0usize, |acc, f| acc.checked_add(f.type_desc.wire_size()?)),
            TypeKind::Union(u) => u
                .arms
                .iter()
                .try_fold(0usize, |acc, arm| Some(acc.max(arm.type_desc.wire_size()?))),
            TypeKind::Array(arr) => arr.element.wire_size()?.checked_mul(arr.length),
            TypeKind::VarArray(_) => None,
            TypeKind::Custom(codec) => codec.wire_size(),
        }
    }

    /// Smallest possible encoding of this type.
    pub fn min_wire_size(&self) -> usize {
        match &self.kind {
            TypeKind::Primitive(p) => p.size(),
            TypeKind::Struct(fields) => fields
                .iter()
                .fold(0usize, |acc, f| acc.saturating_add(f.type_desc.min_wire_size())),
            TypeKind::Union(u) => u
                .arms
                .iter()
                .map(|arm| arm.type_desc.min_wire_size())
                .min()
                .unwrap_or(0),
            TypeKind::Array(arr) => arr.element.min_wire_size().saturating_mul(arr.length),
            TypeKind::VarArray(_) => 0,
            TypeKind::Custom(codec) => codec.wire_size().unwrap_or(0),
        }
    }
}

/// Field descriptor.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_desc: Arc<TypeDescriptor>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// Union descriptor.
#[derive(Debug, Clone)]
pub struct UnionDescriptor {
    /// Index of the discriminator in the enclosing struct.
    pub discriminator: usize,
    pub arms: Vec<UnionArm>,
}

impl UnionDescriptor {
    /// Find the arm selected by a discriminator value.
    pub fn arm(&self, label: u32) -> Option<&UnionArm> {
        self.arms.iter().find(|arm| arm.label == label)
    }
}

/// One alternative of a union.
#[derive(Debug, Clone)]
pub struct UnionArm {
    pub label: u32,
    pub name: String,
    pub type_desc: Arc<TypeDescriptor>,
}

impl UnionArm {
    pub fn new(label: u32, name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            label,
            name: name.into(),
            type_desc,
        }
    }
}

/// Fixed array descriptor.
#[derive(Debug, Clone)]
pub struct ArrayDescriptor {
    pub element: Arc<TypeDescriptor>,
    pub length: usize,
}

/// Variable array descriptor.
#[derive(Debug, Clone)]
pub struct VarArrayDescriptor {
    pub element: Arc<TypeDescriptor>,
    /// Index of the count field in the enclosing struct.
    pub count_field: usize,
}
