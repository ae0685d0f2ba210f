// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor constructors and the fluent struct/union builders.
//!
//! Sibling references (union selectors, var-array counts) are given by field
//! *name* and resolved to indices here, then checked: the sibling must exist,
//! be declared earlier and be an 8/16/32-bit integer.

use crate::error::SchemaError;
use crate::types::{
    ArrayDescriptor, FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind, UnionArm,
    UnionDescriptor, VarArrayDescriptor,
};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

const PRIMITIVE_KINDS: [PrimitiveKind; 11] = [
    PrimitiveKind::Void,
    PrimitiveKind::U8,
    PrimitiveKind::U16,
    PrimitiveKind::U32,
    PrimitiveKind::U64,
    PrimitiveKind::I8,
    PrimitiveKind::I16,
    PrimitiveKind::I32,
    PrimitiveKind::I64,
    PrimitiveKind::F32,
    PrimitiveKind::F64,
];

static PRIMITIVES: OnceLock<Vec<Arc<TypeDescriptor>>> = OnceLock::new();

/// Shared descriptor for a primitive kind.
///
/// Every call for the same kind returns the same allocation.
pub fn primitive(kind: PrimitiveKind) -> Arc<TypeDescriptor> {
    let table = PRIMITIVES.get_or_init(|| {
        PRIMITIVE_KINDS
            .iter()
            .map(|k| Arc::new(TypeDescriptor::new(k.name(), TypeKind::Primitive(*k))))
            .collect()
    });
    let slot = PRIMITIVE_KINDS
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(0);
    Arc::clone(&table[slot])
}

/// Struct from an ordered field list, validating sibling references.
pub fn struct_of(
    name: impl Into<String>,
    fields: Vec<FieldDescriptor>,
) -> Result<TypeDescriptor, SchemaError> {
    let name = name.into();
    validate_struct(&name, &fields)?;
    Ok(TypeDescriptor::new(name, TypeKind::Struct(fields)))
}

/// Union selected by the field at `discriminator` in the enclosing struct.
///
/// The selector itself can only be checked once the union is placed in a
/// struct (see [`struct_of`]).
pub fn union_of(
    name: impl Into<String>,
    discriminator: usize,
    arms: Vec<UnionArm>,
) -> Result<TypeDescriptor, SchemaError> {
    let name = name.into();
    validate_arms(&name, &arms)?;
    Ok(TypeDescriptor::new(
        name,
        TypeKind::Union(UnionDescriptor {
            discriminator,
            arms,
        }),
    ))
}

pub fn fixed_array_of(element: Arc<TypeDescriptor>, length: usize) -> TypeDescriptor {
    TypeDescriptor::new(
        format!("{}[{}]", element.name, length),
        TypeKind::Array(ArrayDescriptor { element, length }),
    )
}

/// Array whose length is the field at `count_field` in the enclosing struct.
pub fn var_array_of(element: Arc<TypeDescriptor>, count_field: usize) -> TypeDescriptor {
    TypeDescriptor::new(
        format!("{}[]", element.name),
        TypeKind::VarArray(VarArrayDescriptor {
            element,
            count_field,
        }),
    )
}

fn validate_arms(type_name: &str, arms: &[UnionArm]) -> Result<(), SchemaError> {
    if arms.is_empty() {
        return Err(SchemaError::EmptyUnion {
            type_name: type_name.to_string(),
        });
    }
    let mut seen = HashSet::with_capacity(arms.len());
    for arm in arms {
        if !seen.insert(arm.label) {
            return Err(SchemaError::DuplicateArm {
                type_name: type_name.to_string(),
                label: arm.label,
            });
        }
    }
    Ok(())
}

fn validate_struct(type_name: &str, fields: &[FieldDescriptor]) -> Result<(), SchemaError> {
    for (index, field) in fields.iter().enumerate() {
        let selector = match &field.type_desc.kind {
            TypeKind::Union(u) => u.discriminator,
            TypeKind::VarArray(v) => v.count_field,
            _ => continue,
        };
        if selector >= index {
            return Err(SchemaError::SelectorNotBefore {
                type_name: type_name.to_string(),
                field: field.name.clone(),
                selector,
            });
        }
        match fields[selector].type_desc.kind {
            TypeKind::Primitive(p) if p.is_selector() => {}
            _ => {
                return Err(SchemaError::SelectorNotInteger {
                    type_name: type_name.to_string(),
                    field: field.name.clone(),
                    selector,
                })
            }
        }
    }
    Ok(())
}

#[derive(Debug)]
enum PendingType {
    Ready(Arc<TypeDescriptor>),
    Union {
        selector: String,
        arms: Vec<UnionArm>,
    },
    VarArray {
        count: String,
        element: Arc<TypeDescriptor>,
    },
}

/// Builder for struct descriptors.
#[derive(Debug)]
pub struct StructBuilder {
    name: String,
    fields: Vec<(String, PendingType)>,
}

impl StructBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field with a type descriptor.
    pub fn field(mut self, name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        self.fields
            .push((name.into(), PendingType::Ready(type_desc)));
        self
    }

    /// Add a primitive field.
    pub fn primitive_field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field(name, primitive(kind))
    }

    /// Add a fixed array field.
    pub fn array_field(
        self,
        name: impl Into<String>,
        element: Arc<TypeDescriptor>,
        length: usize,
    ) -> Self {
        self.field(name, Arc::new(fixed_array_of(element, length)))
    }

    /// Add a union field selected by the earlier field `selector`.
    pub fn union_field(
        mut self,
        name: impl Into<String>,
        selector: impl Into<String>,
        arms: Vec<UnionArm>,
    ) -> Self {
        self.fields.push((
            name.into(),
            PendingType::Union {
                selector: selector.into(),
                arms,
            },
        ));
        self
    }

    /// Add a variable array field sized by the earlier field `count`.
    pub fn var_array_field(
        mut self,
        name: impl Into<String>,
        count: impl Into<String>,
        element: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields.push((
            name.into(),
            PendingType::VarArray {
                count: count.into(),
                element,
            },
        ));
        self
    }

    /// Resolve sibling names and validate the result.
    pub fn build(self) -> Result<TypeDescriptor, SchemaError> {
        let names: Vec<String> = self.fields.iter().map(|(n, _)| n.clone()).collect();
        let lookup = |field: &str, sibling: &str| {
            names
                .iter()
                .position(|n| n == sibling)
                .ok_or_else(|| SchemaError::UnknownField {
                    type_name: self.name.clone(),
                    field: format!("{} -> {}", field, sibling),
                })
        };

        let mut fields = Vec::with_capacity(self.fields.len());
        for (field_name, pending) in &self.fields {
            let type_desc = match pending {
                PendingType::Ready(desc) => Arc::clone(desc),
                PendingType::Union { selector, arms } => {
                    let index = lookup(field_name, selector)?;
                    Arc::new(union_of(
                        format!("{}.{}", self.name, field_name),
                        index,
                        arms.clone(),
                    )?)
                }
                PendingType::VarArray { count, element } => {
                    let index = lookup(field_name, count)?;
                    Arc::new(var_array_of(Arc::clone(element), index))
                }
            };
            fields.push(FieldDescriptor::new(field_name.clone(), type_desc));
        }

        struct_of(self.name, fields)
    }
}

/// Collects union arms.
#[derive(Debug, Default)]
pub struct UnionBuilder {
    arms: Vec<UnionArm>,
}

impl UnionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(mut self, label: u32, name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        self.arms.push(UnionArm::new(label, name, type_desc));
        self
    }

    pub fn primitive_arm(self, label: u32, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.arm(label, name, primitive(kind))
    }

    /// Arms for [`StructBuilder::union_field`].
    pub fn into_arms(self) -> Vec<UnionArm> {
        self.arms
    }

    /// Standalone union descriptor selected by field `discriminator`.
    pub fn build(
        self,
        name: impl Into<String>,
        discriminator: usize,
    ) -> Result<TypeDescriptor, SchemaError> {
        union_of(name, discriminator, self.arms)
    }
}
