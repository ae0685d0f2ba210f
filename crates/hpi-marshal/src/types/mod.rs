// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type description model.
//!
//! A schema is a tree of [`TypeDescriptor`]s built leaves first:
//!
//! ```rust
//! use hpi_marshal::types::{primitive, PrimitiveKind, StructBuilder, UnionBuilder};
//! use std::sync::Arc;
//!
//! let reading = StructBuilder::new("SensorReading")
//!     .primitive_field("IsSupported", PrimitiveKind::U8)
//!     .primitive_field("Type", PrimitiveKind::U32)
//!     .union_field(
//!         "Value",
//!         "Type",
//!         UnionBuilder::new()
//!             .primitive_arm(0, "SensorInt64", PrimitiveKind::I64)
//!             .primitive_arm(1, "SensorUint64", PrimitiveKind::U64)
//!             .into_arms(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let thresholds = StructBuilder::new("Pair")
//!     .field("Low", Arc::new(reading.clone()))
//!     .field("High", Arc::new(reading))
//!     .build()
//!     .unwrap();
//! assert_eq!(thresholds.wire_size(), Some(26));
//! # let _ = primitive(PrimitiveKind::U8);
//! ```

mod builder;
mod descriptor;

pub use builder::{
    fixed_array_of, primitive, struct_of, union_of, var_array_of, StructBuilder, UnionBuilder,
};
pub use descriptor::{
    ArrayDescriptor, CustomCodec, FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind,
    UnionArm, UnionDescriptor, VarArrayDescriptor,
};
