// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hpi-marshal - OpenHPI marshaling engine
//!
//! Byte-order aware binary marshaling driven by declarative type
//! descriptors: nested structs, unions selected by a sibling discriminator
//! field, fixed arrays, and variable arrays sized by a sibling count field.
//! Output is packed in declared field order with no padding.
//!
//! ## Quick Start
//!
//! ```rust
//! use hpi_marshal::{demarshal_typed, marshal_typed_to_vec, ByteOrder, Marshal};
//!
//! #[derive(Debug, PartialEq, Marshal)]
//! struct Fan {
//!     speed: u16,
//!     count: u8,
//!     #[hpi(count = "count")]
//!     blades: Vec<u8>,
//! }
//!
//! let fan = Fan { speed: 1200, count: 3, blades: vec![1, 2, 3] };
//! let bytes = marshal_typed_to_vec(ByteOrder::Big, &fan).unwrap();
//! assert_eq!(bytes, [0x04, 0xB0, 3, 1, 2, 3]);
//!
//! let (back, used) = demarshal_typed::<Fan>(ByteOrder::Big, &bytes).unwrap();
//! assert_eq!((back, used), (fan, 6));
//! ```
//!
//! ## Layers
//!
//! ```text
//! +-----------------------------------------------------------+
//! |  call     RPC signature table, request / reply lists      |
//! |  message  12-byte frame header, sender byte order         |
//! +-----------------------------------------------------------+
//! |  traits   HpiType / HpiUnion, #[derive(Marshal)]          |
//! |  hpi      TextBuffer, EntityPath, SensorReading, ...      |
//! +-----------------------------------------------------------+
//! |  marshal / demarshal   descriptor tree walk over Value    |
//! |  types                 TypeDescriptor, builders           |
//! +-----------------------------------------------------------+
//! |  ser      ByteOrder, Cursor, CursorMut, VecWriter         |
//! +-----------------------------------------------------------+
//! ```
//!
//! Marshal trusts its input: a union whose discriminator selects no arm is
//! a bug in the producer and panics. Demarshal does not: truncated input,
//! unknown discriminators and oversized counts are [`DecodeError`]s.

// Allow the derive macro to work inside this crate
extern crate self as hpi_marshal;

/// RPC call table and parameter list marshaling.
pub mod call;
/// Protocol constants and runtime decoding limits.
pub mod config;
/// Decoding from untrusted bytes.
pub mod demarshal;
pub mod error;
/// HPI data types described for the engine.
pub mod hpi;
/// Encoding of trusted values.
pub mod marshal;
/// Frame header encoding and validation.
pub mod message;
/// Byte order and bounds-checked cursors.
pub mod ser;
/// Typed layer over the dynamic engine.
pub mod traits;
/// Type descriptors and schema builders.
pub mod types;
pub mod value;

pub use config::MarshalConfig;
pub use demarshal::{
    demarshal, demarshal_array, demarshal_array_with, demarshal_from, demarshal_from_with,
    demarshal_with,
};
pub use error::{DecodeError, MarshalError, SchemaError};
pub use marshal::{
    marshal, marshal_array, marshal_into, marshal_to_vec, marshal_with, marshal_with_order,
};
pub use message::{decode_frame, encode_frame, MessageError, MessageHeader, MessageType};
pub use ser::ByteOrder;
pub use traits::{
    demarshal_typed, marshal_typed, marshal_typed_to_vec, marshal_typed_with_order, HpiType,
    HpiUnion,
};
pub use types::{PrimitiveKind, TypeDescriptor, TypeKind};
pub use value::Value;

// Derive macro (for #[derive(hpi_marshal::Marshal)])
pub use hpi_marshal_codegen::Marshal;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests;
