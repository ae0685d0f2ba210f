// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema construction, marshaling and demarshaling.

use crate::ser::SerError;
use std::collections::TryReserveError;
use std::fmt;

/// A type descriptor tree that cannot be walked.
///
/// Raised while building descriptors, so a bad schema is rejected before any
/// value is marshaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A selector names a field the struct does not have.
    UnknownField { type_name: String, field: String },
    /// The selector field is not declared before the field it controls.
    SelectorNotBefore {
        type_name: String,
        field: String,
        selector: usize,
    },
    /// The selector field is not an 8/16/32-bit integer.
    SelectorNotInteger {
        type_name: String,
        field: String,
        selector: usize,
    },
    /// Two union arms share a discriminator value.
    DuplicateArm { type_name: String, label: u32 },
    /// A union has no arms at all.
    EmptyUnion { type_name: String },
    /// A union or variable array used outside of an enclosing struct.
    Detached { type_name: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { type_name, field } => {
                write!(f, "{}: unknown selector field '{}'", type_name, field)
            }
            Self::SelectorNotBefore {
                type_name,
                field,
                selector,
            } => write!(
                f,
                "{}: selector #{} of field '{}' must be declared before it",
                type_name, selector, field
            ),
            Self::SelectorNotInteger {
                type_name,
                field,
                selector,
            } => write!(
                f,
                "{}: selector #{} of field '{}' is not an 8/16/32-bit integer",
                type_name, selector, field
            ),
            Self::DuplicateArm { type_name, label } => {
                write!(f, "{}: duplicate union arm for discriminator {}", type_name, label)
            }
            Self::EmptyUnion { type_name } => write!(f, "{}: union has no arms", type_name),
            Self::Detached { type_name } => write!(
                f,
                "{}: unions and variable arrays must be fields of a struct",
                type_name
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Errors for the encode direction.
///
/// A union value whose discriminator selects no arm is not reported here: that
/// is a broken producer and panics instead.
#[derive(Debug)]
pub enum MarshalError {
    BufferTooSmall {
        offset: usize,
        need: usize,
        have: usize,
    },
    TypeMismatch {
        expected: String,
        found: String,
    },
    /// A variable array holds a different number of elements than its count field.
    LengthMismatch {
        field: String,
        count: usize,
        len: usize,
    },
    Schema(SchemaError),
    Custom(String),
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { offset, need, have } => write!(
                f,
                "Buffer too small at offset {}: need {} bytes, have {}",
                offset, need, have
            ),
            Self::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Self::LengthMismatch { field, count, len } => write!(
                f,
                "Length mismatch for '{}': count field says {}, array holds {}",
                field, count, len
            ),
            Self::Schema(e) => write!(f, "Schema error: {}", e),
            Self::Custom(msg) => write!(f, "Custom codec failed: {}", msg),
        }
    }
}

impl std::error::Error for MarshalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SerError> for MarshalError {
    fn from(e: SerError) -> Self {
        match e {
            SerError::WriteFailed {
                offset,
                needed,
                available,
            }
            | SerError::ReadFailed {
                offset,
                needed,
                available,
            } => Self::BufferTooSmall {
                offset,
                need: needed,
                have: available,
            },
        }
    }
}

impl From<SchemaError> for MarshalError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

/// Errors for the decode direction.
///
/// Demarshal input comes from a peer, so every malformed buffer ends up here
/// instead of in a panic.
#[derive(Debug)]
pub enum DecodeError {
    Truncated {
        offset: usize,
        need: usize,
        have: usize,
    },
    UnknownDiscriminator {
        type_name: String,
        value: u32,
    },
    InvalidEnumValue {
        type_name: String,
        value: i64,
    },
    /// A count field asks for more elements than the limit or the buffer allows.
    ArrayTooLarge {
        field: String,
        count: usize,
        limit: usize,
    },
    OutOfMemory {
        field: String,
        count: usize,
        source: TryReserveError,
    },
    TypeMismatch {
        expected: String,
        found: String,
    },
    Schema(SchemaError),
    Custom(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { offset, need, have } => write!(
                f,
                "Truncated input at offset {}: need {} bytes, have {}",
                offset, need, have
            ),
            Self::UnknownDiscriminator { type_name, value } => {
                write!(f, "{}: no union arm for discriminator {}", type_name, value)
            }
            Self::InvalidEnumValue { type_name, value } => {
                write!(f, "{}: invalid enumeration value {}", type_name, value)
            }
            Self::ArrayTooLarge {
                field,
                count,
                limit,
            } => write!(
                f,
                "Array '{}' claims {} elements, limit is {}",
                field, count, limit
            ),
            Self::OutOfMemory { field, count, .. } => write!(
                f,
                "Out of memory allocating {} elements for '{}'",
                count, field
            ),
            Self::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Self::Schema(e) => write!(f, "Schema error: {}", e),
            Self::Custom(msg) => write!(f, "Custom codec failed: {}", msg),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::OutOfMemory { source, .. } => Some(source),
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SerError> for DecodeError {
    fn from(e: SerError) -> Self {
        match e {
            SerError::WriteFailed {
                offset,
                needed,
                available,
            }
            | SerError::ReadFailed {
                offset,
                needed,
                available,
            } => Self::Truncated {
                offset,
                need: needed,
                have: available,
            },
        }
    }
}

impl From<SchemaError> for DecodeError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ser_error_maps_to_truncated() {
        let err: DecodeError = SerError::ReadFailed {
            offset: 7,
            needed: 8,
            available: 3,
        }
        .into();
        match err {
            DecodeError::Truncated { offset, need, have } => {
                assert_eq!((offset, need, have), (7, 8, 3));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_ser_error_maps_to_buffer_too_small() {
        let err: MarshalError = SerError::WriteFailed {
            offset: 2,
            needed: 4,
            available: 1,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Buffer too small at offset 2: need 4 bytes, have 1"
        );
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::SelectorNotBefore {
            type_name: "SensorReading".into(),
            field: "value".into(),
            selector: 2,
        };
        assert_eq!(
            err.to_string(),
            "SensorReading: selector #2 of field 'value' must be declared before it"
        );
        let wrapped = DecodeError::from(err);
        assert!(std::error::Error::source(&wrapped).is_some());
    }
}
