// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! SA Forum HPI data types.
//!
//! Schemas for the HPI structures carried by the RPC call table. Enumerated
//! HPI types travel as `u32`, `SaHpiBoolT` as one byte.

mod entity;
mod handler;
mod sensor;
mod text;

pub use entity::{Entity, EntityPath, EntityType, MAX_ENTITY_PATH};
pub use handler::{HandlerConfig, HandlerConfigParam, HandlerId};
pub use sensor::{
    EventState, SensorNum, SensorRange, SensorReading, SensorReadingType, SensorReadingValue,
    SensorThresholds, SENSOR_BUFFER_LENGTH,
};
pub use text::{Language, TextBuffer, TextType, MAX_TEXT_BUFFER_LENGTH};

/// `SaErrorT`.
pub type SaError = i32;
pub type SessionId = u32;
pub type ResourceId = u32;
pub type DomainId = u32;

pub const SA_OK: SaError = 0;
pub const SA_HPI_ERR_BASE: SaError = -1000;
pub const SA_ERR_HPI_ERROR: SaError = SA_HPI_ERR_BASE - 1;
pub const SA_ERR_HPI_UNSUPPORTED_API: SaError = SA_HPI_ERR_BASE - 2;
pub const SA_ERR_HPI_BUSY: SaError = SA_HPI_ERR_BASE - 3;
pub const SA_ERR_HPI_INTERNAL_ERROR: SaError = SA_HPI_ERR_BASE - 4;
pub const SA_ERR_HPI_INVALID_CMD: SaError = SA_HPI_ERR_BASE - 5;
pub const SA_ERR_HPI_TIMEOUT: SaError = SA_HPI_ERR_BASE - 6;
pub const SA_ERR_HPI_OUT_OF_SPACE: SaError = SA_HPI_ERR_BASE - 7;
pub const SA_ERR_HPI_INVALID_PARAMS: SaError = SA_HPI_ERR_BASE - 11;
pub const SA_ERR_HPI_INVALID_DATA: SaError = SA_HPI_ERR_BASE - 12;
pub const SA_ERR_HPI_NOT_PRESENT: SaError = SA_HPI_ERR_BASE - 13;
pub const SA_ERR_HPI_INVALID_SESSION: SaError = SA_HPI_ERR_BASE - 21;
pub const SA_ERR_HPI_INVALID_RESOURCE: SaError = SA_HPI_ERR_BASE - 23;

/// Implement `HpiType` for a `u32` newtype holding an open HPI enumeration.
macro_rules! hpi_u32_newtype {
    ($name:ident) => {
        impl $crate::HpiType for $name {
            fn type_descriptor() -> ::std::sync::Arc<$crate::TypeDescriptor> {
                $crate::types::primitive($crate::PrimitiveKind::U32)
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::U32(self.0)
            }

            fn from_value(value: $crate::Value) -> Result<Self, $crate::DecodeError> {
                <u32 as $crate::HpiType>::from_value(value).map(Self)
            }
        }
    };
}

pub(crate) use hpi_u32_newtype;
