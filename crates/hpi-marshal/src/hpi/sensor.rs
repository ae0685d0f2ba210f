// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sensor readings, thresholds and ranges.

use crate::Marshal;

pub const SENSOR_BUFFER_LENGTH: usize = 32;

/// `SaHpiSensorNumT`.
pub type SensorNum = u8;
/// `SaHpiEventStateT`.
pub type EventState = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Marshal)]
#[hpi(repr = u32)]
pub enum SensorReadingType {
    Int64 = 0,
    Uint64 = 1,
    Float64 = 2,
    Buffer = 3,
}

/// `SaHpiSensorReadingUnionT`, selected by [`SensorReading::reading_type`].
#[derive(Debug, Clone, PartialEq, Marshal)]
pub enum SensorReadingValue {
    #[hpi(label = SensorReadingType::Int64)]
    Int64(i64),
    #[hpi(label = SensorReadingType::Uint64)]
    Uint64(u64),
    #[hpi(label = SensorReadingType::Float64)]
    Float64(f64),
    #[hpi(label = SensorReadingType::Buffer)]
    Buffer([u8; SENSOR_BUFFER_LENGTH]),
}

impl SensorReadingValue {
    pub fn reading_type(&self) -> SensorReadingType {
        match self {
            Self::Int64(_) => SensorReadingType::Int64,
            Self::Uint64(_) => SensorReadingType::Uint64,
            Self::Float64(_) => SensorReadingType::Float64,
            Self::Buffer(_) => SensorReadingType::Buffer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Marshal)]
pub struct SensorReading {
    pub is_supported: bool,
    pub reading_type: SensorReadingType,
    #[hpi(union = "reading_type")]
    pub value: SensorReadingValue,
}

impl SensorReading {
    /// Supported reading whose type matches `value`.
    pub fn new(value: SensorReadingValue) -> Self {
        Self {
            is_supported: true,
            reading_type: value.reading_type(),
            value,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            is_supported: false,
            reading_type: SensorReadingType::Int64,
            value: SensorReadingValue::Int64(0),
        }
    }
}

impl Default for SensorReading {
    fn default() -> Self {
        Self::unsupported()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Marshal)]
pub struct SensorThresholds {
    pub low_critical: SensorReading,
    pub low_major: SensorReading,
    pub low_minor: SensorReading,
    pub up_critical: SensorReading,
    pub up_major: SensorReading,
    pub up_minor: SensorReading,
    pub pos_thd_hysteresis: SensorReading,
    pub neg_thd_hysteresis: SensorReading,
}

#[derive(Debug, Clone, PartialEq, Default, Marshal)]
pub struct SensorRange {
    /// `SaHpiSensorRangeFlagsT` bits.
    pub flags: u8,
    pub max: SensorReading,
    pub min: SensorReading,
    pub nominal: SensorReading,
    pub normal_max: SensorReading,
    pub normal_min: SensorReading,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HpiType, HpiUnion, TypeKind};

    #[test]
    fn test_reading_union_arms() {
        let arms = SensorReadingValue::arms();
        let labels: Vec<u32> = arms.iter().map(|a| a.label).collect();
        assert_eq!(labels, vec![0, 1, 2, 3]);
        assert_eq!(arms[3].type_desc.wire_size(), Some(SENSOR_BUFFER_LENGTH));
        assert_eq!(SensorReadingValue::Float64(1.0).label(), 2);
    }

    #[test]
    fn test_reading_descriptor_shape() {
        let desc = SensorReading::type_descriptor();
        let value = desc.field("value").expect("union field");
        match &value.type_desc.kind {
            TypeKind::Union(u) => assert_eq!(u.discriminator, 1),
            other => panic!("expected union, got {:?}", other),
        }
        // bool + type + largest arm (buffer)
        assert_eq!(desc.wire_size(), Some(1 + 4 + SENSOR_BUFFER_LENGTH));
        assert_eq!(desc.min_wire_size(), 1 + 4 + 8);
    }

    #[test]
    fn test_descriptor_is_cached() {
        let a = SensorReading::type_descriptor();
        let b = SensorReading::type_descriptor();
        assert!(std::sync::Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_new_sets_matching_type() {
        let r = SensorReading::new(SensorReadingValue::Uint64(7));
        assert_eq!(r.reading_type, SensorReadingType::Uint64);
        assert!(r.is_supported);
    }
}
