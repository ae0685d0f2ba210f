// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Marshal / Demarshal Benchmark
//!
//! Measures the descriptor walk for:
//! - a union-bearing struct (`SensorThresholds`, eight readings)
//! - fixed arrays of structs (`EntityPath`)
//! - variable arrays of growing length (`HandlerConfig`)
//! - the typed layer on top (`to_value` / `from_value` included)

#![allow(clippy::uninlined_format_args)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hpi_marshal::hpi::{
    Entity, EntityPath, EntityType, HandlerConfig, HandlerConfigParam, SensorReading,
    SensorReadingValue, SensorThresholds,
};
use hpi_marshal::{
    demarshal, demarshal_typed, marshal_typed_with_order, marshal_with_order, ByteOrder, HpiType,
};
use std::hint::black_box as bb;

fn thresholds() -> SensorThresholds {
    SensorThresholds {
        low_critical: SensorReading::new(SensorReadingValue::Int64(-40)),
        low_major: SensorReading::new(SensorReadingValue::Int64(-20)),
        low_minor: SensorReading::new(SensorReadingValue::Int64(-5)),
        up_critical: SensorReading::new(SensorReadingValue::Float64(95.0)),
        up_major: SensorReading::new(SensorReadingValue::Float64(85.0)),
        up_minor: SensorReading::new(SensorReadingValue::Float64(70.0)),
        pos_thd_hysteresis: SensorReading::new(SensorReadingValue::Uint64(2)),
        neg_thd_hysteresis: SensorReading::new(SensorReadingValue::Uint64(2)),
    }
}

fn bench_dynamic(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic");
    let ty = SensorThresholds::type_descriptor();
    let value = thresholds().to_value();
    let mut buf = vec![0u8; 1024];

    for order in [ByteOrder::Big, ByteOrder::Little] {
        let name = format!("{:?}", order);
        group.bench_with_input(BenchmarkId::new("marshal_thresholds", &name), &order, |b, &order| {
            b.iter(|| {
                marshal_with_order(order, &ty, bb(&value), &mut buf).expect("marshal should succeed")
            });
        });

        let used = marshal_with_order(order, &ty, &value, &mut buf).expect("marshal should succeed");
        let bytes = buf[..used].to_vec();
        group.bench_with_input(BenchmarkId::new("demarshal_thresholds", &name), &order, |b, &order| {
            b.iter(|| demarshal(order, &ty, bb(&bytes)).expect("demarshal should succeed"));
        });
    }

    group.finish();
}

fn bench_typed(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed");
    let path = EntityPath::new(&[
        Entity::new(EntityType::SBC_BLADE, 4),
        Entity::new(EntityType::SYSTEM_SLOT, 4),
        Entity::new(EntityType::SUBRACK, 1),
        Entity::new(EntityType::RACK, 2),
    ]);
    let mut buf = vec![0u8; 256];
    let order = ByteOrder::native();

    group.bench_function("marshal_entity_path", |b| {
        b.iter(|| marshal_typed_with_order(order, bb(&path), &mut buf).expect("marshal should succeed"));
    });

    let used = marshal_typed_with_order(order, &path, &mut buf).expect("marshal should succeed");
    let bytes = buf[..used].to_vec();
    group.bench_function("demarshal_entity_path", |b| {
        b.iter(|| demarshal_typed::<EntityPath>(order, bb(&bytes)).expect("demarshal should succeed"));
    });

    group.finish();
}

fn bench_var_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("var_array");
    let order = ByteOrder::native();

    for count in [1usize, 8, 64] {
        let config = HandlerConfig::new(
            (0..count)
                .map(|i| HandlerConfigParam::new(&format!("param{}", i), "value"))
                .collect(),
        );
        let bytes = hpi_marshal::marshal_typed_to_vec(order, &config).expect("marshal should succeed");

        group.bench_with_input(BenchmarkId::new("demarshal_handler_config", count), &bytes, |b, bytes| {
            b.iter(|| demarshal_typed::<HandlerConfig>(order, bb(bytes)).expect("demarshal should succeed"));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dynamic, bench_typed, bench_var_array);
criterion_main!(benches);
