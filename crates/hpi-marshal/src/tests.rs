// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::call::{find_call, SENSOR_READING_GET};
use crate::config::MarshalConfig;
use crate::demarshal::{demarshal_array_with, demarshal_from_with};
use crate::error::{DecodeError, MarshalError};
use crate::hpi::{HandlerConfig, HandlerConfigParam, SensorReading, SensorReadingValue, SA_OK};
use crate::message::{decode_frame, encode_frame, MessageHeader, MessageType};
use crate::ser::{ByteOrder, Cursor, WireWrite};
use crate::types::{
    fixed_array_of, primitive, struct_of, union_of, var_array_of, CustomCodec, FieldDescriptor,
    PrimitiveKind, StructBuilder, TypeDescriptor, TypeKind, UnionArm, UnionBuilder,
};
use crate::value::Value;
use crate::{demarshal, demarshal_with, marshal_into, marshal_to_vec, marshal_with_order, HpiType};
use std::sync::Arc;

/// Fixed point number stored as hundredths in an `i32`.
#[derive(Debug)]
struct Centi;

impl CustomCodec for Centi {
    fn marshal(&self, value: &Value, writer: &mut dyn WireWrite) -> Result<(), MarshalError> {
        let Some(v) = value.as_f64() else {
            return Err(MarshalError::TypeMismatch {
                expected: "f64".into(),
                found: value.kind_name().into(),
            });
        };
        writer.write_i32((v * 100.0).round() as i32)?;
        Ok(())
    }

    fn demarshal(&self, cursor: &mut Cursor<'_>, _config: &MarshalConfig) -> Result<Value, DecodeError> {
        Ok(Value::F64(f64::from(cursor.read_i32()?) / 100.0))
    }

    fn wire_size(&self) -> Option<usize> {
        Some(4)
    }
}

/// Wraps another descriptor; decodes it through the nested entry point.
#[derive(Debug)]
struct Wrapped(Arc<TypeDescriptor>);

impl CustomCodec for Wrapped {
    fn marshal(&self, value: &Value, writer: &mut dyn WireWrite) -> Result<(), MarshalError> {
        marshal_into(writer, &self.0, value)
    }

    fn demarshal(&self, cursor: &mut Cursor<'_>, config: &MarshalConfig) -> Result<Value, DecodeError> {
        demarshal_from_with(config, cursor, &self.0)
    }
}

fn reading_schema() -> Arc<TypeDescriptor> {
    Arc::new(
        StructBuilder::new("SensorReading")
            .primitive_field("IsSupported", PrimitiveKind::U8)
            .primitive_field("Type", PrimitiveKind::U32)
            .union_field(
                "Value",
                "Type",
                UnionBuilder::new()
                    .primitive_arm(0, "SensorInt64", PrimitiveKind::I64)
                    .primitive_arm(1, "SensorUint64", PrimitiveKind::U64)
                    .primitive_arm(2, "SensorFloat64", PrimitiveKind::F64)
                    .arm(
                        3,
                        "SensorBuffer",
                        Arc::new(fixed_array_of(primitive(PrimitiveKind::U8), 32)),
                    )
                    .into_arms(),
            )
            .build()
            .expect("valid schema"),
    )
}

fn reading(kind: u32, payload: Value) -> Value {
    Value::Struct(vec![Value::U8(1), Value::U32(kind), Value::Union(Box::new(payload))])
}

#[test]
fn test_dynamic_schema_matches_derived() {
    let dynamic = reading_schema();
    let derived = SensorReading::type_descriptor();
    assert_eq!(dynamic.wire_size(), derived.wire_size());
    assert_eq!(dynamic.min_wire_size(), derived.min_wire_size());

    let typed = SensorReading::new(SensorReadingValue::Uint64(0xDEAD_BEEF));
    let value = reading(1, Value::U64(0xDEAD_BEEF));
    assert_eq!(typed.to_value(), value);

    let a = marshal_to_vec(ByteOrder::Big, &dynamic, &value).expect("dynamic");
    let b = marshal_to_vec(ByteOrder::Big, &derived, &typed.to_value()).expect("derived");
    assert_eq!(a, b);
}

#[test]
fn test_union_writes_only_active_arm() {
    let ty = reading_schema();
    let small = marshal_to_vec(ByteOrder::Little, &ty, &reading(0, Value::I64(-1))).expect("int");
    assert_eq!(small.len(), 1 + 4 + 8);

    let buffer = Value::Array((0u8..32).map(Value::U8).collect());
    let large = marshal_to_vec(ByteOrder::Little, &ty, &reading(3, buffer.clone())).expect("buf");
    assert_eq!(large.len(), 1 + 4 + 32);
    assert_eq!(large[5..], (0u8..32).collect::<Vec<_>>()[..]);

    let (back, used) = demarshal(ByteOrder::Little, &ty, &large).expect("decode");
    assert_eq!(used, large.len());
    assert_eq!(back, reading(3, buffer));
}

#[test]
fn test_signed_selector_is_zero_extended() {
    let ty = struct_of(
        "Tagged",
        vec![
            FieldDescriptor::new("Tag", primitive(PrimitiveKind::I8)),
            FieldDescriptor::new(
                "Body",
                Arc::new(
                    union_of(
                        "Tagged.Body",
                        0,
                        vec![
                            UnionArm::new(255, "Minus", primitive(PrimitiveKind::U16)),
                            UnionArm::new(1, "One", primitive(PrimitiveKind::U32)),
                        ],
                    )
                    .expect("arms"),
                ),
            ),
        ],
    )
    .expect("struct");

    let value = Value::Struct(vec![Value::I8(-1), Value::Union(Box::new(Value::U16(0xABCD)))]);
    let bytes = marshal_to_vec(ByteOrder::Big, &ty, &value).expect("marshal");
    assert_eq!(bytes, vec![0xFF, 0xAB, 0xCD]);
    let (back, _) = demarshal(ByteOrder::Big, &ty, &bytes).expect("decode");
    assert_eq!(back, value);
}

#[test]
fn test_var_array_of_structs_with_unions() {
    let element = reading_schema();
    let ty = StructBuilder::new("Readings")
        .primitive_field("Count", PrimitiveKind::U16)
        .primitive_field("Flags", PrimitiveKind::U8)
        .var_array_field("Items", "Count", element)
        .build()
        .expect("schema");

    let items = vec![
        reading(0, Value::I64(-5)),
        reading(2, Value::F64(36.6)),
        reading(1, Value::U64(7)),
    ];
    let value = Value::Struct(vec![Value::U16(3), Value::U8(0x80), Value::Array(items)]);

    let bytes = marshal_to_vec(ByteOrder::Big, &ty, &value).expect("marshal");
    assert_eq!(bytes.len(), 2 + 1 + 3 * 13);
    assert_eq!(&bytes[..3], &[0, 3, 0x80]);

    let (back, used) = demarshal(ByteOrder::Big, &ty, &bytes).expect("decode");
    assert_eq!(used, bytes.len());
    assert_eq!(back, value);
}

#[test]
fn test_var_array_with_distant_count() {
    // count field separated from its array by other fields
    let ty = struct_of(
        "Sparse",
        vec![
            FieldDescriptor::new("N", primitive(PrimitiveKind::U32)),
            FieldDescriptor::new("Pad", primitive(PrimitiveKind::U64)),
            FieldDescriptor::new(
                "Data",
                Arc::new(var_array_of(primitive(PrimitiveKind::I16), 0)),
            ),
        ],
    )
    .expect("schema");
    let value = Value::Struct(vec![
        Value::U32(2),
        Value::U64(u64::MAX),
        Value::from(vec![-2i16, 300]),
    ]);
    let bytes = marshal_to_vec(ByteOrder::Little, &ty, &value).expect("marshal");
    assert_eq!(bytes.len(), 4 + 8 + 4);
    assert_eq!(&bytes[12..], &[0xFE, 0xFF, 0x2C, 0x01]);
    assert_eq!(demarshal(ByteOrder::Little, &ty, &bytes).expect("decode").0, value);
}

#[test]
fn test_custom_codec_nested_in_struct() {
    let ty = StructBuilder::new("Probe")
        .primitive_field("Id", PrimitiveKind::U8)
        .field(
            "Celsius",
            Arc::new(TypeDescriptor::new("centi", TypeKind::Custom(Arc::new(Centi)))),
        )
        .build()
        .expect("schema");
    assert_eq!(ty.wire_size(), Some(5));

    let value = Value::Struct(vec![Value::U8(4), Value::F64(-12.25)]);
    let bytes = marshal_to_vec(ByteOrder::Big, &ty, &value).expect("marshal");
    assert_eq!(bytes, vec![4, 0xFF, 0xFF, 0xFB, 0x37]);
    assert_eq!(demarshal(ByteOrder::Big, &ty, &bytes).expect("decode").0, value);

    let bad = Value::Struct(vec![Value::U8(4), Value::U32(1)]);
    assert!(matches!(
        marshal_to_vec(ByteOrder::Big, &ty, &bad),
        Err(MarshalError::TypeMismatch { .. })
    ));
}

#[test]
fn test_void_field_takes_no_space() {
    let ty = StructBuilder::new("WithVoid")
        .primitive_field("A", PrimitiveKind::U8)
        .primitive_field("Nothing", PrimitiveKind::Void)
        .primitive_field("B", PrimitiveKind::U8)
        .build()
        .expect("schema");
    let value = Value::Struct(vec![Value::U8(1), Value::Void, Value::U8(2)]);
    let bytes = marshal_to_vec(ByteOrder::native(), &ty, &value).expect("marshal");
    assert_eq!(bytes, vec![1, 2]);
    assert_eq!(demarshal(ByteOrder::native(), &ty, &bytes).expect("decode").0, value);
}

#[test]
fn test_marshal_into_short_buffer() {
    let ty = reading_schema();
    let mut buf = [0u8; 8];
    let err = marshal_with_order(ByteOrder::Big, &ty, &reading(0, Value::I64(1)), &mut buf)
        .unwrap_err();
    assert!(matches!(err, MarshalError::BufferTooSmall { offset: 5, .. }));
}

#[test]
fn test_call_over_frame() {
    let call = find_call(SENSOR_READING_GET).expect("call");
    let order = ByteOrder::Little;

    let request = call
        .marshal_request(order, &[Value::U32(1), Value::U32(2), Value::U8(3)])
        .expect("request");
    let frame = encode_frame(order, &MessageHeader::new(MessageType::Msg, 4, call.id), &request)
        .expect("frame");

    let (header, body, peer_order) = decode_frame(&frame).expect("decode frame");
    assert_eq!(header.id, SENSOR_READING_GET);
    let params = find_call(header.id)
        .expect("call")
        .demarshal_request(peer_order, body)
        .expect("params");
    assert_eq!(params, vec![Value::U32(1), Value::U32(2), Value::U8(3)]);

    let value = SensorReading::new(SensorReadingValue::Int64(-40));
    let reply = call
        .marshal_reply(peer_order, &[Value::I32(SA_OK), value.to_value(), Value::U16(1)])
        .expect("reply");
    let reply_frame = encode_frame(peer_order, &MessageHeader::reply_to(&header), &reply)
        .expect("reply frame");

    let (reply_header, reply_body, reply_order) = decode_frame(&reply_frame).expect("decode");
    assert!(reply_header.is_reply());
    assert_eq!(reply_header.seq_in, 4);
    let out = call.demarshal_reply(reply_order, reply_body).expect("reply params");
    assert_eq!(SensorReading::from_value(out[1].clone()).expect("typed"), value);
}

#[test]
fn test_nested_codec_keeps_caller_limits() {
    let handler = HandlerConfig::new(vec![
        HandlerConfigParam::new("plugin", "libsimulator"),
        HandlerConfigParam::new("entity_root", "{SYSTEM_CHASSIS,1}"),
    ]);
    let wrapped = TypeDescriptor::new(
        "Wrapped",
        TypeKind::Custom(Arc::new(Wrapped(HandlerConfig::type_descriptor()))),
    );
    let bytes = marshal_to_vec(ByteOrder::Big, &wrapped, &handler.to_value()).expect("marshal");

    let (value, used) = demarshal(ByteOrder::Big, &wrapped, &bytes).expect("default limits");
    assert_eq!(used, bytes.len());
    assert_eq!(HandlerConfig::from_value(value).expect("typed"), handler);

    let strict = MarshalConfig::default().with_max_array_len(1);
    let err = demarshal_with(&strict, ByteOrder::Big, &wrapped, &bytes).unwrap_err();
    assert!(matches!(err, DecodeError::ArrayTooLarge { count: 2, limit: 1, .. }));

    let types = vec![Arc::new(wrapped)];
    let err = demarshal_array_with(&strict, ByteOrder::Big, &types, &bytes).unwrap_err();
    assert!(matches!(err, DecodeError::ArrayTooLarge { count: 2, limit: 1, .. }));
}
