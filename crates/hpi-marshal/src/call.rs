// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RPC call signatures and parameter list marshaling.
//!
//! Every HPI call travels as a `Msg` frame whose header `id` names an entry
//! of the call table. The body is the request parameter list going in, and
//! the reply parameter list coming back. A reply always starts with an
//! `SaErrorT`; when that is not [`SA_OK`] the remaining parameters are left
//! out.
//!
//! ```
//! use hpi_marshal::call::{find_call, SENSOR_READING_GET};
//! use hpi_marshal::{ByteOrder, Value};
//!
//! let call = find_call(SENSOR_READING_GET).expect("known call");
//! let body = call
//!     .marshal_request(ByteOrder::Big, &[Value::U32(1), Value::U32(7), Value::U8(3)])
//!     .expect("marshal");
//! assert_eq!(body.len(), 9);
//! ```

use crate::config::MarshalConfig;
use crate::demarshal::Decoder;
use crate::error::{DecodeError, MarshalError};
use crate::hpi::{
    EntityPath, HandlerConfig, SaError, SensorReading, SensorThresholds, TextBuffer, SA_OK,
};
use crate::marshal::marshal_list_into;
use crate::ser::{ByteOrder, Cursor, VecWriter};
use crate::traits::HpiType;
use crate::types::{primitive, PrimitiveKind, TypeDescriptor};
use crate::value::Value;
use std::sync::{Arc, OnceLock};

pub const SESSION_OPEN: u32 = 1;
pub const SESSION_CLOSE: u32 = 2;
pub const DISCOVER: u32 = 3;
pub const DOMAIN_TAG_SET: u32 = 6;
pub const RESOURCE_TAG_SET: u32 = 10;
pub const RESOURCE_ID_GET: u32 = 11;
pub const GET_ID_BY_ENTITY_PATH: u32 = 12;
pub const SENSOR_READING_GET: u32 = 36;
pub const SENSOR_THRESHOLDS_GET: u32 = 37;
pub const SENSOR_THRESHOLDS_SET: u32 = 38;
pub const HANDLER_CREATE: u32 = 107;
pub const HANDLER_DESTROY: u32 = 108;
pub const MY_ENTITY_PATH_GET: u32 = 116;

/// Signature of one RPC call.
#[derive(Debug, Clone)]
pub struct HpiCall {
    pub id: u32,
    pub name: &'static str,
    pub request: Vec<Arc<TypeDescriptor>>,
    /// Starts with the `SaErrorT` result.
    pub reply: Vec<Arc<TypeDescriptor>>,
}

impl HpiCall {
    /// Request body size bound, see [`TypeDescriptor::wire_size`].
    pub fn request_len(&self) -> Option<usize> {
        list_size(&self.request)
    }

    /// Bound on a successful reply body.
    pub fn reply_len(&self) -> Option<usize> {
        list_size(&self.reply)
    }

    pub fn marshal_request(
        &self,
        order: ByteOrder,
        params: &[Value],
    ) -> Result<Vec<u8>, MarshalError> {
        marshal_list(order, &self.request, params)
    }

    pub fn demarshal_request(
        &self,
        order: ByteOrder,
        body: &[u8],
    ) -> Result<Vec<Value>, DecodeError> {
        self.demarshal_request_with(&MarshalConfig::default(), order, body)
    }

    pub fn demarshal_request_with(
        &self,
        config: &MarshalConfig,
        order: ByteOrder,
        body: &[u8],
    ) -> Result<Vec<Value>, DecodeError> {
        let mut cursor = Cursor::new(body, order);
        Decoder::new(config).decode_list(&mut cursor, &self.request)
    }

    /// Marshal a reply. `params[0]` is the `SaErrorT` result; on failure only
    /// that code is written and the other parameters are ignored.
    pub fn marshal_reply(&self, order: ByteOrder, params: &[Value]) -> Result<Vec<u8>, MarshalError> {
        let result = match params.first() {
            Some(Value::I32(code)) => *code,
            Some(other) => {
                return Err(MarshalError::TypeMismatch {
                    expected: "i32".into(),
                    found: other.kind_name().into(),
                })
            }
            None => {
                return Err(MarshalError::LengthMismatch {
                    field: "reply".into(),
                    count: self.reply.len(),
                    len: 0,
                })
            }
        };

        if result == SA_OK {
            marshal_list(order, &self.reply, params)
        } else {
            marshal_list(order, &self.reply[..1], &params[..1])
        }
    }

    /// Demarshal a reply. An error result comes back as a one-element list.
    pub fn demarshal_reply(&self, order: ByteOrder, body: &[u8]) -> Result<Vec<Value>, DecodeError> {
        self.demarshal_reply_with(&MarshalConfig::default(), order, body)
    }

    pub fn demarshal_reply_with(
        &self,
        config: &MarshalConfig,
        order: ByteOrder,
        body: &[u8],
    ) -> Result<Vec<Value>, DecodeError> {
        let decoder = Decoder::new(config);
        let mut cursor = Cursor::new(body, order);
        let result = decoder.decode(&mut cursor, &sa_error())?;
        if result != Value::I32(SA_OK) {
            return Ok(vec![result]);
        }

        // the result is part of the reply list, so start over
        let mut cursor = Cursor::new(body, order);
        decoder.decode_list(&mut cursor, &self.reply)
    }
}

fn list_size(types: &[Arc<TypeDescriptor>]) -> Option<usize> {
    types.iter().map(|ty| ty.wire_size()).sum()
}

fn marshal_list(
    order: ByteOrder,
    types: &[Arc<TypeDescriptor>],
    params: &[Value],
) -> Result<Vec<u8>, MarshalError> {
    let mut writer = VecWriter::with_capacity(order, list_size(types).unwrap_or(0));
    marshal_list_into(&mut writer, types, params)?;
    Ok(writer.into_bytes())
}

/// `SaErrorT` result code carried first in every reply.
pub fn reply_result(order: ByteOrder, body: &[u8]) -> Result<SaError, DecodeError> {
    Cursor::new(body, order).read_i32().map_err(DecodeError::from)
}

fn sa_error() -> Arc<TypeDescriptor> {
    primitive(PrimitiveKind::I32)
}

fn u32_param() -> Arc<TypeDescriptor> {
    primitive(PrimitiveKind::U32)
}

fn call(
    id: u32,
    name: &'static str,
    request: Vec<Arc<TypeDescriptor>>,
    mut reply: Vec<Arc<TypeDescriptor>>,
) -> HpiCall {
    reply.insert(0, sa_error());
    HpiCall {
        id,
        name,
        request,
        reply,
    }
}

fn build_table() -> Vec<HpiCall> {
    let session = u32_param;
    let resource = u32_param;
    let sensor_num = || primitive(PrimitiveKind::U8);

    vec![
        call(SESSION_OPEN, "saHpiSessionOpen", vec![u32_param()], vec![session()]),
        call(SESSION_CLOSE, "saHpiSessionClose", vec![session()], vec![]),
        call(DISCOVER, "saHpiDiscover", vec![session()], vec![]),
        call(
            DOMAIN_TAG_SET,
            "saHpiDomainTagSet",
            vec![session(), TextBuffer::type_descriptor()],
            vec![],
        ),
        call(
            RESOURCE_TAG_SET,
            "saHpiResourceTagSet",
            vec![session(), resource(), TextBuffer::type_descriptor()],
            vec![],
        ),
        call(RESOURCE_ID_GET, "saHpiResourceIdGet", vec![session()], vec![resource()]),
        call(
            GET_ID_BY_ENTITY_PATH,
            "saHpiGetIdByEntityPath",
            // session, path, rdr type, instance id
            vec![session(), EntityPath::type_descriptor(), u32_param(), u32_param()],
            // instance id, resource, instrument id, rpt update count
            vec![u32_param(), resource(), u32_param(), u32_param()],
        ),
        call(
            SENSOR_READING_GET,
            "saHpiSensorReadingGet",
            vec![session(), resource(), sensor_num()],
            vec![
                SensorReading::type_descriptor(),
                primitive(PrimitiveKind::U16),
            ],
        ),
        call(
            SENSOR_THRESHOLDS_GET,
            "saHpiSensorThresholdsGet",
            vec![session(), resource(), sensor_num()],
            vec![SensorThresholds::type_descriptor()],
        ),
        call(
            SENSOR_THRESHOLDS_SET,
            "saHpiSensorThresholdsSet",
            vec![
                session(),
                resource(),
                sensor_num(),
                SensorThresholds::type_descriptor(),
            ],
            vec![],
        ),
        call(
            HANDLER_CREATE,
            "oHpiHandlerCreate",
            vec![HandlerConfig::type_descriptor()],
            vec![u32_param()],
        ),
        call(HANDLER_DESTROY, "oHpiHandlerDestroy", vec![u32_param()], vec![]),
        call(
            MY_ENTITY_PATH_GET,
            "saHpiMyEntityPathGet",
            vec![session()],
            vec![EntityPath::type_descriptor()],
        ),
    ]
}

static CALLS: OnceLock<Vec<HpiCall>> = OnceLock::new();

/// All known calls, in id order.
pub fn calls() -> &'static [HpiCall] {
    CALLS.get_or_init(|| {
        let table = build_table();
        log::debug!("[call] initialized call table with {} entries", table.len());
        table
    })
}

/// Look up a call by its 1-based wire id.
pub fn find_call(id: u32) -> Option<&'static HpiCall> {
    calls().iter().find(|c| c.id == id)
}
