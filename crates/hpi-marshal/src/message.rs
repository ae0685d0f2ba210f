// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message envelope exchanged between HPI clients and the daemon.
//!
//! ```text
//! 0        1        2        3        4               8               12
//! +--------+--------+--------+--------+---------------+---------------+------
//! |  type  | flags  |  seq   | seq_in |      id       |      len      | body
//! +--------+--------+--------+--------+---------------+---------------+------
//! flags: bit 0 endian (1 = little), bit 1 reply, bit 2 error, bits 4-7 version
//! ```
//!
//! `id` and `len` are in the sender's byte order, as is the body. The
//! receiver gets that order back from [`decode_frame`] and passes it to
//! `demarshal`.

use crate::config::{MarshalConfig, HEADER_LEN, MAX_MESSAGE_LEN, PROTOCOL_VERSION};
use crate::error::{DecodeError, MarshalError};
use crate::ser::{ByteOrder, Cursor, SerError, VecWriter, WireWrite};
use std::fmt;

pub const FLAG_ENDIAN: u8 = 0x01;
pub const FLAG_REPLY: u8 = 0x02;
pub const FLAG_ERROR: u8 = 0x04;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    Ping = 1,
    Reset = 2,
    Msg = 3,
}

impl MessageType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Ping),
            2 => Some(Self::Reset),
            3 => Some(Self::Msg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub msg_type: MessageType,
    pub flags: u8,
    pub seq: u8,
    pub seq_in: u8,
    /// RPC call id for `Msg` frames.
    pub id: u32,
    /// Body length.
    pub len: u32,
}

impl MessageHeader {
    pub fn new(msg_type: MessageType, seq: u8, id: u32) -> Self {
        Self {
            msg_type,
            flags: 0,
            seq,
            seq_in: 0,
            id,
            len: 0,
        }
    }

    /// Header for the reply to `request`.
    pub fn reply_to(request: &MessageHeader) -> Self {
        Self {
            msg_type: request.msg_type,
            flags: FLAG_REPLY,
            seq: request.seq,
            seq_in: request.seq,
            id: request.id,
            len: 0,
        }
    }

    pub fn is_reply(&self) -> bool {
        self.flags & FLAG_REPLY != 0
    }

    pub fn is_error(&self) -> bool {
        self.flags & FLAG_ERROR != 0
    }

    pub fn version(&self) -> u8 {
        self.flags >> 4
    }

    /// Order of `id`, `len` and the body.
    pub fn byte_order(&self) -> ByteOrder {
        ByteOrder::from_flag(self.flags)
    }
}

#[derive(Debug)]
pub enum MessageError {
    /// Fewer bytes than a header.
    TooShort { len: usize },
    WrongVersion { found: u8 },
    UnknownType { found: u8 },
    /// Body length beyond the configured maximum.
    TooLarge { len: usize, limit: usize },
    /// Header announces more body than the frame holds.
    Truncated { declared: usize, available: usize },
    /// Pings carry sequence 0, every other message a nonzero one.
    InvalidSequence { msg_type: MessageType, seq: u8 },
    Marshal(MarshalError),
    Decode(DecodeError),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => write!(f, "Frame of {} bytes is shorter than a header", len),
            Self::WrongVersion { found } => write!(
                f,
                "Wrong header version {}, expected {}",
                found, PROTOCOL_VERSION
            ),
            Self::UnknownType { found } => write!(f, "Unknown message type {}", found),
            Self::TooLarge { len, limit } => {
                write!(f, "Message body of {} bytes exceeds limit {}", len, limit)
            }
            Self::Truncated {
                declared,
                available,
            } => write!(
                f,
                "Header declares {} body bytes, frame holds {}",
                declared, available
            ),
            Self::InvalidSequence { msg_type, seq } => {
                write!(f, "Invalid sequence {} for {:?} message", seq, msg_type)
            }
            Self::Marshal(e) => write!(f, "Marshal error: {}", e),
            Self::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl std::error::Error for MessageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Marshal(e) => Some(e),
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MarshalError> for MessageError {
    fn from(e: MarshalError) -> Self {
        Self::Marshal(e)
    }
}

impl From<DecodeError> for MessageError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<SerError> for MessageError {
    fn from(e: SerError) -> Self {
        Self::Decode(e.into())
    }
}

/// Build a frame around `body`, which must already be marshaled in `order`.
///
/// Stamps the protocol version and endian bit and sets `len` from the body.
pub fn encode_frame(
    order: ByteOrder,
    header: &MessageHeader,
    body: &[u8],
) -> Result<Vec<u8>, MessageError> {
    let ping = header.msg_type == MessageType::Ping;
    if ping != (header.seq == 0) {
        return Err(MessageError::InvalidSequence {
            msg_type: header.msg_type,
            seq: header.seq,
        });
    }

    let limit = MAX_MESSAGE_LEN - HEADER_LEN;
    if body.len() > limit {
        return Err(MessageError::TooLarge {
            len: body.len(),
            limit,
        });
    }

    let flags = (header.flags & 0x0e) | (PROTOCOL_VERSION << 4) | order.flag();

    let mut writer = VecWriter::with_capacity(order, HEADER_LEN + body.len());
    writer.write_u8(header.msg_type as u8).map_err(MarshalError::from)?;
    writer.write_u8(flags).map_err(MarshalError::from)?;
    writer.write_u8(header.seq).map_err(MarshalError::from)?;
    writer.write_u8(header.seq_in).map_err(MarshalError::from)?;
    writer.write_u32(header.id).map_err(MarshalError::from)?;
    writer
        .write_u32(body.len() as u32)
        .map_err(MarshalError::from)?;
    writer.write_bytes(body).map_err(MarshalError::from)?;
    Ok(writer.into_bytes())
}

/// Split a received frame into header, body and the sender's byte order.
pub fn decode_frame(frame: &[u8]) -> Result<(MessageHeader, &[u8], ByteOrder), MessageError> {
    decode_frame_with(&MarshalConfig::default(), frame)
}

/// [`decode_frame`] with an explicit body size limit.
pub fn decode_frame_with<'a>(
    config: &MarshalConfig,
    frame: &'a [u8],
) -> Result<(MessageHeader, &'a [u8], ByteOrder), MessageError> {
    if frame.len() < HEADER_LEN {
        log::warn!("[message] drop frame: header too small ({} bytes)", frame.len());
        return Err(MessageError::TooShort { len: frame.len() });
    }

    let flags = frame[1];
    let version = flags >> 4;
    if version != PROTOCOL_VERSION {
        log::warn!(
            "[message] drop frame: wrong header version {}, expect {}",
            version,
            PROTOCOL_VERSION
        );
        return Err(MessageError::WrongVersion { found: version });
    }

    let Some(msg_type) = MessageType::from_u8(frame[0]) else {
        log::warn!("[message] drop frame: wrong message type {}", frame[0]);
        return Err(MessageError::UnknownType { found: frame[0] });
    };

    let order = ByteOrder::from_flag(flags);
    let mut cursor = Cursor::new(&frame[4..HEADER_LEN], order);
    let id = cursor.read_u32()?;
    let len = cursor.read_u32()?;

    let limit = config.max_message_len.saturating_sub(HEADER_LEN);
    let body_len = len as usize;
    if body_len > limit {
        log::warn!("[message] drop frame: body too big ({} bytes)", body_len);
        return Err(MessageError::TooLarge {
            len: body_len,
            limit,
        });
    }

    let available = frame.len() - HEADER_LEN;
    if body_len > available {
        log::warn!(
            "[message] drop frame: body truncated ({} of {} bytes)",
            available,
            body_len
        );
        return Err(MessageError::Truncated {
            declared: body_len,
            available,
        });
    }

    if !order.is_native() {
        log::debug!("[message] frame from {:?}-endian peer, swapping", order);
    }

    let header = MessageHeader {
        msg_type,
        flags,
        seq: frame[2],
        seq_in: frame[3],
        id,
        len,
    };
    Ok((header, &frame[HEADER_LEN..HEADER_LEN + body_len], order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout_big_endian() {
        let header = MessageHeader::new(MessageType::Msg, 5, 36);
        let frame = encode_frame(ByteOrder::Big, &header, &[0xAA, 0xBB]).expect("encode");
        assert_eq!(
            frame,
            vec![3, 0x10, 5, 0, 0, 0, 0, 36, 0, 0, 0, 2, 0xAA, 0xBB]
        );
    }

    #[test]
    fn test_frame_roundtrip_little_endian() {
        let request = MessageHeader::new(MessageType::Msg, 9, 116);
        let reply = MessageHeader::reply_to(&request);
        let frame = encode_frame(ByteOrder::Little, &reply, &[1, 2, 3]).expect("encode");
        assert_eq!(frame[1], 0x10 | FLAG_REPLY | 1);

        let (header, body, order) = decode_frame(&frame).expect("decode");
        assert_eq!(order, ByteOrder::Little);
        assert_eq!(header.id, 116);
        assert_eq!(header.len, 3);
        assert_eq!(header.seq_in, 9);
        assert!(header.is_reply());
        assert!(!header.is_error());
        assert_eq!(header.version(), PROTOCOL_VERSION);
        assert_eq!(body, &[1, 2, 3]);
    }

    #[test]
    fn test_body_beyond_frame_ignored() {
        let header = MessageHeader::new(MessageType::Msg, 1, 2);
        let mut frame = encode_frame(ByteOrder::Big, &header, &[7]).expect("encode");
        frame.extend_from_slice(&[0xEE, 0xEE]);
        let (_, body, _) = decode_frame(&frame).expect("decode");
        assert_eq!(body, &[7]);
    }

    #[test]
    fn test_rejected_frames() {
        assert!(matches!(
            decode_frame(&[3, 0x10, 1]),
            Err(MessageError::TooShort { len: 3 })
        ));

        let mut frame = encode_frame(ByteOrder::Big, &MessageHeader::new(MessageType::Msg, 1, 2), &[])
            .expect("encode");
        frame[1] = 0x20;
        assert!(matches!(
            decode_frame(&frame),
            Err(MessageError::WrongVersion { found: 2 })
        ));

        frame[1] = 0x10;
        frame[0] = 9;
        assert!(matches!(
            decode_frame(&frame),
            Err(MessageError::UnknownType { found: 9 })
        ));

        frame[0] = 3;
        frame[8..12].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        assert!(matches!(decode_frame(&frame), Err(MessageError::TooLarge { .. })));

        frame[8..12].copy_from_slice(&4u32.to_be_bytes());
        assert!(matches!(
            decode_frame(&frame),
            Err(MessageError::Truncated {
                declared: 4,
                available: 0
            })
        ));
    }

    #[test]
    fn test_sequence_rules() {
        let ping = MessageHeader::new(MessageType::Ping, 0, 0);
        assert!(encode_frame(ByteOrder::native(), &ping, &[]).is_ok());

        let bad_ping = MessageHeader::new(MessageType::Ping, 3, 0);
        assert!(matches!(
            encode_frame(ByteOrder::native(), &bad_ping, &[]),
            Err(MessageError::InvalidSequence { seq: 3, .. })
        ));

        let bad_msg = MessageHeader::new(MessageType::Msg, 0, 1);
        assert!(encode_frame(ByteOrder::native(), &bad_msg, &[]).is_err());
    }

    #[test]
    fn test_oversized_body_rejected_on_encode() {
        let header = MessageHeader::new(MessageType::Msg, 1, 1);
        let body = vec![0u8; MAX_MESSAGE_LEN];
        assert!(matches!(
            encode_frame(ByteOrder::Big, &header, &body),
            Err(MessageError::TooLarge { .. })
        ));
    }
}
