// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `SaHpiTextBufferT`: a capped string in a fixed 255-byte slot.

use super::hpi_u32_newtype;
use crate::Marshal;

pub const MAX_TEXT_BUFFER_LENGTH: usize = 255;

/// `SaHpiTextTypeT` as of HPI B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Marshal)]
#[hpi(repr = u32)]
pub enum TextType {
    Binary = 0,
    BcdPlus = 1,
    Ascii6 = 2,
    /// UCS-2 in `language`.
    Unicode = 3,
    /// 8-bit ASCII or ISO 8859 in `language`.
    Text = 4,
}

/// `SaHpiLanguageT`. Open set, so unknown codes from a peer are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Language(pub u32);

impl Language {
    pub const UNDEF: Self = Self(0);
    pub const ENGLISH: Self = Self(25);
    pub const FRENCH: Self = Self(34);
    pub const GERMAN: Self = Self(22);
    pub const SANGRO: Self = Self(99);
    pub const TAJIK: Self = Self(116);
    pub const TSONGA: Self = Self(124);
    pub const ZULU: Self = Self(136);
}

hpi_u32_newtype!(Language);

#[derive(Debug, Clone, Marshal)]
pub struct TextBuffer {
    pub data_type: TextType,
    pub language: Language,
    /// Bytes of `data` in use.
    pub data_length: u8,
    pub data: [u8; MAX_TEXT_BUFFER_LENGTH],
}

impl TextBuffer {
    /// Copy `bytes` in, truncating to the slot size.
    pub fn new(data_type: TextType, language: Language, bytes: &[u8]) -> Self {
        let len = bytes.len().min(MAX_TEXT_BUFFER_LENGTH);
        let mut data = [0u8; MAX_TEXT_BUFFER_LENGTH];
        data[..len].copy_from_slice(&bytes[..len]);
        Self {
            data_type,
            language,
            data_length: len as u8,
            data,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(TextType::Text, Language::ENGLISH, text.as_bytes())
    }

    /// The used part of the buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..usize::from(self.data_length).min(MAX_TEXT_BUFFER_LENGTH)]
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(TextType::Binary, Language::UNDEF, &[])
    }
}

/// Bytes past `data_length` are not significant.
impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.data_type == other.data_type
            && self.language == other.language
            && self.data_length == other.data_length
            && self.as_bytes() == other.as_bytes()
    }
}
