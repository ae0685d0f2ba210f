// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Marshaling constants and runtime configuration.
//!
//! - **Static**: protocol constants shared with OpenHPI peers.
//! - **Dynamic**: [`MarshalConfig`], the limits applied when decoding
//!   untrusted buffers, optionally loaded from YAML (`config-loader` feature).
//!
//! # Example YAML
//!
//! ```yaml
//! byte_order: big
//! max_array_len: 256
//! max_message_len: 65535
//! ```

use crate::ser::ByteOrder;

/// Protocol version carried in the high nibble of the message flags.
pub const PROTOCOL_VERSION: u8 = 1;

/// Size of the message header on the wire.
pub const HEADER_LEN: usize = 12;

/// Largest message body accepted or produced.
pub const MAX_MESSAGE_LEN: usize = 0xffff;

/// Default ceiling on decoded variable array lengths.
///
/// Count fields are at most 32 bits wide, so without a ceiling a 4-byte
/// input could ask for billions of elements.
pub const DEFAULT_MAX_ARRAY_LEN: usize = 0xffff;

/// Runtime marshaling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarshalConfig {
    /// Order used when encoding.
    pub byte_order: ByteOrder,
    /// Upper bound for any decoded variable array.
    pub max_array_len: usize,
    /// Upper bound for a message body.
    pub max_message_len: usize,
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::native(),
            max_array_len: DEFAULT_MAX_ARRAY_LEN,
            max_message_len: MAX_MESSAGE_LEN,
        }
    }
}

impl MarshalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    pub fn with_max_array_len(mut self, max: usize) -> Self {
        self.max_array_len = max;
        self
    }

    pub fn with_max_message_len(mut self, max: usize) -> Self {
        self.max_message_len = max.min(MAX_MESSAGE_LEN);
        self
    }
}

#[cfg(feature = "config-loader")]
mod loader {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default, deny_unknown_fields)]
    struct YamlMarshalConfig {
        /// native, little or big
        byte_order: Option<String>,
        max_array_len: Option<usize>,
        max_message_len: Option<usize>,
    }

    impl MarshalConfig {
        /// Parse a YAML document; missing keys keep their defaults.
        pub fn from_yaml_str(yaml_content: &str) -> Result<Self, String> {
            let doc: YamlMarshalConfig = serde_yaml::from_str(yaml_content)
                .map_err(|e| format!("Failed to parse YAML: {}", e))?;

            let mut config = Self::default();
            if let Some(order) = doc.byte_order {
                config.byte_order = match order.to_ascii_lowercase().as_str() {
                    "native" => ByteOrder::native(),
                    "little" | "le" => ByteOrder::Little,
                    "big" | "be" | "network" => ByteOrder::Big,
                    other => return Err(format!("Invalid byte_order: {}", other)),
                };
            }
            if let Some(max) = doc.max_array_len {
                config.max_array_len = max;
            }
            if let Some(max) = doc.max_message_len {
                if max > MAX_MESSAGE_LEN {
                    return Err(format!(
                        "max_message_len {} exceeds protocol limit {}",
                        max, MAX_MESSAGE_LEN
                    ));
                }
                config.max_message_len = max;
            }
            Ok(config)
        }

        pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read YAML file: {}", e))?;
            Self::from_yaml_str(&content)
        }
    }
}
