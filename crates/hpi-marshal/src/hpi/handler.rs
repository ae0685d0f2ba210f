// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OpenHPI plugin handler configuration (`oHpiHandlerConfigT`).

use super::text::MAX_TEXT_BUFFER_LENGTH;
use crate::Marshal;

pub type HandlerId = u32;

/// One `name = value` pair, each a NUL padded 255-byte slot.
#[derive(Debug, Clone, PartialEq, Eq, Marshal)]
pub struct HandlerConfigParam {
    pub name: [u8; MAX_TEXT_BUFFER_LENGTH],
    pub value: [u8; MAX_TEXT_BUFFER_LENGTH],
}

impl HandlerConfigParam {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: padded(name.as_bytes()),
            value: padded(value.as_bytes()),
        }
    }

    pub fn name(&self) -> &[u8] {
        until_nul(&self.name)
    }

    pub fn value(&self) -> &[u8] {
        until_nul(&self.value)
    }
}

fn padded(bytes: &[u8]) -> [u8; MAX_TEXT_BUFFER_LENGTH] {
    let mut slot = [0u8; MAX_TEXT_BUFFER_LENGTH];
    // keep a terminating NUL
    let len = bytes.len().min(MAX_TEXT_BUFFER_LENGTH - 1);
    slot[..len].copy_from_slice(&bytes[..len]);
    slot
}

fn until_nul(slot: &[u8]) -> &[u8] {
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    &slot[..end]
}

/// Parameters for creating a plugin handler; a variable array sized by
/// `number_of_params`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Marshal)]
pub struct HandlerConfig {
    pub number_of_params: u8,
    #[hpi(count = "number_of_params")]
    pub params: Vec<HandlerConfigParam>,
}

impl HandlerConfig {
    /// At most 255 parameters fit the one-byte count; the rest are dropped.
    pub fn new(mut params: Vec<HandlerConfigParam>) -> Self {
        params.truncate(usize::from(u8::MAX));
        Self {
            number_of_params: params.len() as u8,
            params,
        }
    }

    /// Value of the first parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.params
            .iter()
            .find(|p| p.name() == name.as_bytes())
            .map(HandlerConfigParam::value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HpiType;

    #[test]
    fn test_param_slots_are_nul_padded() {
        let p = HandlerConfigParam::new("plugin", "libsimulator");
        assert_eq!(p.name(), b"plugin");
        assert_eq!(p.value(), b"libsimulator");
        assert_eq!(p.name[6], 0);
    }

    #[test]
    fn test_config_lookup() {
        let config = HandlerConfig::new(vec![
            HandlerConfigParam::new("plugin", "libdummy"),
            HandlerConfigParam::new("entity_root", "{SYSTEM_CHASSIS,1}"),
        ]);
        assert_eq!(config.number_of_params, 2);
        assert_eq!(config.get("entity_root"), Some(&b"{SYSTEM_CHASSIS,1}"[..]));
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn test_config_size_depends_on_count() {
        let desc = HandlerConfig::type_descriptor();
        assert_eq!(desc.wire_size(), None);
        assert_eq!(desc.min_wire_size(), 1);
    }
}
