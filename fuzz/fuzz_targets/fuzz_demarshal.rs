// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hpi_marshal::hpi::{EntityPath, HandlerConfig, SensorThresholds, TextBuffer};
use hpi_marshal::{demarshal_typed, ByteOrder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&flag, body)) = data.split_first() else {
        return;
    };
    let order = ByteOrder::from_flag(flag);

    let _ = demarshal_typed::<SensorThresholds>(order, body);
    let _ = demarshal_typed::<HandlerConfig>(order, body);
    let _ = demarshal_typed::<TextBuffer>(order, body);
    let _ = demarshal_typed::<EntityPath>(order, body);
});
