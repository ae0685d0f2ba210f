// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hpi_marshal::call::find_call;
use hpi_marshal::decode_frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Frame, then whatever call the header names
    let Ok((header, body, order)) = decode_frame(data) else {
        return;
    };
    if let Some(call) = find_call(header.id) {
        if header.is_reply() {
            let _ = call.demarshal_reply(order, body);
        } else {
            let _ = call.demarshal_request(order, body);
        }
    }
});
