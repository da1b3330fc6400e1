//! Fuzz target for the wire event decoders
//!
//! This fuzzer tests inbound and outbound envelope decoding with:
//! - Non-UTF-8 and non-JSON input
//! - Valid JSON with missing or mistyped envelope fields
//! - Unknown event names and payloads missing required fields
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use devconnect_proto::{ClientEvent, ServerEvent};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(frame) = std::str::from_utf8(data) {
        // Both directions share the envelope but not the event vocabulary;
        // decoding should only ever return Err for invalid frames.
        let _ = ServerEvent::decode(frame);
        let _ = ClientEvent::decode(frame);
    }
});
