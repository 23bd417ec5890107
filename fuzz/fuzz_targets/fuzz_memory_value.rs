//! Fuzz target for memory limit literal parsing.
//!
//! Tests that `parse_memory_value` handles arbitrary input without
//! panicking or wrapping on overflow.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rq_core::probe::parse_memory_value;

fuzz_target!(|data: &str| {
    let _ = parse_memory_value(data);
});
