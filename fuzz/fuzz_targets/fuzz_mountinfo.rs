//! Fuzz target for mount table parsing.
//!
//! Tests that `find_hierarchy_mount_in` handles arbitrary input without
//! panicking: malformed tables must surface as errors, never crashes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rq_core::probe::{find_hierarchy_mount_in, Subsystem};

fuzz_target!(|data: &str| {
    let _ = find_hierarchy_mount_in(data, "fuzz", Subsystem::Memory);
    let _ = find_hierarchy_mount_in(data, "fuzz", Subsystem::Cpu);
});
