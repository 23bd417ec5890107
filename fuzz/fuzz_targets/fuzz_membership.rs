//! Fuzz target for cgroup membership table parsing.
//!
//! Tests that `find_cgroup_relative_path_in` handles arbitrary input
//! without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rq_core::probe::{find_cgroup_relative_path_in, Subsystem};

fuzz_target!(|data: &str| {
    let _ = find_cgroup_relative_path_in(data, "fuzz", Subsystem::Memory);
    let _ = find_cgroup_relative_path_in(data, "fuzz", Subsystem::Cpu);
});
