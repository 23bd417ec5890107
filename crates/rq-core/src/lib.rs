//! Runtime Quota Core Library
//!
//! This library discovers the resource limits granted to the current
//! process and folds them into a single effective quota per resource:
//! - cgroup v1 hierarchy resolution and limit-file parsing
//! - process resource limits (rlimit) and machine memory bounds
//! - working-set measurement from /proc
//!
//! The binary entry point is in `main.rs`.

pub mod logging;
pub mod probe;
