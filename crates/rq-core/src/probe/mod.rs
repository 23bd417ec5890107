//! Quota discovery probes for the current process.
//!
//! This module locates the limits the operating system imposes on the
//! running process and combines them into effective quotas:
//! - Mount table scanning to find cgroup v1 subsystem hierarchies
//! - Membership lookup in the per-process cgroup table
//! - Limit-file parsing (memory byte counts, CFS quota/period)
//! - Aggregation with rlimit and physical-memory bounds
//!
//! Every public entry point re-runs discovery from the system files; no
//! path or value is cached between calls. The files consulted rarely
//! change during a process lifetime, so repeated scans trade a little
//! I/O for having no shared mutable state.
//!
//! # Data Sources
//! - `/proc/self/mountinfo` - subsystem hierarchy mount points
//! - `/proc/self/cgroup` - cgroup membership
//! - `/sys/fs/cgroup/<controller>/...` - cgroup v1 limit files
//! - `/proc/self/statm` - resident set size
//! - `getrlimit(2)` / `sysconf(3)` - process and machine bounds

pub mod cgroup;
pub mod limits;
pub mod membership;
pub mod mountinfo;

pub use cgroup::{parse_memory_value, read_cpu_limit, read_memory_limit, CgroupMounts, Subsystem};
pub use limits::{
    collect_quota_report, cpu_limit, restricted_physical_memory_limit, working_set_size,
    QuotaReport,
};
pub use membership::{find_cgroup_relative_path, find_cgroup_relative_path_in};
pub use mountinfo::{find_hierarchy_mount, find_hierarchy_mount_in};
