//! Effective limit aggregation.
//!
//! Combines the cgroup limits with process-level (rlimit) and
//! machine-level (physical memory) bounds into the single effective
//! quota a managed runtime should size itself against.

use serde::Serialize;
use std::fs;
use tracing::debug;

use super::cgroup::CgroupMounts;

const PROC_STATM: &str = "/proc/self/statm";

/// Snapshot of every quota source this probe can discover, bundled with
/// the subsystem directories that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaReport {
    /// Effective physical memory bound in bytes; 0 means no restriction
    /// was discoverable from any source.
    pub memory_limit_bytes: u64,

    /// Whole-core CPU quota; absent when no cgroup quota is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_limit_cores: Option<u32>,

    /// Current resident set size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_set_bytes: Option<u64>,

    /// Resolved cgroup subsystem directories.
    pub cgroup: CgroupMounts,
}

/// Run every probe once and bundle the results.
///
/// Subsystem discovery happens once and is shared by all reads in the
/// report; a later call re-discovers from scratch.
pub fn collect_quota_report() -> QuotaReport {
    let mounts = CgroupMounts::discover();
    QuotaReport {
        memory_limit_bytes: restricted_memory_limit_with(&mounts),
        cpu_limit_cores: mounts.cpu_limit_cores(),
        working_set_bytes: working_set_size(),
        cgroup: mounts,
    }
}

/// Effective physical memory limit for the current process, in bytes.
///
/// Takes the minimum of the cgroup memory limit, the soft address-space
/// rlimit, and the machine's physical memory. Sources that are absent or
/// unbounded do not constrain the minimum. Returns 0 when no source
/// imposes a bound, rather than an enormous sentinel.
pub fn restricted_physical_memory_limit() -> u64 {
    restricted_memory_limit_with(&CgroupMounts::discover())
}

fn restricted_memory_limit_with(mounts: &CgroupMounts) -> u64 {
    let mut limit = mounts.memory_limit_bytes().unwrap_or(u64::MAX);
    limit = limit.min(address_space_rlimit().unwrap_or(u64::MAX));
    limit = limit.min(physical_memory_bytes().unwrap_or(u64::MAX));

    if limit == u64::MAX {
        debug!("no physical memory restriction discovered");
        return 0;
    }
    limit
}

/// Whole-core CPU quota from the cgroup cpu subsystem.
///
/// Absent when no quota is configured; unlike memory there is no
/// process- or machine-level floor to fall back on, so the caller picks
/// its own default (typically the visible core count).
pub fn cpu_limit() -> Option<u32> {
    CgroupMounts::discover().cpu_limit_cores()
}

/// Resident set size of the current process, in bytes.
///
/// Single-field scan of `/proc/self/statm` (second field, in pages); no
/// discovery involved.
pub fn working_set_size() -> Option<u64> {
    let content = fs::read_to_string(PROC_STATM).ok()?;
    let resident_pages: u64 = content.split_whitespace().nth(1)?.parse().ok()?;
    resident_pages.checked_mul(page_size()?)
}

/// Soft address-space rlimit; `None` when unbounded or unqueryable.
fn address_space_rlimit() -> Option<u64> {
    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    let rc = unsafe { libc::getrlimit(libc::RLIMIT_AS, &mut rlim) };
    if rc != 0 || rlim.rlim_cur == libc::RLIM_INFINITY {
        return None;
    }
    Some(rlim.rlim_cur as u64)
}

/// Total physical memory: page count times page size.
fn physical_memory_bytes() -> Option<u64> {
    let pages = unsafe { libc::sysconf(libc::_SC_PHYS_PAGES) };
    if pages < 0 {
        return None;
    }
    (pages as u64).checked_mul(page_size()?)
}

fn page_size() -> Option<u64> {
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGE_SIZE) };
    if page_size < 0 {
        return None;
    }
    Some(page_size as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restricted_limit_never_reports_the_unbounded_sentinel() {
        let limit = restricted_physical_memory_limit();
        assert_ne!(limit, u64::MAX);
    }

    #[test]
    fn restricted_limit_is_zero_or_within_physical_memory() {
        let limit = restricted_physical_memory_limit();
        if let Some(phys) = physical_memory_bytes() {
            assert!(limit <= phys, "limit {limit} exceeds physical {phys}");
        } else {
            // Without a physical memory reading the only guarantee is
            // the sentinel collapse.
            assert_ne!(limit, u64::MAX);
        }
    }

    #[test]
    fn repeated_queries_are_idempotent() {
        assert_eq!(
            restricted_physical_memory_limit(),
            restricted_physical_memory_limit()
        );
        assert_eq!(cpu_limit(), cpu_limit());
    }

    #[test]
    fn cpu_limit_is_at_least_one_core_when_present() {
        if let Some(cores) = cpu_limit() {
            assert!(cores >= 1);
        }
    }

    #[test]
    fn working_set_is_positive_on_linux() {
        if !std::path::Path::new(PROC_STATM).exists() {
            return;
        }
        let ws = working_set_size().expect("statm readable");
        assert!(ws > 0, "a running process has resident pages");
    }

    #[test]
    fn report_matches_individual_probes() {
        let report = collect_quota_report();
        assert_eq!(report.memory_limit_bytes, restricted_physical_memory_limit());
        assert_eq!(report.cpu_limit_cores, cpu_limit());
    }

    #[test]
    fn report_serializes_to_json() {
        let report = collect_quota_report();
        let json = serde_json::to_value(&report).expect("report serializes");
        assert!(json.get("memory_limit_bytes").is_some());
        assert!(json.get("cgroup").is_some());
    }
}
