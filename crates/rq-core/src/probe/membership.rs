//! Parser for /proc/self/cgroup.
//!
//! Locates the process's membership path within a cgroup v1 hierarchy.
//! Each line is `hierarchy-id:subsystem-list:relative-path`, with the
//! subsystem list comma-separated (see cgroups(7)).

use rq_common::{Error, Result};
use std::fs;
use tracing::trace;

use super::cgroup::Subsystem;

const PROC_CGROUP: &str = "/proc/self/cgroup";

/// Find this process's path relative to the `subsystem` hierarchy mount.
///
/// Returns `Ok(None)` when the membership table is unreadable or no line
/// lists the subsystem. Lines that are not exactly three colon-delimited
/// fields abort the scan with [`Error::MalformedLine`].
pub fn find_cgroup_relative_path(subsystem: Subsystem) -> Result<Option<String>> {
    let content = match fs::read_to_string(PROC_CGROUP) {
        Ok(content) => content,
        Err(_) => return Ok(None),
    };
    find_cgroup_relative_path_in(&content, PROC_CGROUP, subsystem)
}

/// Scan membership table content for a subsystem entry.
///
/// Separated from [`find_cgroup_relative_path`] for testing with fixture
/// data; `source` only labels errors.
pub fn find_cgroup_relative_path_in(
    content: &str,
    source: &str,
    subsystem: Subsystem,
) -> Result<Option<String>> {
    for (idx, line) in content.lines().enumerate() {
        let mut fields = line.splitn(3, ':');
        let (Some(_hierarchy_id), Some(subsystem_list), Some(relative_path)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(Error::malformed(source, idx + 1));
        };

        if subsystem_list
            .split(',')
            .any(|token| subsystem.matches(token))
        {
            trace!(%subsystem, relative_path, "cgroup membership resolved");
            return Ok(Some(relative_path.to_string()));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_path_for_each_listed_subsystem() {
        let content = "4:memory,cpu:/docker/abc123\n";
        for subsystem in [Subsystem::Memory, Subsystem::Cpu] {
            let path = find_cgroup_relative_path_in(content, "fixture", subsystem).unwrap();
            assert_eq!(path.as_deref(), Some("/docker/abc123"));
        }
    }

    #[test]
    fn scans_past_non_matching_hierarchies() {
        let content = "\
12:pids:/user.slice
11:memory:/user.slice/user-1000.slice
10:cpu,cpuacct:/user.slice
";
        let path = find_cgroup_relative_path_in(content, "fixture", Subsystem::Memory).unwrap();
        assert_eq!(path.as_deref(), Some("/user.slice/user-1000.slice"));
    }

    #[test]
    fn unified_hierarchy_line_does_not_match() {
        // The v2 entry has an empty subsystem list; it is well-formed but
        // never satisfies a v1 subsystem lookup.
        let content = "0::/init.scope\n";
        let path = find_cgroup_relative_path_in(content, "fixture", Subsystem::Cpu).unwrap();
        assert_eq!(path, None);
    }

    #[test]
    fn wrong_field_count_aborts_scan() {
        let content = "\
4:memory
3:cpu:/docker/abc123
";
        let err =
            find_cgroup_relative_path_in(content, "fixture", Subsystem::Cpu).unwrap_err();
        assert_eq!(err.to_string(), "malformed line 1 in fixture");
    }

    #[test]
    fn exhausted_table_resolves_to_none() {
        let content = "12:pids:/user.slice\n";
        assert_eq!(
            find_cgroup_relative_path_in(content, "fixture", Subsystem::Memory).unwrap(),
            None
        );
    }
}
