//! Parser for /proc/self/mountinfo.
//!
//! Locates the filesystem mount point of a cgroup v1 subsystem
//! hierarchy. Each mountinfo line has the form
//!
//! ```text
//! <id> <parent> <major:minor> <root> <mount-point> <options>... - <fs-type> <source> <super-options>
//! ```
//!
//! where ` - ` separates the generic fields from the filesystem-specific
//! ones (see proc(5)). A subsystem hierarchy is a line whose fs-type is
//! `cgroup` and whose super-options contain the subsystem name.

use rq_common::{Error, Result};
use std::fs;
use tracing::trace;

use super::cgroup::Subsystem;

const PROC_MOUNTINFO: &str = "/proc/self/mountinfo";

/// Find the mount point of the hierarchy containing `subsystem`.
///
/// Returns `Ok(None)` when the mount table is unreadable or no hierarchy
/// mounts the subsystem. A line that does not parse as documented aborts
/// the whole scan with [`Error::MalformedLine`]: a mount table this
/// process cannot read reliably is not a safe source for limits.
pub fn find_hierarchy_mount(subsystem: Subsystem) -> Result<Option<String>> {
    let content = match fs::read_to_string(PROC_MOUNTINFO) {
        Ok(content) => content,
        Err(_) => return Ok(None),
    };
    find_hierarchy_mount_in(&content, PROC_MOUNTINFO, subsystem)
}

/// Scan mount table content for a subsystem hierarchy.
///
/// Separated from [`find_hierarchy_mount`] for testing with fixture
/// data; `source` only labels errors. First matching line wins.
pub fn find_hierarchy_mount_in(
    content: &str,
    source: &str,
    subsystem: Subsystem,
) -> Result<Option<String>> {
    for (idx, line) in content.lines().enumerate() {
        let (generic, fs_specific) = line
            .split_once(" - ")
            .ok_or_else(|| Error::malformed(source, idx + 1))?;

        // Optional fields may appear between the options and the
        // separator, so the generic half is a minimum, not an exact count.
        let generic_fields: Vec<&str> = generic.split_whitespace().collect();
        if generic_fields.len() < 6 {
            return Err(Error::malformed(source, idx + 1));
        }
        let fs_fields: Vec<&str> = fs_specific.split_whitespace().collect();
        if fs_fields.len() < 3 {
            return Err(Error::malformed(source, idx + 1));
        }

        if fs_fields[0] != "cgroup" {
            continue;
        }

        let mount_point = generic_fields[4];
        let super_options = fs_fields[2];
        if super_options.split(',').any(|token| subsystem.matches(token)) {
            trace!(%subsystem, mount_point, "hierarchy mount resolved");
            return Ok(Some(mount_point.to_string()));
        }
    }

    Ok(None)
}
