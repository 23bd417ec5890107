//! Cgroup v1 subsystem discovery and limit-file parsing.
//!
//! Composes the absolute directory of each subsystem this probe consults
//! (hierarchy mount point + per-process membership path) and reads the
//! limit files inside it:
//! - `memory.limit_in_bytes` - byte count with optional k/m/g suffix
//! - `cpu.cfs_quota_us` / `cpu.cfs_period_us` - CFS scheduler quota

use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{debug, warn};

use super::{membership, mountinfo};

const MEM_LIMIT_FILENAME: &str = "/memory.limit_in_bytes";
const CFS_QUOTA_FILENAME: &str = "/cpu.cfs_quota_us";
const CFS_PERIOD_FILENAME: &str = "/cpu.cfs_period_us";

/// Cgroup v1 subsystems consulted for process quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    /// Physical memory accounting and limits.
    Memory,
    /// CPU bandwidth via the CFS quota/period pair.
    Cpu,
}

impl Subsystem {
    /// Controller token as it appears in mount super-options and
    /// membership subsystem lists.
    pub fn token(self) -> &'static str {
        match self {
            Subsystem::Memory => "memory",
            Subsystem::Cpu => "cpu",
        }
    }

    pub(crate) fn matches(self, token: &str) -> bool {
        token == self.token()
    }
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Absolute cgroup directories for the subsystems this probe consults.
///
/// Built fresh for each top-level query and dropped with it; paths are
/// reused for every limit read within the query but never cached across
/// queries. An absent path means the subsystem was undiscoverable, from
/// plain absence or from a malformed system table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CgroupMounts {
    /// Directory holding the memory subsystem's limit files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_path: Option<String>,

    /// Directory holding the cpu subsystem's limit files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_path: Option<String>,
}

impl CgroupMounts {
    /// Resolve both subsystem directories for the current process.
    pub fn discover() -> Self {
        CgroupMounts {
            memory_path: resolve_subsystem_path(Subsystem::Memory),
            cpu_path: resolve_subsystem_path(Subsystem::Cpu),
        }
    }

    /// Memory limit in bytes from `memory.limit_in_bytes`, if the
    /// subsystem was discovered and the file parses.
    pub fn memory_limit_bytes(&self) -> Option<u64> {
        let dir = self.memory_path.as_deref()?;
        read_memory_limit(dir)
    }

    /// Whole-core CPU quota from the CFS quota/period pair, if the
    /// subsystem was discovered and a quota is configured.
    pub fn cpu_limit_cores(&self) -> Option<u32> {
        let dir = self.cpu_path.as_deref()?;
        read_cpu_limit(dir)
    }
}

/// Compose the absolute directory for one subsystem.
///
/// Mount point and membership path are concatenated verbatim: the mount
/// point carries no trailing separator and the membership path always
/// starts with one. A malformed system table folds to absence here, after
/// a warning; discovery must never fail the calling process.
fn resolve_subsystem_path(subsystem: Subsystem) -> Option<String> {
    let mount = mountinfo::find_hierarchy_mount(subsystem)
        .unwrap_or_else(|err| {
            warn!(%subsystem, %err, "mount table scan aborted");
            None
        })?;
    let relative = membership::find_cgroup_relative_path(subsystem)
        .unwrap_or_else(|err| {
            warn!(%subsystem, %err, "membership table scan aborted");
            None
        })?;

    let path = format!("{mount}{relative}");
    debug!(%subsystem, path, "subsystem directory resolved");
    Some(path)
}

/// Read the memory limit file under a resolved subsystem directory.
pub fn read_memory_limit(subsystem_dir: &str) -> Option<u64> {
    let path = format!("{subsystem_dir}{MEM_LIMIT_FILENAME}");
    let content = fs::read_to_string(path).ok()?;
    parse_memory_value(content.lines().next()?)
}

/// Parse a memory limit literal: a leading unsigned integer with an
/// optional single-character k/K/m/M/g/G binary suffix.
///
/// The integer follows C literal conventions for base detection (`0x`
/// hex, leading `0` octal, base 10 otherwise). Characters after the
/// suffix position are ignored, as is an unrecognized suffix character.
/// Returns `None` when no digits are present or when applying the suffix
/// multiplier overflows `u64`.
pub fn parse_memory_value(line: &str) -> Option<u64> {
    let (value, rest) = parse_leading_u64(line.trim_start())?;
    let multiplier = rest.chars().next().map_or(1, suffix_multiplier);
    value.checked_mul(multiplier)
}

/// Binary multiplier for a unit suffix character; 1 for anything else.
fn suffix_multiplier(suffix: char) -> u64 {
    match suffix {
        'k' | 'K' => 1 << 10,
        'm' | 'M' => 1 << 20,
        'g' | 'G' => 1 << 30,
        _ => 1,
    }
}

/// Parse a leading unsigned integer with C-style base detection,
/// returning the value and the unconsumed remainder.
fn parse_leading_u64(s: &str) -> Option<(u64, &str)> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if let Some(parsed) = take_digits(hex, 16) {
            return Some(parsed);
        }
        // "0x" followed by no hex digit parses as a bare zero with the
        // "x" left unconsumed.
        return Some((0, &s[1..]));
    }
    if let Some(octal) = s.strip_prefix('0') {
        return Some(take_digits(octal, 8).unwrap_or((0, octal)));
    }
    take_digits(s, 10)
}

/// Consume leading digits of `radix`; `None` when the first character is
/// not a digit or the digits overflow `u64`.
fn take_digits(s: &str, radix: u32) -> Option<(u64, &str)> {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(s.len(), |(idx, _)| idx);
    if end == 0 {
        return None;
    }
    let value = u64::from_str_radix(&s[..end], radix).ok()?;
    Some((value, &s[end..]))
}

/// Read the CFS quota files under a resolved subsystem directory and
/// derive a whole-core count.
///
/// A quota or period that is missing, non-positive, or unparseable means
/// no numeric limit is configured. A quota of at most one period grants
/// one core: a process cannot be granted less than one full
/// core-equivalent in this model. Larger quotas divide by the period,
/// truncating, saturating at `u32::MAX`.
pub fn read_cpu_limit(subsystem_dir: &str) -> Option<u32> {
    let quota = read_cpu_value(subsystem_dir, CFS_QUOTA_FILENAME)?;
    if quota <= 0 {
        return None;
    }
    let period = read_cpu_value(subsystem_dir, CFS_PERIOD_FILENAME)?;
    if period <= 0 {
        return None;
    }

    if quota <= period {
        return Some(1);
    }
    Some(u32::try_from(quota / period).unwrap_or(u32::MAX))
}

fn read_cpu_value(subsystem_dir: &str, filename: &str) -> Option<i64> {
    let path = format!("{subsystem_dir}{filename}");
    let content = fs::read_to_string(path).ok()?;
    Some(parse_leading_i64(content.lines().next()?))
}

/// Tolerant leading-integer parse: optional sign, digits up to the first
/// non-digit, 0 when no digits are present. Trailing content is not an
/// error.
fn parse_leading_i64(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(idx, _)| idx);
    let magnitude: i64 = digits[..end].parse().unwrap_or(0);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
