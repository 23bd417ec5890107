//! Runtime Quota - process resource quota inspector
//!
//! Runs the discovery probes against the current process and prints
//! what the operating system actually granted it: the effective memory
//! bound, the cgroup CPU quota, and the resolved subsystem paths.

use clap::{ArgAction, Parser, Subcommand};
use rq_common::{OutputFormat, Result};
use rq_core::logging::init_logging;
use rq_core::probe::{collect_quota_report, CgroupMounts, QuotaReport};

/// Discover the resource quotas granted to this process
#[derive(Parser)]
#[command(name = "rq-core")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json", env = "RQ_FORMAT")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every limit source and print the combined report
    Limits,
    /// Print the resolved cgroup subsystem directories
    Paths,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("rq-core: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match cli.command {
        Commands::Limits => {
            let report = collect_quota_report();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Summary => println!("{}", summarize(&report)),
            }
        }
        Commands::Paths => {
            let mounts = CgroupMounts::discover();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&mounts)?),
                OutputFormat::Summary => {
                    println!(
                        "memory: {}  cpu: {}",
                        mounts.memory_path.as_deref().unwrap_or("-"),
                        mounts.cpu_path.as_deref().unwrap_or("-"),
                    );
                }
            }
        }
    }
    Ok(())
}

fn summarize(report: &QuotaReport) -> String {
    let memory = match report.memory_limit_bytes {
        0 => "unrestricted".to_string(),
        bytes => format_bytes(bytes),
    };
    let cpu = match report.cpu_limit_cores {
        Some(cores) => format!("{cores} cores"),
        None => "no quota".to_string(),
    };
    let working_set = match report.working_set_bytes {
        Some(bytes) => format_bytes(bytes),
        None => "unknown".to_string(),
    };
    format!("memory {memory} | cpu {cpu} | working set {working_set}")
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bytes_format_picks_binary_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(4096), "4.0 KiB");
        assert_eq!(format_bytes(536_870_912), "512.0 MiB");
        assert_eq!(format_bytes(1_073_741_824), "1.0 GiB");
    }

    #[test]
    fn summary_spells_out_absent_limits() {
        let report = QuotaReport {
            memory_limit_bytes: 0,
            cpu_limit_cores: None,
            working_set_bytes: Some(8 * 1024 * 1024),
            cgroup: Default::default(),
        };
        let line = summarize(&report);
        assert!(line.contains("memory unrestricted"));
        assert!(line.contains("cpu no quota"));
        assert!(line.contains("8.0 MiB"));
    }

    #[test]
    fn summary_reports_discovered_limits() {
        let report = QuotaReport {
            memory_limit_bytes: 536_870_912,
            cpu_limit_cores: Some(2),
            working_set_bytes: None,
            cgroup: Default::default(),
        };
        let line = summarize(&report);
        assert!(line.contains("512.0 MiB"));
        assert!(line.contains("2 cores"));
        assert!(line.contains("working set unknown"));
    }
}
