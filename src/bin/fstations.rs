use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;

use stations_rs::common::io::read_file;
use stations_rs::common::{io_error_msg, raise_priority, reset_sigpipe};
use stations_rs::report::{Separator, render};
use stations_rs::scan::{ScanOptions, aggregate};

#[derive(Parser)]
#[command(
    name = "fstations",
    about = "Per-station min/mean/max summary of a measurements file"
)]
struct Cli {
    /// Measurements file: one `station;value` record per line
    file: PathBuf,

    /// Print timing and memory telemetry after the summary
    #[arg(long)]
    debug: bool,

    /// Separate output entries with ",\n" instead of ", "
    #[arg(short = 'n', long = "newline")]
    newline: bool,
}

fn main() {
    reset_sigpipe();
    // Best-effort: a failed renice is ignored, the scan just runs at
    // normal priority.
    raise_priority();

    let cli = Cli::parse();
    let started = Instant::now();

    let data = match read_file(&cli.file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!(
                "fstations: {}: {}",
                cli.file.display(),
                io_error_msg(&e)
            );
            process::exit(1);
        }
    };

    let outcome = match aggregate(&data, &ScanOptions::default()) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("fstations: {}: {}", cli.file.display(), e);
            process::exit(1);
        }
    };
    let elapsed = started.elapsed();

    let sep = if cli.newline {
        Separator::CommaNewline
    } else {
        Separator::CommaSpace
    };
    println!("{}", render(&outcome.table, sep));

    if cli.debug {
        println!();
        println!(
            "Finished: {:.3} sec; peak: {:.3} MB; records: {}; stations: {}",
            elapsed.as_secs_f64(),
            peak_rss_mb().unwrap_or(0.0),
            outcome.records,
            outcome.table.len()
        );
    }
}

/// Peak resident set size in MB via getrusage.
/// ru_maxrss is kilobytes on Linux, bytes on macOS.
#[cfg(unix)]
fn peak_rss_mb() -> Option<f64> {
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    if unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) } != 0 {
        return None;
    }
    #[cfg(target_os = "macos")]
    let bytes = usage.ru_maxrss as f64;
    #[cfg(not(target_os = "macos"))]
    let bytes = usage.ru_maxrss as f64 * 1024.0;
    Some(bytes / (1024.0 * 1024.0))
}

#[cfg(not(unix))]
fn peak_rss_mb() -> Option<f64> {
    None
}
