//! fftbench: transform throughput comparison
//!
//! Usage:
//!   fftbench                        - Full sweep, 1-D then 2-D
//!   fftbench <iterations> <N>       - 1-D complex and real round trip at N
//!   fftbench <iterations> <Nx> <Ny> - 2-D complex at Nx by Ny
//!
//! Rows go to stdout; logs (`RUST_LOG`) and diagnostics go to stderr.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use fb_bench::{SweepConfig, SweepDriver, SweepMode};

const USAGE: &str = "Usage: fftbench [iterations] [Nx] [Ny]";

#[derive(Parser, Debug)]
#[command(name = "fftbench", version, about = "Compare RustFFT and PhastFT throughput")]
struct Cli {
    /// Transform executions per benchmark
    iterations: Option<u64>,

    /// 1-D length, or 2-D row length
    #[arg(value_parser = clap::value_parser!(u32).range(2..))]
    nx: Option<u32>,

    /// 2-D row count
    #[arg(value_parser = clap::value_parser!(u32).range(2..))]
    ny: Option<u32>,
}

impl Cli {
    /// `None` for the one-argument form, which names no complete configuration
    fn mode(&self) -> Option<SweepMode> {
        match (self.iterations, self.nx, self.ny) {
            (None, None, None) => Some(SweepMode::Full),
            (Some(iterations), Some(n), None) => Some(SweepMode::Single1d {
                iterations,
                n: n as usize,
            }),
            (Some(iterations), Some(nx), Some(ny)) => Some(SweepMode::Single2d {
                iterations,
                nx: nx as usize,
                ny: ny as usize,
            }),
            _ => None,
        }
    }
}

fn usage_exit() -> ! {
    eprintln!("{USAGE}");
    std::process::exit(1)
}

fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            ErrorKind::InvalidValue | ErrorKind::ValueValidation => {
                eprintln!("error: {}", e.kind().as_str().unwrap_or("invalid argument"));
                if let Some(value) = e.get(clap::error::ContextKind::InvalidValue) {
                    eprintln!("  invalid value: {value}");
                }
                usage_exit()
            }
            _ => usage_exit(),
        },
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = parse_args();
    let Some(mode) = cli.mode() else {
        usage_exit()
    };

    log::info!("fftbench {}: {mode:?}", env!("CARGO_PKG_VERSION"));

    let stdout = io::stdout().lock();
    let mut driver = SweepDriver::new(SweepConfig::default(), stdout);
    driver
        .run(mode)
        .with_context(|| format!("benchmark run failed ({mode:?})"))?;

    log::info!("Done");
    Ok(())
}
