//! # fb-bench
//!
//! Throughput harness comparing the reference transform library against the
//! library under test.
//!
//! ## Pieces
//!
//! - **Clock**: monotonic seconds for bracketing the timed loop
//! - **Generators**: reproducible ChaCha8 workloads in [-0.5, 0.5)
//! - **Runner**: allocate, fill, plan, time, destroy
//! - **Metrics**: flop estimates and fixed-column report rows
//! - **Sweep**: the full size sweep or one explicit configuration
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Harness output, as printed by the CLI
//! cargo run --release -p fb-cli
//! cargo run --release -p fb-cli -- 1000 1024
//!
//! # Criterion view of single executions
//! cargo bench -p fb-bench
//! ```

pub mod clock;
pub mod generators;
pub mod metrics;
pub mod runner;
pub mod sweep;

pub use clock::*;
pub use generators::*;
pub use metrics::*;
pub use runner::*;
pub use sweep::*;
