//! Commonly used code.

use byte_unit::{Byte, UnitType};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod contig;
pub mod io;
pub mod tokenize;

/// Commonly used command line arguments.
#[derive(Parser, Debug, Default)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

/// Helper to print the current memory resident set size via `tracing`.
///
/// Silently does nothing on platforms without `/proc`.
pub fn trace_rss_now() {
    let Ok(me) = procfs::process::Process::myself() else {
        return;
    };
    let Ok(stat) = me.stat() else {
        return;
    };
    let page_size = procfs::page_size();
    if let Some(rss) = Byte::from_u128((stat.rss * page_size) as u128) {
        tracing::debug!("RSS now: {}", rss.get_appropriate_unit(UnitType::Binary));
    }
}

/// The version of `popfreq` package.
#[cfg(not(test))]
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// This allows us to override the version to `0.0.0` in tests.
pub fn version() -> &'static str {
    #[cfg(test)]
    return "0.0.0";
    #[cfg(not(test))]
    return VERSION;
}
