//! Logging setup for the modscope binary.
//!
//! The library only emits `tracing` events; the binary decides where they
//! go. Logs are written to stderr so reports on stdout stay clean.
//!
//! # Example
//!
//! ```rust,no_run
//! use modscope::logger::init_logger;
//!
//! init_logger(false, false);
//! tracing::info!("starting analysis");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the filter for the given verbosity flags.
///
/// `verbose` wins over `quiet`; without either flag `RUST_LOG` is honoured,
/// falling back to `modscope=info`.
pub fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("modscope=debug")
    } else if quiet {
        EnvFilter::new("modscope=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modscope=info"))
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once at program start.
pub fn init_logger(verbose: bool, quiet: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}

