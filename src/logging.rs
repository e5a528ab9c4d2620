//! Diagnostic logging.
//!
//! Results go to stdout through [`output`](crate::output). Logs are for
//! tracing what the codec and recognizer boundaries did, and are only
//! installed with `--verbose`. They are written to stderr so piping `--json`
//! output stays clean.

use tracing_subscriber::fmt;

/// Install a stderr `fmt` subscriber at DEBUG level when `verbose` is set.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    if !verbose {
        return;
    }
    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
}
