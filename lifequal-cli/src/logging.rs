//! Routes `log` records from the library crates into a `tracing` subscriber.

use tracing::Level;
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use crate::CliError;

/// Pick the subscriber level from the global verbosity flags.
pub(crate) const fn level_for(verbose: bool, debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// Install the log bridge and a formatting subscriber writing to stderr.
///
/// Stdout stays reserved for the run summary.
pub(crate) fn init(level: Level) -> Result<(), CliError> {
    LogTracer::init().map_err(CliError::LogBridge)?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(CliError::Subscriber)
}
