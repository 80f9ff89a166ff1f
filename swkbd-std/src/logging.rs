use tracing::Level;

/// Installs the global `fmt` subscriber, writing to stderr.
///
/// `verbose` lowers the level from `INFO` to `DEBUG`. Calling this twice, or
/// after another subscriber was installed, leaves the first one in place.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let result = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .try_init();

    if result.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
