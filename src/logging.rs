use flexi_logger::{opt_format, FlexiLoggerError, Logger, LoggerHandle};

/// Starts a stderr logger for the binaries.
///
/// `RUST_LOG`, when set, takes precedence over `default_spec` (e.g. `"info"` or
/// `"expendibots::solver=debug"`). Keep the returned handle alive for as long as logging is needed.
pub fn setup_logging(default_spec: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(default_spec)?
        .format(opt_format)
        .start()
}
