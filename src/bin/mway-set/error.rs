use thiserror::Error;

/// Everything the driver can report.
///
/// The `Display` text of each variant is the exact diagnostic line written to stderr.
#[derive(Debug, Error)]
pub(crate) enum DriverError {
    /// `i <key>` for a key that is already in the set.
    #[error("i {0}: The key already exists")]
    DuplicateKey(i32),
    /// `d <key>` for a key that is not in the set.
    #[error("d {0}: The key does not exist")]
    KeyNotFound(i32),
    /// A command character other than `i` or `d`.
    #[error("Invalid command: {0}")]
    InvalidCommand(char),
    /// `--log-level` is not a valid filter directive.
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
    /// A global subscriber was already installed.
    #[error("logging already initialized")]
    Logging,
    /// Reading commands or writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for driver operations.
pub(crate) type Result<T> = std::result::Result<T, DriverError>;

impl DriverError {
    /// Recoverable errors are reported and processing continues with the next command.
    pub(crate) fn is_recoverable(&self) -> bool {
        matches!(self, DriverError::DuplicateKey(_) | DriverError::KeyNotFound(_))
    }
}
