use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{DriverError, Result};

/// Installs a stderr subscriber filtered by `level` (an `EnvFilter` directive such as `warn` or
/// `mway_set=trace`). The filter comes only from the argument, never from the environment.
/// Colours are only used when stderr is a terminal.
pub(crate) fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level).map_err(|e| DriverError::InvalidLogLevel(e.to_string()))?;
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_ansi(io::stderr().is_terminal())
        .try_init()
        .map_err(|_| DriverError::Logging)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_directive() {
        assert!(matches!(init_logging("mway_set=loud"), Err(DriverError::InvalidLogLevel(_))));
    }
}
