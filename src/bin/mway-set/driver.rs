use std::io::{BufRead, Write};

use mway_set::OrderedSet;
use tracing::debug;

use crate::error::{DriverError, Result};
use crate::scanner::Scanner;

/// A parsed command character.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Insert,
    Delete,
}

impl TryFrom<char> for Command {
    type Error = DriverError;

    fn try_from(c: char) -> Result<Self> {
        match c {
            'i' => Ok(Command::Insert),
            'd' => Ok(Command::Delete),
            other => Err(DriverError::InvalidCommand(other)),
        }
    }
}

/// Applies `i`/`d` commands to a set of `i32` keys, printing the set after every successful
/// command to `output` and every diagnostic to `diagnostics`.
pub(crate) struct Driver<W, E> {
    set: OrderedSet<i32>,
    output: W,
    diagnostics: E,
}

impl<W: Write, E: Write> Driver<W, E> {
    pub(crate) fn new(output: W, diagnostics: E) -> Self {
        Self {
            set: OrderedSet::new(),
            output,
            diagnostics,
        }
    }

    /// Processes `input` until it ends or turns malformed.
    ///
    /// Returns an error only for fatal conditions (an invalid command or an I/O failure); the
    /// diagnostic for an invalid command has already been written when it is returned.
    pub(crate) fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        let mut scanner = Scanner::new(input);
        while let Some(command) = scanner.next_command()? {
            let Some(key) = scanner.next_key()? else {
                debug!(%command, "missing or malformed key, treating as end of input");
                break;
            };

            match self.apply(command, key) {
                Ok(()) => {
                    writeln!(self.output, "{}", self.set)?;
                    self.output.flush()?;
                }
                Err(err) => {
                    writeln!(self.diagnostics, "{err}")?;
                    if !err.is_recoverable() {
                        return Err(err);
                    }
                }
            }
        }
        debug!(len = self.set.len(), "end of input");
        Ok(())
    }

    fn apply(&mut self, command: char, key: i32) -> Result<()> {
        match Command::try_from(command)? {
            Command::Insert if self.set.insert(key) => {
                debug!(key, len = self.set.len(), "inserted");
                Ok(())
            }
            Command::Insert => Err(DriverError::DuplicateKey(key)),
            Command::Delete if self.set.erase(&key) == 1 => {
                debug!(key, len = self.set.len(), "deleted");
                Ok(())
            }
            Command::Delete => Err(DriverError::KeyNotFound(key)),
        }
    }

    #[cfg(test)]
    pub(crate) fn set(&self) -> &OrderedSet<i32> {
        &self.set
    }

    #[cfg(test)]
    pub(crate) fn into_writers(self) -> (W, E) {
        (self.output, self.diagnostics)
    }
}
