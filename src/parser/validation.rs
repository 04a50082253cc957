//! Post-scan validation sweeps.
//!
//! Runs only after a scan that did not match the help option: a
//! multiplicity sweep (every multi-value option reached its minimum)
//! and a completeness sweep (every non-positional, non-flag option was
//! supplied or carries a default). Violations surface as parse errors,
//! never mid-scan.

use log::debug;

use crate::argument::ArgumentType;
use crate::error::{Error, Result};

use super::ArgParser;

impl ArgParser {
    pub(super) fn validate(&self) -> Result<()> {
        self.check_multiplicity()?;
        self.check_completeness()
    }

    fn check_multiplicity(&self) -> Result<()> {
        for (name, registered) in &self.options {
            let argument = &registered.argument;
            if !argument.is_multivalue() {
                continue;
            }
            let count = argument.count();
            if count < argument.min_args() {
                debug!(
                    "`{name}` received {count} of {} required values",
                    argument.min_args()
                );
                return Err(Error::NotEnoughValues {
                    name: name.clone(),
                    min: argument.min_args(),
                    count,
                });
            }
        }
        Ok(())
    }

    fn check_completeness(&self) -> Result<()> {
        for (name, registered) in &self.options {
            let argument = &registered.argument;
            if argument.is_positional() || argument.kind() == ArgumentType::Flag {
                continue;
            }
            if !argument.has_value() {
                debug!("`{name}` was never given a value");
                return Err(Error::MissingArgument(name.clone()));
            }
        }
        Ok(())
    }
}
