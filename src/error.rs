//! Parse-failure taxonomy for the argument parser.
//!
//! Every way a token scan or post-scan validation sweep can fail is a
//! variant here. Registration-time contract violations (duplicate names,
//! invalid short characters, mis-ordered builder calls) are programmer
//! errors and panic at the call site instead of appearing in this enum.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown argument: `{}`", .0)]
    UnknownArgument(String),

    #[error("Argument `{}` expects a value, but the argument list ended.", .0)]
    MissingValue(String),

    #[error("Invalid integer `{}` for argument `{}`: {}", .value, .name, .original)]
    InvalidInteger {
        name: String,
        value: String,
        original: std::num::ParseIntError,
    },

    #[error("Flag `{}` does not take a value.", .0)]
    FlagWithValue(String),

    #[error("Positional values cannot be stored in flag argument `{}`.", .0)]
    PositionalFlag(String),

    #[error("Malformed short option token: `{}`", .0)]
    MalformedShortToken(String),

    #[error("No positional argument is declared to receive `{}`.", .0)]
    NoPositionalDefined(String),

    #[error("Argument `{}` requires at least {} values, but received {}.", .name, .min, .count)]
    NotEnoughValues {
        name: String,
        min: usize,
        count: usize,
    },

    #[error("Required argument `{}` was never given a value.", .0)]
    MissingArgument(String),
}

impl Error {
    pub fn invalid_integer(name: &str, value: &str, original: std::num::ParseIntError) -> Self {
        Self::InvalidInteger {
            name: name.to_string(),
            value: value.to_string(),
            original,
        }
    }
}
