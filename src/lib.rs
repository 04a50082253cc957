//! Cliparse
//!
//! A schema-driven command-line argument parser: declare typed options
//! programmatically, parse a raw argument vector, and read the results
//! by name. Built for application authors who want precise control over
//! their option schema without a derive macro or grammar file.
//!
//! # Key Features
//!
//! - **Typed options**: string, integer (`i64`, strictly parsed), and
//!   flag arguments with cross-type access rejected at the query site
//! - **Token grammar**: `--name`, `--name=value`, `-c`, `-c=value`,
//!   combined short flags (`-cde`), and positional tokens
//! - **Builder chaining**: registration returns the typed
//!   [`Argument`] so defaults, multiplicity, positional mode, and
//!   external storage bindings chain off one call
//! - **External bindings**: parsed values can write straight into
//!   caller-owned storage instead of the parser's slots
//! - **Validation**: post-scan multiplicity and completeness sweeps
//!   with a precise [`Error`] per failure mode
//! - **Help rendering**: a deterministic help block in declaration
//!   order, with a help option that short-circuits parsing
//!
//! # Examples
//!
//! ```
//! use cliparse::ArgParser;
//!
//! let mut parser = ArgParser::new("greeter");
//! parser.add_help('h', "help", "Greets people from the command line");
//! parser
//!     .add_string_argument('n', "name", "who to greet")
//!     .with_default("World".to_string());
//! parser
//!     .add_int_argument(None, "times", "how many greetings")
//!     .with_default(1);
//! parser.add_flag('l', "loud", "shout the greeting");
//!
//! let args: Vec<String> = ["greeter", "--name=Rust", "-l"]
//!     .iter()
//!     .map(ToString::to_string)
//!     .collect();
//! parser.parse(&args)?;
//!
//! assert_eq!(parser.get_string_value("name"), "Rust");
//! assert_eq!(parser.get_int_value("times"), 1);
//! assert!(parser.get_flag("loud"));
//! # Ok::<(), cliparse::Error>(())
//! ```

pub mod argument;
pub mod error;
pub mod parser;

pub use argument::{Argument, ArgumentType};
pub use error::{Error, Result};
pub use parser::ArgParser;
