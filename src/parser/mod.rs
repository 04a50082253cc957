//! The parser engine: registry, registration API, and typed queries.
//!
//! An [`ArgParser`] owns the ordered collection of declared options plus
//! the name-resolution tables. Callers register options (each
//! registration hands back the concrete [`Argument`] for chaining), call
//! one of the parse entry points, and read results through the typed
//! getters or through storage bound at registration time.
//!
//! The engine is split across submodules the way the work splits:
//! this module holds the registry and the registration/query surface,
//! `scan` the tokenizing/dispatch loop, `validation` the post-scan
//! sweeps, and `help` the help-block rendering.

mod help;
mod scan;
mod validation;

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;

use crate::argument::{AnyArgument, Argument, ArgumentType};
use crate::error::Result;

/// The designated help option: either token form short-circuits the
/// scan as "help requested".
#[derive(Debug)]
struct HelpOption {
    short: char,
    full_name: String,
    description: String,
}

/// One registry record: the option's short character, its help text,
/// and the typed argument payload.
#[derive(Debug)]
struct Registered {
    short: Option<char>,
    description: String,
    argument: AnyArgument,
}

/// Command-line argument parser over a caller-declared option schema.
///
/// # Examples
///
/// ```
/// use cliparse::ArgParser;
///
/// let mut parser = ArgParser::new("demo");
/// parser.add_int_argument('n', "count", "how many times").with_default(1);
/// parser.add_flag('v', "verbose", "enable verbose output");
///
/// let args: Vec<String> = ["demo", "-v", "--count=3"]
///     .iter()
///     .map(ToString::to_string)
///     .collect();
/// parser.parse(&args)?;
///
/// assert_eq!(parser.get_int_value("count"), 3);
/// assert!(parser.get_flag("verbose"));
/// # Ok::<(), cliparse::Error>(())
/// ```
#[derive(Debug)]
pub struct ArgParser {
    name: String,
    options: IndexMap<String, Registered>,
    short_index: HashMap<char, String>,
    help: Option<HelpOption>,
    help_requested: bool,
    positional: Option<usize>,
}

impl ArgParser {
    /// Creates a parser. The name appears only in the rendered help
    /// block.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: IndexMap::new(),
            short_index: HashMap::new(),
            help: None,
            help_requested: false,
            positional: None,
        }
    }

    /// Registers a string-valued option and returns it for chaining.
    ///
    /// Pass `'c'` to also bind a short name, or `None` for a long-only
    /// option.
    ///
    /// # Panics
    ///
    /// Panics if `full_name` or the short character is already
    /// registered, or if the short character is not an ASCII letter or
    /// digit.
    pub fn add_string_argument(
        &mut self,
        short: impl Into<Option<char>>,
        full_name: &str,
        description: &str,
    ) -> &mut Argument<String> {
        let index = self.register(
            short.into(),
            full_name,
            description,
            AnyArgument::String(Argument::new()),
        );
        match &mut self.options[index].argument {
            AnyArgument::String(argument) => argument,
            _ => unreachable!(),
        }
    }

    /// Registers an integer-valued option and returns it for chaining.
    /// Values parse as `i64` with no partial matches; see
    /// [`Error::InvalidInteger`](crate::Error::InvalidInteger).
    ///
    /// # Panics
    ///
    /// Panics under the same registration contract as
    /// [`add_string_argument`](Self::add_string_argument).
    pub fn add_int_argument(
        &mut self,
        short: impl Into<Option<char>>,
        full_name: &str,
        description: &str,
    ) -> &mut Argument<i64> {
        let index = self.register(
            short.into(),
            full_name,
            description,
            AnyArgument::Int(Argument::new()),
        );
        match &mut self.options[index].argument {
            AnyArgument::Int(argument) => argument,
            _ => unreachable!(),
        }
    }

    /// Registers a flag and returns it for chaining. Flags take no
    /// value; their presence on the command line sets them true.
    ///
    /// # Panics
    ///
    /// Panics under the same registration contract as
    /// [`add_string_argument`](Self::add_string_argument).
    pub fn add_flag(
        &mut self,
        short: impl Into<Option<char>>,
        full_name: &str,
        description: &str,
    ) -> &mut Argument<bool> {
        let index = self.register(
            short.into(),
            full_name,
            description,
            AnyArgument::Flag(Argument::new()),
        );
        match &mut self.options[index].argument {
            AnyArgument::Flag(argument) => argument,
            _ => unreachable!(),
        }
    }

    /// Designates the help option. Matching either token form during a
    /// parse stops the scan and reports success without validating.
    /// Calling this twice replaces the previous designation. The
    /// description doubles as the program summary in the rendered help
    /// block.
    ///
    /// # Panics
    ///
    /// Panics if the short character is not an ASCII letter or digit.
    pub fn add_help(&mut self, short: char, full_name: &str, description: &str) {
        check_short_name(short);
        self.help = Some(HelpOption {
            short,
            full_name: full_name.to_string(),
            description: description.to_string(),
        });
    }

    /// Parses a process argument list. The element at index 0 is the
    /// program name and is skipped.
    ///
    /// # Errors
    ///
    /// Returns the first scan failure (unknown argument, missing or
    /// malformed value) or post-scan validation failure. A parse that
    /// matched the help option succeeds without validation.
    pub fn parse(&mut self, args: &[String]) -> Result<()> {
        self.help_requested = false;
        self.positional = None;
        debug!(
            "`{}` parsing {} tokens",
            self.name,
            args.len().saturating_sub(1)
        );

        self.scan(args)?;
        if self.help_requested {
            debug!("help requested, skipping validation");
            return Ok(());
        }
        self.validate()
    }

    /// Parses an explicit token sequence. Normalized to the same scan
    /// as [`parse`](Self::parse): the first token is skipped.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`parse`](Self::parse).
    pub fn parse_iter<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.parse(&args)
    }

    /// True iff the last parse matched the help option.
    #[must_use]
    pub fn help_requested(&self) -> bool {
        self.help_requested
    }

    /// First value of a string option. Equivalent to
    /// [`get_string_value_at`](Self::get_string_value_at) with index 0.
    ///
    /// # Panics
    ///
    /// Panics if the name is unknown or the option is not string-typed.
    #[must_use]
    pub fn get_string_value(&self, full_name: &str) -> String {
        self.get_string_value_at(full_name, 0)
    }

    /// Value of a string option at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the name is unknown, the option is not string-typed,
    /// or the index is out of range for the option's accumulation mode.
    #[must_use]
    pub fn get_string_value_at(&self, full_name: &str, index: usize) -> String {
        match &self.registered(full_name).argument {
            AnyArgument::String(argument) => argument.get(index),
            other => panic!(
                "argument `{full_name}` is not of string type (it is {})",
                other.kind()
            ),
        }
    }

    /// First value of an integer option.
    ///
    /// # Panics
    ///
    /// Panics if the name is unknown or the option is not int-typed.
    #[must_use]
    pub fn get_int_value(&self, full_name: &str) -> i64 {
        self.get_int_value_at(full_name, 0)
    }

    /// Value of an integer option at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the name is unknown, the option is not int-typed, or
    /// the index is out of range for the option's accumulation mode.
    #[must_use]
    pub fn get_int_value_at(&self, full_name: &str, index: usize) -> i64 {
        match &self.registered(full_name).argument {
            AnyArgument::Int(argument) => argument.get(index),
            other => panic!(
                "argument `{full_name}` is not of int type (it is {})",
                other.kind()
            ),
        }
    }

    /// State of a flag option.
    ///
    /// # Panics
    ///
    /// Panics if the name is unknown or the option is not flag-typed.
    #[must_use]
    pub fn get_flag(&self, full_name: &str) -> bool {
        self.get_flag_at(full_name, 0)
    }

    /// State of a flag option at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the name is unknown, the option is not flag-typed, or
    /// the index is out of range for the option's accumulation mode.
    #[must_use]
    pub fn get_flag_at(&self, full_name: &str, index: usize) -> bool {
        match &self.registered(full_name).argument {
            AnyArgument::Flag(argument) => argument.get(index),
            other => panic!(
                "argument `{full_name}` is not of flag type (it is {})",
                other.kind()
            ),
        }
    }

    /// Number of values accumulated for an option during the last
    /// parse (read from the bound external sequence when one exists).
    ///
    /// # Panics
    ///
    /// Panics if the name is unknown.
    #[must_use]
    pub fn value_count(&self, full_name: &str) -> usize {
        self.registered(full_name).argument.count()
    }

    /// Declared value type of an option.
    ///
    /// # Panics
    ///
    /// Panics if the name is unknown.
    #[must_use]
    pub fn argument_type(&self, full_name: &str) -> ArgumentType {
        self.registered(full_name).argument.kind()
    }

    fn register(
        &mut self,
        short: Option<char>,
        full_name: &str,
        description: &str,
        argument: AnyArgument,
    ) -> usize {
        if self.options.contains_key(full_name) {
            panic!("argument `{full_name}` is already registered");
        }
        if let Some(short) = short {
            check_short_name(short);
            if self.short_index.contains_key(&short) {
                panic!("short name `{short}` is already registered");
            }
            self.short_index.insert(short, full_name.to_string());
        }

        let index = self.options.len();
        self.options.insert(
            full_name.to_string(),
            Registered {
                short,
                description: description.to_string(),
                argument,
            },
        );
        index
    }

    fn registered(&self, full_name: &str) -> &Registered {
        self.options
            .get(full_name)
            .unwrap_or_else(|| panic!("unknown argument `{full_name}`"))
    }

    fn name_at(&self, index: usize) -> String {
        let (name, _) = self
            .options
            .get_index(index)
            .expect("argument index points at a registered option");
        name.clone()
    }

    fn is_help_name(&self, name: &str) -> bool {
        self.help
            .as_ref()
            .is_some_and(|help| help.full_name == name)
    }

    fn is_help_short(&self, short: char) -> bool {
        self.help.as_ref().is_some_and(|help| help.short == short)
    }
}

fn check_short_name(short: char) {
    if !short.is_ascii_alphanumeric() {
        panic!("short name `{short}` must be an ASCII letter or digit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_preserves_declaration_order() {
        let mut parser = ArgParser::new("order");
        parser.add_string_argument('a', "alpha", "");
        parser.add_int_argument(None, "beta", "");
        parser.add_flag('c', "gamma", "");

        let names: Vec<&String> = parser.options.keys().collect();
        assert_eq!(names, ["alpha", "beta", "gamma"]);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_full_name_panics() {
        let mut parser = ArgParser::new("dup");
        parser.add_string_argument(None, "name", "");
        parser.add_int_argument(None, "name", "");
    }

    #[test]
    #[should_panic(expected = "short name `x` is already registered")]
    fn test_duplicate_short_name_panics() {
        let mut parser = ArgParser::new("dup");
        parser.add_string_argument('x', "first", "");
        parser.add_string_argument('x', "second", "");
    }

    #[test]
    #[should_panic(expected = "must be an ASCII letter or digit")]
    fn test_invalid_short_name_panics() {
        let mut parser = ArgParser::new("bad");
        parser.add_flag('-', "dash", "");
    }

    #[test]
    #[should_panic(expected = "unknown argument `missing`")]
    fn test_query_unknown_name_panics() {
        let parser = ArgParser::new("empty");
        parser.get_string_value("missing");
    }

    #[test]
    #[should_panic(expected = "is not of int type")]
    fn test_cross_type_query_panics() {
        let mut parser = ArgParser::new("types");
        parser.add_string_argument(None, "text", "");
        parser.get_int_value("text");
    }

    #[test]
    fn test_add_help_twice_overwrites() {
        let mut parser = ArgParser::new("help");
        parser.add_help('h', "help", "first");
        parser.add_help('u', "usage", "second");

        assert!(parser.is_help_name("usage"));
        assert!(!parser.is_help_name("help"));
        assert!(parser.is_help_short('u'));
    }

    #[test]
    fn test_argument_type_reports_declared_kind() {
        let mut parser = ArgParser::new("types");
        parser.add_string_argument(None, "text", "");
        parser.add_int_argument(None, "num", "");
        parser.add_flag(None, "on", "");

        assert_eq!(parser.argument_type("text"), ArgumentType::String);
        assert_eq!(parser.argument_type("num"), ArgumentType::Int);
        assert_eq!(parser.argument_type("on"), ArgumentType::Flag);
    }

    #[test]
    fn test_value_count_reads_accumulation() {
        let mut parser = ArgParser::new("count");
        parser.add_string_argument('o', "out", "").multi_value(0);

        let args: Vec<String> = ["prog", "-o=a", "-o=b"]
            .iter()
            .map(ToString::to_string)
            .collect();
        parser.parse(&args).unwrap();
        assert_eq!(parser.value_count("out"), 2);
    }
}
