//! The tokenizing/dispatch loop.
//!
//! Tokens are classified left to right — long form, short form, or
//! positional — and each form's handler resolves the target option and
//! applies its value with a per-type dispatch. Scan state lives in one
//! explicit [`Cursor`] that handlers advance when they consume a value
//! token; a handler failure aborts the scan with values applied so far
//! left in place.

use log::debug;

use crate::argument::AnyArgument;
use crate::error::{Error, Result};

use super::ArgParser;

/// Position of the scan within the token slice. Index 0 is the program
/// name, so scanning starts at 1.
struct Cursor<'a> {
    tokens: &'a [String],
    index: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [String]) -> Self {
        Self { tokens, index: 1 }
    }

    fn current(&self) -> Option<&'a str> {
        self.tokens.get(self.index).map(String::as_str)
    }

    /// Consumes the following token as a value, advancing past it.
    fn take_next(&mut self) -> Option<&'a str> {
        let next = self.tokens.get(self.index + 1)?;
        self.index += 1;
        Some(next.as_str())
    }

    fn advance(&mut self) {
        self.index += 1;
    }
}

impl ArgParser {
    pub(super) fn scan(&mut self, tokens: &[String]) -> Result<()> {
        let mut cursor = Cursor::new(tokens);
        while let Some(token) = cursor.current() {
            if self.help_requested {
                break;
            }

            if let Some(body) = token.strip_prefix("--") {
                self.scan_long(body, &mut cursor)?;
            } else if token.len() > 1 && token.starts_with('-') {
                self.scan_short(token, &mut cursor)?;
            } else {
                self.scan_positional(token)?;
            }
            cursor.advance();
        }
        Ok(())
    }

    /// Long form: `--name=value` (named) or `--name` (next-token). The
    /// help full name matches only in next-token form.
    fn scan_long(&mut self, body: &str, cursor: &mut Cursor<'_>) -> Result<()> {
        match body.split_once('=') {
            Some((name, value)) => {
                let index = self.resolve_long(name)?;
                self.apply_named(index, name, value)
            }
            None => {
                if self.is_help_name(body) {
                    debug!("`--{body}` matched the help option");
                    self.help_requested = true;
                    return Ok(());
                }
                let index = self.resolve_long(body)?;
                self.apply_next(index, body, cursor)
            }
        }
    }

    /// Short form: `-c=value`, `-c`, or combined flags `-cde`. An `=`
    /// anywhere but byte offset 2 is malformed.
    fn scan_short(&mut self, token: &str, cursor: &mut Cursor<'_>) -> Result<()> {
        match token.find('=') {
            Some(2) => {
                let short = token.as_bytes()[1] as char;
                let (index, name) = self.resolve_short(short)?;
                self.apply_named(index, &name, &token[3..])
            }
            Some(_) => Err(Error::MalformedShortToken(token.to_string())),
            None => {
                let shorts: Vec<char> = token.chars().skip(1).collect();
                match shorts.as_slice() {
                    [] => Err(Error::MalformedShortToken(token.to_string())),
                    [short] => {
                        if self.is_help_short(*short) {
                            debug!("`-{short}` matched the help option");
                            self.help_requested = true;
                            return Ok(());
                        }
                        let (index, name) = self.resolve_short(*short)?;
                        self.apply_next(index, &name, cursor)
                    }
                    combined => self.scan_combined_flags(combined),
                }
            }
        }
    }

    /// Combined short flags: every character must resolve to a
    /// registered flag (or the help short character, which stops the
    /// scan). Flags already set before a bad character stay set.
    fn scan_combined_flags(&mut self, shorts: &[char]) -> Result<()> {
        for &short in shorts {
            if self.is_help_short(short) {
                debug!("`-{short}` matched the help option");
                self.help_requested = true;
                return Ok(());
            }
            let (index, _) = self.resolve_short(short)?;
            match &mut self.options[index].argument {
                AnyArgument::Flag(argument) => argument.add_value(true),
                _ => return Err(Error::UnknownArgument(format!("-{short}"))),
            }
        }
        Ok(())
    }

    /// Bare token: routed to the first declared positional option.
    fn scan_positional(&mut self, token: &str) -> Result<()> {
        let index = self.resolve_positional(token)?;
        let name = self.name_at(index);
        match &mut self.options[index].argument {
            AnyArgument::String(argument) => {
                argument.add_value(token.to_string());
                Ok(())
            }
            AnyArgument::Int(argument) => {
                let parsed = parse_integer(&name, token)?;
                argument.add_value(parsed);
                Ok(())
            }
            AnyArgument::Flag(_) => Err(Error::PositionalFlag(name)),
        }
    }

    /// Applies an `=`-form value to the resolved option.
    fn apply_named(&mut self, index: usize, name: &str, value: &str) -> Result<()> {
        match &mut self.options[index].argument {
            AnyArgument::String(argument) => {
                argument.add_value(value.to_string());
                Ok(())
            }
            AnyArgument::Int(argument) => {
                let parsed = parse_integer(name, value)?;
                argument.add_value(parsed);
                Ok(())
            }
            AnyArgument::Flag(_) => Err(Error::FlagWithValue(name.to_string())),
        }
    }

    /// Applies a next-token value to the resolved option; flags take no
    /// value and are set by presence alone.
    fn apply_next(&mut self, index: usize, name: &str, cursor: &mut Cursor<'_>) -> Result<()> {
        match &mut self.options[index].argument {
            AnyArgument::Flag(argument) => {
                argument.add_value(true);
                Ok(())
            }
            AnyArgument::String(argument) => {
                let value = cursor
                    .take_next()
                    .ok_or_else(|| Error::MissingValue(name.to_string()))?;
                argument.add_value(value.to_string());
                Ok(())
            }
            AnyArgument::Int(argument) => {
                let value = cursor
                    .take_next()
                    .ok_or_else(|| Error::MissingValue(name.to_string()))?;
                let parsed = parse_integer(name, value)?;
                argument.add_value(parsed);
                Ok(())
            }
        }
    }

    fn resolve_long(&self, name: &str) -> Result<usize> {
        self.options
            .get_index_of(name)
            .ok_or_else(|| Error::UnknownArgument(format!("--{name}")))
    }

    fn resolve_short(&self, short: char) -> Result<(usize, String)> {
        let full_name = self
            .short_index
            .get(&short)
            .ok_or_else(|| Error::UnknownArgument(format!("-{short}")))?;
        let index = self
            .options
            .get_index_of(full_name)
            .ok_or_else(|| Error::UnknownArgument(format!("-{short}")))?;
        Ok((index, full_name.clone()))
    }

    /// First declared positional option, resolved once per parse and
    /// cached.
    fn resolve_positional(&mut self, token: &str) -> Result<usize> {
        if let Some(index) = self.positional {
            return Ok(index);
        }
        let index = self
            .options
            .values()
            .position(|registered| registered.argument.is_positional())
            .ok_or_else(|| Error::NoPositionalDefined(token.to_string()))?;
        self.positional = Some(index);
        Ok(index)
    }
}

fn parse_integer(name: &str, text: &str) -> Result<i64> {
    text.parse::<i64>()
        .map_err(|original| Error::invalid_integer(name, text, original))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_long_named_and_next_token_forms() {
        let mut parser = ArgParser::new("scan");
        parser.add_string_argument(None, "first", "");
        parser.add_string_argument(None, "second", "");

        parser
            .parse(&args(&["prog", "--first=one", "--second", "two"]))
            .unwrap();
        assert_eq!(parser.get_string_value("first"), "one");
        assert_eq!(parser.get_string_value("second"), "two");
    }

    #[test]
    fn test_short_named_and_next_token_forms() {
        let mut parser = ArgParser::new("scan");
        parser.add_int_argument('a', "alpha", "");
        parser.add_int_argument('b', "beta", "");

        parser.parse(&args(&["prog", "-a=1", "-b", "2"])).unwrap();
        assert_eq!(parser.get_int_value("alpha"), 1);
        assert_eq!(parser.get_int_value("beta"), 2);
    }

    #[test]
    fn test_unknown_long_argument_fails() {
        let mut parser = ArgParser::new("scan");
        let result = parser.parse(&args(&["prog", "--unknown"]));
        assert!(matches!(result, Err(Error::UnknownArgument(token)) if token == "--unknown"));
    }

    #[test]
    fn test_unknown_short_argument_fails() {
        let mut parser = ArgParser::new("scan");
        let result = parser.parse(&args(&["prog", "-z"]));
        assert!(matches!(result, Err(Error::UnknownArgument(token)) if token == "-z"));
    }

    #[test]
    fn test_double_dash_alone_is_an_unknown_long_name() {
        // There is no end-of-options sentinel: `--` is the long option
        // with an empty name.
        let mut parser = ArgParser::new("scan");
        let result = parser.parse(&args(&["prog", "--"]));
        assert!(matches!(result, Err(Error::UnknownArgument(token)) if token == "--"));
    }

    #[test]
    fn test_single_dash_is_positional() {
        let mut parser = ArgParser::new("scan");
        parser.add_string_argument(None, "input", "").positional();

        parser.parse(&args(&["prog", "-"])).unwrap();
        assert_eq!(parser.get_string_value("input"), "-");
    }

    #[test]
    fn test_missing_next_token_value_fails() {
        let mut parser = ArgParser::new("scan");
        parser.add_string_argument('o', "out", "");

        let result = parser.parse(&args(&["prog", "--out"]));
        assert!(matches!(result, Err(Error::MissingValue(name)) if name == "out"));
    }

    #[test]
    fn test_integer_rejects_garbage_trailing_text_and_overflow() {
        let mut parser = ArgParser::new("scan");
        parser.add_int_argument('n', "count", "");

        for bad in ["abc", "12x", "1 2", "", "9223372036854775808"] {
            let token = format!("--count={bad}");
            let result = parser.parse(&args(&["prog", &token]));
            assert!(
                matches!(&result, Err(Error::InvalidInteger { value, .. }) if value == bad),
                "`{bad}` should fail integer conversion"
            );
        }
    }

    #[test]
    fn test_integer_round_trips_in_range() {
        let mut parser = ArgParser::new("scan");
        parser.add_int_argument('n', "count", "");

        parser
            .parse(&args(&["prog", "--count=-9223372036854775808"]))
            .unwrap();
        assert_eq!(parser.get_int_value("count"), i64::MIN);

        parser
            .parse(&args(&["prog", "--count=9223372036854775807"]))
            .unwrap();
        assert_eq!(parser.get_int_value("count"), i64::MAX);
    }

    #[test]
    fn test_flag_rejects_named_form() {
        let mut parser = ArgParser::new("scan");
        parser.add_flag('v', "verbose", "");

        let result = parser.parse(&args(&["prog", "--verbose=true"]));
        assert!(matches!(result, Err(Error::FlagWithValue(name)) if name == "verbose"));

        let result = parser.parse(&args(&["prog", "-v=true"]));
        assert!(matches!(result, Err(Error::FlagWithValue(name)) if name == "verbose"));
    }

    #[test]
    fn test_misplaced_equals_in_short_token_is_malformed() {
        let mut parser = ArgParser::new("scan");
        parser.add_flag('a', "aa", "");
        parser.add_flag('b', "bb", "");

        let result = parser.parse(&args(&["prog", "-ab=c"]));
        assert!(matches!(result, Err(Error::MalformedShortToken(token)) if token == "-ab=c"));
    }

    #[test]
    fn test_combined_flags_set_every_member() {
        let mut parser = ArgParser::new("scan");
        parser.add_flag('a', "aa", "");
        parser.add_flag('b', "bb", "");
        parser.add_flag('c', "cc", "");

        parser.parse(&args(&["prog", "-acb"])).unwrap();
        assert!(parser.get_flag("aa"));
        assert!(parser.get_flag("bb"));
        assert!(parser.get_flag("cc"));
    }

    #[test]
    fn test_combined_flags_reject_non_flag_member() {
        let mut parser = ArgParser::new("scan");
        parser.add_flag('a', "aa", "");
        parser.add_string_argument('s', "text", "");

        let result = parser.parse(&args(&["prog", "-as"]));
        assert!(matches!(result, Err(Error::UnknownArgument(token)) if token == "-s"));
        // No rollback: the flag scanned before the failure stays set.
        assert!(parser.get_flag("aa"));
    }

    #[test]
    fn test_positional_tokens_accumulate_into_first_positional() {
        let mut parser = ArgParser::new("scan");
        parser.add_flag('v', "verbose", "");
        parser
            .add_int_argument(None, "values", "")
            .multi_value(0)
            .positional();

        parser.parse(&args(&["prog", "1", "-v", "2", "3"])).unwrap();
        assert_eq!(parser.value_count("values"), 3);
        assert_eq!(parser.get_int_value_at("values", 2), 3);
        assert!(parser.get_flag("verbose"));
    }

    #[test]
    fn test_positional_token_without_positional_option_fails() {
        let mut parser = ArgParser::new("scan");
        parser.add_string_argument(None, "named", "").with_default(String::new());

        let result = parser.parse(&args(&["prog", "stray"]));
        assert!(matches!(result, Err(Error::NoPositionalDefined(token)) if token == "stray"));
    }

    #[test]
    fn test_positional_flag_target_fails() {
        let mut parser = ArgParser::new("scan");
        parser.add_flag(None, "switch", "").positional();

        let result = parser.parse(&args(&["prog", "on"]));
        assert!(matches!(result, Err(Error::PositionalFlag(name)) if name == "switch"));
    }

    #[test]
    fn test_first_declared_positional_wins() {
        let mut parser = ArgParser::new("scan");
        parser.add_string_argument(None, "first", "").positional();
        parser.add_string_argument(None, "second", "").positional().with_default("unused".to_string());

        parser.parse(&args(&["prog", "token"])).unwrap();
        assert_eq!(parser.get_string_value("first"), "token");
        assert_eq!(parser.get_string_value("second"), "unused");
    }

    #[test]
    fn test_help_token_stops_the_scan() {
        let mut parser = ArgParser::new("scan");
        parser.add_help('h', "help", "summary");
        parser.add_string_argument(None, "required", "");

        // `--unknown` would fail, but the scan never reaches it.
        parser
            .parse(&args(&["prog", "--help", "--unknown"]))
            .unwrap();
        assert!(parser.help_requested());
    }

    #[test]
    fn test_help_short_inside_combined_flags_stops_the_scan() {
        let mut parser = ArgParser::new("scan");
        parser.add_help('h', "help", "summary");
        parser.add_flag('a', "aa", "");

        parser.parse(&args(&["prog", "-ahz"])).unwrap();
        assert!(parser.help_requested());
        assert!(parser.get_flag("aa"));
    }

    #[test]
    fn test_next_parse_resets_help_state() {
        let mut parser = ArgParser::new("scan");
        parser.add_help('h', "help", "summary");
        parser.add_flag('v', "verbose", "");

        parser.parse(&args(&["prog", "-h"])).unwrap();
        assert!(parser.help_requested());

        parser.parse(&args(&["prog", "-v"])).unwrap();
        assert!(!parser.help_requested());
        assert!(parser.get_flag("verbose"));
    }

    #[test]
    fn test_empty_input_scans_nothing() {
        let mut parser = ArgParser::new("scan");
        parser.add_flag('v', "verbose", "");
        parser.parse(&[]).unwrap();
        assert!(!parser.get_flag("verbose"));
    }
}
