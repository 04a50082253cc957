//! Help-block rendering.
//!
//! Pure formatting over the registry: one line per option in
//! declaration order, plus the parser name, the program summary (the
//! help option's description), and a trailing line for the help option
//! itself. Rendering never fails and has no side effects.

use std::fmt::Write;

use itertools::Itertools;

use crate::argument::ArgumentType;

use super::{ArgParser, Registered};

impl ArgParser {
    /// Renders the help block for the registered schema.
    #[must_use]
    pub fn help_description(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.name);
        if let Some(help) = &self.help {
            if !help.description.is_empty() {
                let _ = writeln!(out, "{}", help.description);
            }
        }
        let _ = writeln!(out);

        for (name, registered) in &self.options {
            let _ = writeln!(out, "{}", option_line(name, registered));
        }

        if let Some(help) = &self.help {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "-{},  --{},  Display this help and exit",
                help.short, help.full_name
            );
        }
        out
    }
}

fn option_line(name: &str, registered: &Registered) -> String {
    let short = match registered.short {
        Some(short) => format!("-{short},"),
        None => String::new(),
    };
    let hint = match registered.argument.kind() {
        ArgumentType::String => "=<string>",
        ArgumentType::Int => "=<int>",
        ArgumentType::Flag => "",
    };

    let mut line = format!("{short:<4} --{name}{hint}");
    if !registered.description.is_empty() {
        let _ = write!(line, ",  {}", registered.description);
    }

    let annotations = annotations(registered);
    if !annotations.is_empty() {
        let _ = write!(line, " [{}]", annotations.iter().join(", "));
    }
    line
}

/// Trait annotations in fixed order: multiplicity, positional, default.
fn annotations(registered: &Registered) -> Vec<String> {
    let argument = &registered.argument;
    let mut annotations = Vec::new();
    if argument.is_multivalue() {
        annotations.push(format!("repeated, min args = {}", argument.min_args()));
    }
    if argument.is_positional() {
        annotations.push("positional".to_string());
    }
    if let Some(default) = argument.default_text() {
        annotations.push(format!("default = {default}"));
    }
    annotations
}
