//! Typed value holders for declared options.
//!
//! Each registered option is backed by one [`Argument`] of a fixed value
//! type. The argument accumulates values during a parse, carries the
//! option's multiplicity/positional/default metadata, and can write
//! through to caller-owned storage instead of its internal slots.
//!
//! The parser stores arguments of the three supported types behind the
//! closed [`AnyArgument`] union, so the registry stays one ordered
//! sequence while every dispatch point pattern-matches on the concrete
//! type.

use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// The value type of a declared option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    String,
    Int,
    Flag,
}

impl Display for ArgumentType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgumentType::String => formatter.write_str("string"),
            ArgumentType::Int => formatter.write_str("int"),
            ArgumentType::Flag => formatter.write_str("flag"),
        }
    }
}

/// One declared option's value storage and metadata.
///
/// Returned by the parser's registration methods so callers can chain
/// configuration before parsing:
///
/// ```
/// use cliparse::ArgParser;
///
/// let mut parser = ArgParser::new("demo");
/// parser
///     .add_string_argument('o', "out", "output paths")
///     .multi_value(1);
/// ```
#[derive(Debug, Default)]
pub struct Argument<T> {
    value: T,
    values: Vec<T>,
    bound_value: Option<Rc<RefCell<T>>>,
    bound_values: Option<Rc<RefCell<Vec<T>>>>,
    default: Option<T>,
    min_args: usize,
    multivalue: bool,
    positional: bool,
    supplied: bool,
}

impl<T: Clone + Default> Argument<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the value returned when the option never appears on the
    /// command line. A defaulted option also satisfies the completeness
    /// validation sweep.
    pub fn with_default(&mut self, value: T) -> &mut Self {
        self.default = Some(value);
        self
    }

    /// Switches the option to accumulating mode. `min_args` is the
    /// minimum number of occurrences the multiplicity validation sweep
    /// requires.
    pub fn multi_value(&mut self, min_args: usize) -> &mut Self {
        self.multivalue = true;
        self.min_args = min_args;
        self
    }

    /// Marks the option as positional. The first declared positional
    /// option receives every bare token of the parse.
    pub fn positional(&mut self) -> &mut Self {
        self.positional = true;
        self
    }

    /// Binds caller-owned storage for a single-value option. Parsed
    /// values are written through the handle instead of the internal
    /// slot; keep a clone of the `Rc` to read the result, and do not
    /// hold a borrow of the cell across a parse.
    pub fn store_value(&mut self, storage: Rc<RefCell<T>>) -> &mut Self {
        self.bound_value = Some(storage);
        self
    }

    /// Binds caller-owned storage for a multi-value option.
    ///
    /// # Panics
    ///
    /// Panics if [`multi_value`](Self::multi_value) was not applied
    /// first; the binding mode must match the accumulation mode.
    pub fn store_values(&mut self, storage: Rc<RefCell<Vec<T>>>) -> &mut Self {
        if !self.multivalue {
            panic!("store_values can only be used after multi_value");
        }
        self.bound_values = Some(storage);
        self
    }

    /// Records one parsed value. Multi-value options append in
    /// encounter order; single-value options overwrite (last write
    /// wins). When an external binding is present the value goes
    /// through it instead of the internal slot.
    pub(crate) fn add_value(&mut self, value: T) {
        self.supplied = true;
        if self.multivalue {
            if let Some(bound) = &self.bound_values {
                bound.borrow_mut().push(value);
            } else {
                self.values.push(value);
            }
        } else if let Some(bound) = &self.bound_value {
            *bound.borrow_mut() = value;
        } else {
            self.value = value;
        }
    }

    /// Returns the value at `index`.
    ///
    /// A single-value option that was never supplied returns its default
    /// when one was set, and the zero-initialized value of the type
    /// otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for a multi-value option, or if
    /// `index` is nonzero for a single-value option.
    #[must_use]
    pub fn get(&self, index: usize) -> T {
        if self.multivalue {
            if let Some(bound) = &self.bound_values {
                let values = bound.borrow();
                if index >= values.len() {
                    panic!("index {index} is out of range for multi-value argument");
                }
                return values[index].clone();
            }
            if index >= self.values.len() {
                panic!("index {index} is out of range for multi-value argument");
            }
            return self.values[index].clone();
        }

        if index > 0 {
            panic!("only the first value of a single-value argument is retrievable");
        }
        if !self.supplied {
            if let Some(default) = &self.default {
                return default.clone();
            }
        }
        if let Some(bound) = &self.bound_value {
            return bound.borrow().clone();
        }
        self.value.clone()
    }

    /// Number of accumulated values, read from the bound external
    /// sequence when one is present. The single slot of a non-multivalue
    /// option is not counted.
    #[must_use]
    pub fn count(&self) -> usize {
        if let Some(bound) = &self.bound_values {
            return bound.borrow().len();
        }
        self.values.len()
    }

    #[must_use]
    pub fn is_positional(&self) -> bool {
        self.positional
    }

    #[must_use]
    pub fn is_multivalue(&self) -> bool {
        self.multivalue
    }

    #[must_use]
    pub fn min_args(&self) -> usize {
        self.min_args
    }

    /// True once a value was observed during a parse *or* a default was
    /// set. Feeds the completeness validation sweep.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.supplied || self.default.is_some()
    }

    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub(crate) fn default_ref(&self) -> Option<&T> {
        self.default.as_ref()
    }
}

/// Closed union over the three supported argument types.
///
/// Replaces virtual dispatch plus downcasting with pattern matching:
/// every dispatch point is mechanically checkable for exhaustiveness and
/// cross-type access cannot be expressed by accident.
#[derive(Debug)]
pub(crate) enum AnyArgument {
    String(Argument<String>),
    Int(Argument<i64>),
    Flag(Argument<bool>),
}

impl AnyArgument {
    pub(crate) fn kind(&self) -> ArgumentType {
        match self {
            AnyArgument::String(_) => ArgumentType::String,
            AnyArgument::Int(_) => ArgumentType::Int,
            AnyArgument::Flag(_) => ArgumentType::Flag,
        }
    }

    pub(crate) fn is_positional(&self) -> bool {
        match self {
            AnyArgument::String(argument) => argument.is_positional(),
            AnyArgument::Int(argument) => argument.is_positional(),
            AnyArgument::Flag(argument) => argument.is_positional(),
        }
    }

    pub(crate) fn is_multivalue(&self) -> bool {
        match self {
            AnyArgument::String(argument) => argument.is_multivalue(),
            AnyArgument::Int(argument) => argument.is_multivalue(),
            AnyArgument::Flag(argument) => argument.is_multivalue(),
        }
    }

    pub(crate) fn min_args(&self) -> usize {
        match self {
            AnyArgument::String(argument) => argument.min_args(),
            AnyArgument::Int(argument) => argument.min_args(),
            AnyArgument::Flag(argument) => argument.min_args(),
        }
    }

    pub(crate) fn has_value(&self) -> bool {
        match self {
            AnyArgument::String(argument) => argument.has_value(),
            AnyArgument::Int(argument) => argument.has_value(),
            AnyArgument::Flag(argument) => argument.has_value(),
        }
    }

    pub(crate) fn count(&self) -> usize {
        match self {
            AnyArgument::String(argument) => argument.count(),
            AnyArgument::Int(argument) => argument.count(),
            AnyArgument::Flag(argument) => argument.count(),
        }
    }

    /// Display form of the default value, for help rendering.
    pub(crate) fn default_text(&self) -> Option<String> {
        match self {
            AnyArgument::String(argument) => argument.default_ref().cloned(),
            AnyArgument::Int(argument) => argument.default_ref().map(ToString::to_string),
            AnyArgument::Flag(argument) => argument.default_ref().map(ToString::to_string),
        }
    }
}
