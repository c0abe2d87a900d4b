//! Argument definitions and the descriptive data exposed for help renderers.
//!
//! Each argument kind has a typed builder ([`OptionArg`], [`SwitchArg`],
//! [`ValueArg`], [`MultiValueArg`]) generic over the target type `T` and the
//! converted value type `V`. A builder owns its converter and a setter
//! closure that writes the converted value into the target; the verb builder
//! erases both into a single pre-bound assignment, so parsing needs no
//! reflection and no per-token type dispatch.

use std::sync::Arc;

use serde::Serialize;

use crate::convert::{Converted, Converter};
use crate::error::ParseError;

/// Post-scan check for one argument.
///
/// Called with the fully populated target and whether the argument itself
/// was supplied. Returning `Some` records a dependency failure.
pub type Predicate<T> = Box<dyn Fn(&T, bool) -> Option<ParseError> + Send + Sync>;

pub(crate) type Setter<T, V> = Arc<dyn Fn(&mut T, V) + Send + Sync>;

/// The four kinds of argument a verb can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArgKind {
    /// Named argument that consumes the following token.
    Option,
    /// Named argument whose presence alone sets it.
    Switch,
    /// Positional argument, filled in declaration order.
    Value,
    /// Catch-all for the remaining positional tokens.
    MultiValue,
}

impl ArgKind {
    /// Lowercase label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Option => "option",
            Self::Switch => "switch",
            Self::Value => "value",
            Self::MultiValue => "multi-value",
        }
    }

    /// Whether arguments of this kind are matched by name.
    pub fn is_named(self) -> bool {
        matches!(self, Self::Option | Self::Switch)
    }
}

/// Requiredness policy as seen by help renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Requirement {
    /// May be omitted.
    #[default]
    Optional,
    /// Must be supplied unless a default exists.
    Required,
    /// Optional, but a dependency predicate may demand or forbid it.
    Conditional,
}

/// Description of one declared argument.
///
/// # Examples
///
/// ```
/// use verbline_core::{ArgKind, OptionArg, Verb, from_str};
///
/// #[derive(Default)]
/// struct Fetch { retries: u8 }
///
/// let verb = Verb::<Fetch>::builder("fetch")
///     .option(
///         OptionArg::new(Some("-r"), Some("--retries"), "retries", from_str(), |t: &mut Fetch, v| t.retries = v)
///             .describe("How often to retry"),
///     )
///     .build()
///     .unwrap();
///
/// let arg = &verb.info().args[0];
/// assert_eq!(arg.kind, ArgKind::Option);
/// assert_eq!(arg.display_name(), "--retries");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgInfo {
    /// Kind of argument.
    pub kind: ArgKind,
    /// Short form (e.g. `-v`); options and switches only.
    pub short: Option<String>,
    /// Long form (e.g. `--verbose`); options and switches only.
    pub long: Option<String>,
    /// Human-readable name.
    pub name: String,
    /// Description for help output.
    pub description: Option<String>,
    /// Requiredness policy.
    pub requirement: Requirement,
    /// Whether a default is configured.
    pub has_default: bool,
}

impl ArgInfo {
    /// Name used in messages: long form preferred, then short form, then
    /// the descriptive name.
    pub fn display_name(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or(&self.name)
    }

    /// Short and long forms, in that order.
    pub fn switch_names(&self) -> impl Iterator<Item = &str> {
        self.short.as_deref().into_iter().chain(self.long.as_deref())
    }
}

/// Description of one verb, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerbInfo {
    /// Primary invocation name.
    pub name: String,
    /// Additional invocation names.
    pub aliases: Vec<String>,
    /// Description for help output.
    pub description: Option<String>,
    /// Every declared argument.
    pub args: Vec<ArgInfo>,
}

impl VerbInfo {
    /// Primary name followed by aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Arguments of one kind, in declaration order.
    pub fn args_of(&self, kind: ArgKind) -> impl Iterator<Item = &ArgInfo> {
        self.args.iter().filter(move |arg| arg.kind == kind)
    }
}

/// Fields every argument builder shares.
pub(crate) struct Common<T> {
    pub(crate) short: Option<String>,
    pub(crate) long: Option<String>,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) required: bool,
    pub(crate) dependency: Option<Predicate<T>>,
}

impl<T> Common<T> {
    fn new(short: Option<&str>, long: Option<&str>, name: &str) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            name: name.to_string(),
            description: None,
            required: false,
            dependency: None,
        }
    }

    pub(crate) fn info(&self, kind: ArgKind, has_default: bool) -> ArgInfo {
        let requirement = if self.required {
            Requirement::Required
        } else if self.dependency.is_some() {
            Requirement::Conditional
        } else {
            Requirement::Optional
        };
        ArgInfo {
            kind,
            short: self.short.clone(),
            long: self.long.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            requirement,
            has_default,
        }
    }
}

macro_rules! common_modifiers {
    () => {
        /// Adds a description for help output.
        pub fn describe(mut self, text: &str) -> Self {
            self.common.description = Some(text.to_string());
            self
        }

        /// Marks the argument as required.
        ///
        /// A configured default still satisfies a required argument.
        pub fn required(mut self) -> Self {
            self.common.required = true;
            self
        }

        /// Attaches a dependency predicate evaluated after a clean scan.
        pub fn depends<P>(mut self, predicate: P) -> Self
        where
            P: Fn(&T, bool) -> Option<ParseError> + Send + Sync + 'static,
        {
            self.common.dependency = Some(Box::new(predicate));
            self
        }
    };
}

/// A named argument that consumes the next token as its value.
pub struct OptionArg<T, V> {
    pub(crate) common: Common<T>,
    pub(crate) default: Option<V>,
    pub(crate) converter: Converter<V>,
    pub(crate) setter: Setter<T, V>,
}

impl<T, V> OptionArg<T, V> {
    /// Creates an option with its converter and setter.
    pub fn new<C, S>(short: Option<&str>, long: Option<&str>, name: &str, converter: C, setter: S) -> Self
    where
        C: Fn(&str) -> Converted<V> + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self {
            common: Common::new(short, long, name),
            default: None,
            converter: Box::new(converter),
            setter: Arc::new(setter),
        }
    }

    /// Value assigned when the option is absent.
    pub fn default_value(mut self, value: V) -> Self {
        self.default = Some(value);
        self
    }

    common_modifiers!();
}

/// A named argument set by presence alone.
///
/// The converter maps presence (`true`) or absence (`false`) to the stored
/// value, so a switch can drive any type, not just `bool`.
pub struct SwitchArg<T, V> {
    pub(crate) common: Common<T>,
    pub(crate) default: Option<V>,
    pub(crate) converter: Box<dyn Fn(bool) -> Converted<V> + Send + Sync>,
    pub(crate) setter: Setter<T, V>,
}

impl<T, V> SwitchArg<T, V> {
    /// Creates a switch with a presence converter and setter.
    pub fn new<C, S>(short: Option<&str>, long: Option<&str>, name: &str, converter: C, setter: S) -> Self
    where
        C: Fn(bool) -> Converted<V> + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self {
            common: Common::new(short, long, name),
            default: None,
            converter: Box::new(converter),
            setter: Arc::new(setter),
        }
    }

    /// Value assigned when the switch is absent, instead of converting `false`.
    pub fn default_value(mut self, value: V) -> Self {
        self.default = Some(value);
        self
    }

    common_modifiers!();
}

impl<T> SwitchArg<T, bool> {
    /// A plain boolean switch: `true` when present, `false` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use verbline_core::{ParserSettings, SwitchArg, Verb};
    ///
    /// #[derive(Default)]
    /// struct Opts { verbose: bool }
    ///
    /// let verb = Verb::<Opts>::builder("run")
    ///     .switch(SwitchArg::flag(Some("-v"), Some("--verbose"), "verbose", |t: &mut Opts, v| t.verbose = v))
    ///     .build()
    ///     .unwrap();
    ///
    /// let opts = verb.parse(&["-v"], &ParserSettings::default()).unwrap();
    /// assert!(opts.verbose);
    /// ```
    pub fn flag<S>(short: Option<&str>, long: Option<&str>, name: &str, setter: S) -> Self
    where
        S: Fn(&mut T, bool) + Send + Sync + 'static,
    {
        Self::new(short, long, name, Ok, setter)
    }
}

/// A positional argument filled in declaration order.
pub struct ValueArg<T, V> {
    pub(crate) common: Common<T>,
    pub(crate) default: Option<V>,
    pub(crate) converter: Converter<V>,
    pub(crate) setter: Setter<T, V>,
}

impl<T, V> ValueArg<T, V> {
    /// Creates a positional value with its converter and setter.
    pub fn new<C, S>(name: &str, converter: C, setter: S) -> Self
    where
        C: Fn(&str) -> Converted<V> + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self {
            common: Common::new(None, None, name),
            default: None,
            converter: Box::new(converter),
            setter: Arc::new(setter),
        }
    }

    /// Value assigned when the tokens run out before this position.
    pub fn default_value(mut self, value: V) -> Self {
        self.default = Some(value);
        self
    }

    common_modifiers!();
}

/// The catch-all positional argument; converts each element and assigns
/// the whole collection once.
pub struct MultiValueArg<T, V> {
    pub(crate) common: Common<T>,
    pub(crate) default: Option<Vec<V>>,
    pub(crate) converter: Converter<V>,
    pub(crate) setter: Setter<T, Vec<V>>,
}

impl<T, V> MultiValueArg<T, V> {
    /// Creates a multi-value with an element converter and a setter for the
    /// collected elements.
    pub fn new<C, S>(name: &str, converter: C, setter: S) -> Self
    where
        C: Fn(&str) -> Converted<V> + Send + Sync + 'static,
        S: Fn(&mut T, Vec<V>) + Send + Sync + 'static,
    {
        Self {
            common: Common::new(None, None, name),
            default: None,
            converter: Box::new(converter),
            setter: Arc::new(setter),
        }
    }

    /// Elements assigned when no tokens were collected.
    pub fn default_value(mut self, values: Vec<V>) -> Self {
        self.default = Some(values);
        self
    }

    common_modifiers!();
}
