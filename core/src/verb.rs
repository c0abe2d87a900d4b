//! Verbs: the immutable argument schema one parse runs against.
//!
//! A [`Verb`] is built once through [`VerbBuilder`], validated, and then
//! shared read-only by every parse call. Building erases the typed argument
//! builders into entries whose closures already capture the converter,
//! setter and default, each keyed by a stable index into the verb's
//! [`VerbInfo::args`].

use std::fmt;

use crate::convert::convert;
use crate::error::{ErrorCode, ParseError, SchemaError};
use crate::settings::ParserSettings;
use crate::types::{
    ArgInfo, ArgKind, MultiValueArg, OptionArg, Predicate, SwitchArg, ValueArg, VerbInfo,
};
use crate::validate::{validate_settings, validate_verb, validate_verb_against};

pub(crate) type TextAssign<T> = Box<dyn Fn(&mut T, &str) -> Result<(), ParseError> + Send + Sync>;
pub(crate) type FlagAssign<T> = Box<dyn Fn(&mut T) -> Result<(), ParseError> + Send + Sync>;
pub(crate) type ManyAssign<T> =
    Box<dyn Fn(&mut T, &[&str]) -> Result<(), ParseError> + Send + Sync>;

/// Erased option, switch or value.
///
/// `assign` runs when the argument was supplied (the text is ignored by
/// switches); `fallback` runs when it was not.
pub(crate) struct Entry<T> {
    pub(crate) arg: usize,
    pub(crate) assign: TextAssign<T>,
    pub(crate) fallback: FlagAssign<T>,
    pub(crate) dependency: Option<Predicate<T>>,
}

/// Erased multi-value; `assign` always runs, once, with the collected tokens.
pub(crate) struct MultiEntry<T> {
    pub(crate) arg: usize,
    pub(crate) assign: ManyAssign<T>,
    pub(crate) dependency: Option<Predicate<T>>,
}

/// One verb's argument schema.
///
/// # Examples
///
/// ```
/// use verbline_core::*;
///
/// #[derive(Debug, Default)]
/// struct Copy { source: String, dest: String, force: bool }
///
/// let verb = Verb::<Copy>::builder("copy")
///     .alias("cp")
///     .value(ValueArg::new("source", text(), |t: &mut Copy, v| t.source = v).required())
///     .value(ValueArg::new("dest", text(), |t: &mut Copy, v| t.dest = v).required())
///     .switch(SwitchArg::flag(Some("-f"), Some("--force"), "force", |t: &mut Copy, v| t.force = v))
///     .build()
///     .unwrap();
///
/// let settings = ParserSettings::default();
/// let copy = verb.parse(&["a.txt", "b.txt", "--force"], &settings).unwrap();
/// assert_eq!((copy.source.as_str(), copy.dest.as_str(), copy.force), ("a.txt", "b.txt", true));
///
/// let errors = verb.parse(&["a.txt"], &settings).unwrap_err();
/// assert_eq!(errors[0].code, ErrorCode::MissingRequiredValue);
/// ```
pub struct Verb<T> {
    pub(crate) info: VerbInfo,
    pub(crate) options: Vec<Entry<T>>,
    pub(crate) switches: Vec<Entry<T>>,
    pub(crate) values: Vec<Entry<T>>,
    pub(crate) multi_value: Option<MultiEntry<T>>,
}

impl<T> Verb<T> {
    /// Starts building a verb invoked as `name`.
    pub fn builder(name: &str) -> VerbBuilder<T> {
        VerbBuilder {
            info: VerbInfo {
                name: name.to_string(),
                aliases: Vec::new(),
                description: None,
                args: Vec::new(),
            },
            options: Vec::new(),
            switches: Vec::new(),
            values: Vec::new(),
            multi_values: Vec::new(),
        }
    }

    /// Descriptive data for help renderers.
    pub fn info(&self) -> &VerbInfo {
        &self.info
    }

    pub(crate) fn arg(&self, index: usize) -> &ArgInfo {
        &self.info.args[index]
    }

    pub(crate) fn find_option(&self, token: &str, settings: &ParserSettings) -> Option<usize> {
        find_named(&self.options, &self.info.args, token, settings)
    }

    pub(crate) fn find_switch(&self, token: &str, settings: &ParserSettings) -> Option<usize> {
        find_named(&self.switches, &self.info.args, token, settings)
    }

    /// Validates this verb against the settings it will be parsed with.
    ///
    /// [`Parser`](crate::Parser) runs this for every registered verb;
    /// programs without verbs call it once before using [`Verb::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidHelpSwitch`] for an unusable help
    /// switch, [`SchemaError::ArgumentCollidesWithHelp`] when an option or
    /// switch would be shadowed by help, or
    /// [`SchemaError::DuplicateArgumentName`] when two names are equal under
    /// the configured comparer.
    ///
    /// # Examples
    ///
    /// ```
    /// use verbline_core::{ParserSettings, SchemaError, SwitchArg, Verb};
    ///
    /// #[derive(Default)]
    /// struct Du { human: bool }
    ///
    /// let verb = Verb::<Du>::builder("du")
    ///     .switch(SwitchArg::flag(Some("-h"), Some("--human"), "human", |t: &mut Du, v| t.human = v))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(matches!(
    ///     verb.check(&ParserSettings::default()),
    ///     Err(SchemaError::ArgumentCollidesWithHelp { .. })
    /// ));
    ///
    /// let settings = ParserSettings { short_help: None, ..ParserSettings::default() };
    /// assert_eq!(verb.check(&settings), Ok(()));
    /// ```
    pub fn check(&self, settings: &ParserSettings) -> Result<(), SchemaError> {
        validate_settings(settings)?;
        validate_verb_against(settings, &self.info)
    }
}

impl<T: Default> Verb<T> {
    /// Parses `tokens` (the verb name already removed) into a fresh `T`.
    ///
    /// This is also the entry point for programs without verbs; such
    /// programs validate the verb with [`Verb::check`] first.
    ///
    /// # Errors
    ///
    /// Returns every error found, in discovery order. A help switch
    /// anywhere yields exactly one [`ErrorCode::HelpRequested`].
    pub fn parse<S: AsRef<str>>(
        &self,
        tokens: &[S],
        settings: &ParserSettings,
    ) -> Result<T, Vec<ParseError>> {
        crate::parse::run(self, tokens, settings)
    }
}

impl<T> fmt::Debug for Verb<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verb").field("info", &self.info).finish_non_exhaustive()
    }
}

fn find_named<T>(
    entries: &[Entry<T>],
    args: &[ArgInfo],
    token: &str,
    settings: &ParserSettings,
) -> Option<usize> {
    entries.iter().position(|entry| {
        args[entry.arg]
            .switch_names()
            .any(|name| settings.names_match(name, token))
    })
}

/// Fluent construction of a [`Verb`].
pub struct VerbBuilder<T> {
    info: VerbInfo,
    options: Vec<Entry<T>>,
    switches: Vec<Entry<T>>,
    values: Vec<Entry<T>>,
    multi_values: Vec<MultiEntry<T>>,
}

impl<T: 'static> VerbBuilder<T> {
    /// Adds an alternative invocation name.
    pub fn alias(mut self, alias: &str) -> Self {
        self.info.aliases.push(alias.to_string());
        self
    }

    /// Adds a description for help output.
    pub fn describe(mut self, text: &str) -> Self {
        self.info.description = Some(text.to_string());
        self
    }

    /// Registers an option.
    pub fn option<V>(mut self, arg: OptionArg<T, V>) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let info = arg.common.info(ArgKind::Option, arg.default.is_some());
        let label = info.display_name().to_string();
        let index = self.push_info(info);
        let OptionArg {
            common,
            default,
            converter,
            setter,
        } = arg;

        let assign_setter = setter.clone();
        let assign_label = label.clone();
        let assign: TextAssign<T> = Box::new(move |target: &mut T, raw: &str| {
            let value = convert(ArgKind::Option, &assign_label, raw, &converter)?;
            assign_setter(target, value);
            Ok(())
        });
        let fallback = fallback(ArgKind::Option, label, common.required, default, setter);

        self.options.push(Entry {
            arg: index,
            assign,
            fallback,
            dependency: common.dependency,
        });
        self
    }

    /// Registers a switch.
    pub fn switch<V>(mut self, arg: SwitchArg<T, V>) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let info = arg.common.info(ArgKind::Switch, arg.default.is_some());
        let label = info.display_name().to_string();
        let index = self.push_info(info);
        let SwitchArg {
            common,
            default,
            converter,
            setter,
        } = arg;
        let converter = std::sync::Arc::new(converter);

        let on = converter.clone();
        let assign_setter = setter.clone();
        let assign_label = label.clone();
        let assign: TextAssign<T> = Box::new(move |target: &mut T, _: &str| {
            let value = convert(ArgKind::Switch, &assign_label, "true", |_| on(true))?;
            assign_setter(target, value);
            Ok(())
        });

        // Absent switches take the default, else convert `false`; a required
        // switch without default is missing.
        let required = common.required;
        let fallback: FlagAssign<T> = Box::new(move |target: &mut T| {
            if let Some(value) = &default {
                setter(target, value.clone());
                return Ok(());
            }
            if required {
                return Err(missing(ArgKind::Switch, &label));
            }
            let value = convert(ArgKind::Switch, &label, "false", |_| converter(false))?;
            setter(target, value);
            Ok(())
        });

        self.switches.push(Entry {
            arg: index,
            assign,
            fallback,
            dependency: common.dependency,
        });
        self
    }

    /// Registers the next positional value.
    pub fn value<V>(mut self, arg: ValueArg<T, V>) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let info = arg.common.info(ArgKind::Value, arg.default.is_some());
        let label = info.display_name().to_string();
        let index = self.push_info(info);
        let ValueArg {
            common,
            default,
            converter,
            setter,
        } = arg;

        let assign_setter = setter.clone();
        let assign_label = label.clone();
        let assign: TextAssign<T> = Box::new(move |target: &mut T, raw: &str| {
            let value = convert(ArgKind::Value, &assign_label, raw, &converter)?;
            assign_setter(target, value);
            Ok(())
        });
        let fallback = fallback(ArgKind::Value, label, common.required, default, setter);

        self.values.push(Entry {
            arg: index,
            assign,
            fallback,
            dependency: common.dependency,
        });
        self
    }

    /// Registers the catch-all multi-value.
    ///
    /// A verb takes either positional values or one multi-value; mixing is
    /// reported by [`build`](Self::build).
    pub fn multi_value<V>(mut self, arg: MultiValueArg<T, V>) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let info = arg.common.info(ArgKind::MultiValue, arg.default.is_some());
        let label = info.display_name().to_string();
        let index = self.push_info(info);
        let MultiValueArg {
            common,
            default,
            converter,
            setter,
        } = arg;

        let required = common.required;
        let assign: ManyAssign<T> = Box::new(move |target: &mut T, raw: &[&str]| {
            if raw.is_empty() {
                if let Some(values) = &default {
                    setter(target, values.clone());
                    return Ok(());
                }
                if required {
                    return Err(missing(ArgKind::MultiValue, &label));
                }
            }
            let values = raw
                .iter()
                .map(|item| convert(ArgKind::MultiValue, &label, item, &converter))
                .collect::<Result<Vec<V>, ParseError>>()?;
            setter(target, values);
            Ok(())
        });

        self.multi_values.push(MultiEntry {
            arg: index,
            assign,
            dependency: common.dependency,
        });
        self
    }

    /// Validates names and shape and produces the immutable verb.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found: bad or duplicate names, or
    /// a verb mixing positional values with a multi-value.
    pub fn build(self) -> Result<Verb<T>, SchemaError> {
        validate_verb(&self.info)?;

        let VerbBuilder {
            info,
            options,
            switches,
            values,
            mut multi_values,
        } = self;

        Ok(Verb {
            info,
            options,
            switches,
            values,
            multi_value: multi_values.pop(),
        })
    }

    fn push_info(&mut self, info: ArgInfo) -> usize {
        self.info.args.push(info);
        self.info.args.len() - 1
    }
}

fn missing(kind: ArgKind, label: &str) -> ParseError {
    ParseError::new(
        ErrorCode::missing_required(kind),
        format!("missing required {} '{label}'", kind.label()),
    )
}

/// Default assignment for an absent option or value.
fn fallback<T: 'static, V>(
    kind: ArgKind,
    label: String,
    required: bool,
    default: Option<V>,
    setter: crate::types::Setter<T, V>,
) -> FlagAssign<T>
where
    V: Clone + Send + Sync + 'static,
{
    Box::new(move |target: &mut T| match &default {
        Some(value) => {
            setter(target, value.clone());
            Ok(())
        }
        None if required => Err(missing(kind, &label)),
        None => Ok(()),
    })
}
