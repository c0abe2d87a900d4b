//! Verb dispatch and the parse result model.
//!
//! A [`Parser`] owns a set of verbs that may bind different target types,
//! each mapped into one caller-chosen result type `R` (typically an enum
//! with one variant per verb). The first token selects the verb; the rest
//! go to that verb's classification loop.

use std::fmt;

use tracing::debug;

use crate::error::{ErrorCode, ParseError, SchemaError};
use crate::settings::ParserSettings;
use crate::tokenize::tokenize;
use crate::types::VerbInfo;
use crate::validate::validate_verb_set;
use crate::verb::Verb;

/// A verb bound to the parser's result type.
trait BoundVerb<R>: Send + Sync {
    fn info(&self) -> &VerbInfo;
    fn parse(&self, tokens: &[&str], settings: &ParserSettings) -> Result<R, Vec<ParseError>>;
}

struct Binding<T, F> {
    verb: Verb<T>,
    wrap: F,
}

impl<T, R, F> BoundVerb<R> for Binding<T, F>
where
    T: Default,
    F: Fn(T) -> R + Send + Sync,
{
    fn info(&self) -> &VerbInfo {
        self.verb.info()
    }

    fn parse(&self, tokens: &[&str], settings: &ParserSettings) -> Result<R, Vec<ParseError>> {
        self.verb.parse(tokens, settings).map(&self.wrap)
    }
}

/// What the first token selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'p, 't, S> {
    /// A registered verb matched.
    Verb(Selected<'p, 't, S>),
    /// There were no tokens.
    NoVerb,
    /// The first token names no verb and is not a help switch.
    InvalidVerb(&'t S),
    /// The first token is a help switch.
    HelpRequested,
}

/// A matched verb and the tokens after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selected<'p, 't, S> {
    index: usize,
    info: &'p VerbInfo,
    rest: &'t [S],
}

impl<'p, 't, S> Selected<'p, 't, S> {
    /// The matched verb.
    pub fn info(&self) -> &'p VerbInfo {
        self.info
    }

    /// Tokens following the verb name.
    pub fn rest(&self) -> &'t [S] {
        self.rest
    }
}

/// A failed parse: the verb, if one was identified, and at least one error.
///
/// # Examples
///
/// ```
/// use verbline_core::{ErrorCode, Parser, Verb};
///
/// #[derive(Default)]
/// struct Ping;
///
/// let parser = Parser::<()>::builder()
///     .verb(Verb::<Ping>::builder("ping").build().unwrap(), |_| ())
///     .build()
///     .unwrap();
///
/// let failure = parser.parse(&["pong"]).unwrap_err();
/// assert!(failure.verb().is_none());
/// assert_eq!(failure.errors()[0].code, ErrorCode::InvalidVerb);
///
/// let failure = parser.parse(&["ping", "extra"]).unwrap_err();
/// assert_eq!(failure.verb().map(|v| v.name.as_str()), Some("ping"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure<'p> {
    verb: Option<&'p VerbInfo>,
    errors: Vec<ParseError>,
}

impl<'p> ParseFailure<'p> {
    fn new(verb: Option<&'p VerbInfo>, errors: Vec<ParseError>) -> Self {
        debug_assert!(!errors.is_empty(), "a failed parse carries at least one error");
        Self { verb, errors }
    }

    fn single(verb: Option<&'p VerbInfo>, code: ErrorCode, message: String) -> Self {
        Self::new(verb, vec![ParseError::new(code, message)])
    }

    /// The verb the tokens were parsed against, if dispatch got that far.
    pub fn verb(&self) -> Option<&'p VerbInfo> {
        self.verb
    }

    /// Errors in discovery order; never empty.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Consumes the failure, returning its errors.
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Returns `true` when the failure is a help request rather than an error.
    pub fn is_help(&self) -> bool {
        matches!(self.errors.as_slice(), [only] if only.is_help())
    }
}

impl fmt::Display for ParseFailure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(verb) = self.verb {
            write!(f, "{}: ", verb.name)?;
        }
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ParseFailure<'_> {}

/// Outcome of [`Parser::parse`].
pub type ParseResult<'p, R> = Result<R, ParseFailure<'p>>;

/// Verb dispatcher over an immutable verb set.
///
/// Safe to share between threads; every parse builds its own target.
///
/// # Examples
///
/// ```
/// use verbline_core::*;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Add { name: String }
/// #[derive(Debug, Default, PartialEq)]
/// struct Remove { names: Vec<String> }
///
/// #[derive(Debug, PartialEq)]
/// enum Command { Add(Add), Remove(Remove) }
///
/// let parser = Parser::builder()
///     .verb(
///         Verb::<Add>::builder("add")
///             .value(ValueArg::new("name", text(), |t: &mut Add, v| t.name = v).required())
///             .build()?,
///         Command::Add,
///     )
///     .verb(
///         Verb::<Remove>::builder("remove")
///             .alias("rm")
///             .multi_value(MultiValueArg::new("names", text(), |t: &mut Remove, v| t.names = v))
///             .build()?,
///         Command::Remove,
///     )
///     .build()?;
///
/// assert_eq!(
///     parser.parse_line("ADD 'new item'").unwrap(),
///     Command::Add(Add { name: "new item".into() }),
/// );
/// assert_eq!(
///     parser.parse_line("rm a b").unwrap(),
///     Command::Remove(Remove { names: vec!["a".into(), "b".into()] }),
/// );
/// assert!(parser.parse_line("--help").unwrap_err().is_help());
/// # Ok::<(), SchemaError>(())
/// ```
pub struct Parser<R> {
    settings: ParserSettings,
    verbs: Vec<Box<dyn BoundVerb<R>>>,
}

impl<R: 'static> Parser<R> {
    /// Starts a parser with default settings.
    pub fn builder() -> ParserBuilder<R> {
        ParserBuilder {
            settings: ParserSettings::default(),
            verbs: Vec::new(),
        }
    }

    /// The settings this parser was built with.
    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Descriptive data for every verb, in registration order.
    pub fn verbs(&self) -> impl Iterator<Item = &VerbInfo> {
        self.verbs.iter().map(|verb| verb.info())
    }

    /// Finds a verb by name or alias under the configured comparer.
    pub fn find_verb(&self, name: &str) -> Option<&VerbInfo> {
        self.position(name).map(|index| self.verbs[index].info())
    }

    /// Selects a verb from the first token.
    ///
    /// # Examples
    ///
    /// ```
    /// use verbline_core::{Dispatch, Parser, Verb};
    ///
    /// #[derive(Default)]
    /// struct Status;
    ///
    /// let parser = Parser::<()>::builder()
    ///     .verb(Verb::<Status>::builder("status").build().unwrap(), |_| ())
    ///     .build()
    ///     .unwrap();
    ///
    /// match parser.dispatch(&["status", "--short"]) {
    ///     Dispatch::Verb(selected) => {
    ///         assert_eq!(selected.info().name, "status");
    ///         assert_eq!(selected.rest(), ["--short"]);
    ///     }
    ///     other => panic!("unexpected dispatch: {other:?}"),
    /// }
    /// assert_eq!(parser.dispatch::<&str>(&[]), Dispatch::NoVerb);
    /// assert_eq!(parser.dispatch(&["-h"]), Dispatch::HelpRequested);
    /// assert_eq!(parser.dispatch(&["stats"]), Dispatch::InvalidVerb(&"stats"));
    /// ```
    pub fn dispatch<'t, S: AsRef<str>>(&self, tokens: &'t [S]) -> Dispatch<'_, 't, S> {
        let Some((first, rest)) = tokens.split_first() else {
            return Dispatch::NoVerb;
        };
        let first_str = first.as_ref();

        if let Some(index) = self.position(first_str) {
            return Dispatch::Verb(Selected {
                index,
                info: self.verbs[index].info(),
                rest,
            });
        }
        if self.settings.is_help(first_str) {
            return Dispatch::HelpRequested;
        }
        Dispatch::InvalidVerb(first)
    }

    /// Dispatches on the first token and parses the rest.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseFailure`] with [`ErrorCode::NoVerbFound`],
    /// [`ErrorCode::InvalidVerb`] or [`ErrorCode::HelpRequested`] when
    /// dispatch fails, or the selected verb with its parse errors.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> ParseResult<'_, R> {
        match self.dispatch(tokens) {
            Dispatch::Verb(selected) => {
                debug!(verb = %selected.info.name, tokens = selected.rest.len(), "Dispatching verb");
                let rest: Vec<&str> = selected.rest.iter().map(AsRef::<str>::as_ref).collect();
                self.verbs[selected.index]
                    .parse(&rest, &self.settings)
                    .map_err(|errors| ParseFailure::new(Some(selected.info), errors))
            }
            Dispatch::NoVerb => {
                debug!("No verb given");
                Err(ParseFailure::single(
                    None,
                    ErrorCode::NoVerbFound,
                    "no verb given".to_string(),
                ))
            }
            Dispatch::InvalidVerb(token) => {
                let token = AsRef::<str>::as_ref(token);
                debug!(token, "Unknown verb");
                Err(ParseFailure::single(
                    None,
                    ErrorCode::InvalidVerb,
                    format!("unknown verb '{token}'"),
                ))
            }
            Dispatch::HelpRequested => {
                debug!("Help requested");
                Err(ParseFailure::new(None, vec![ParseError::help_requested()]))
            }
        }
    }

    /// Tokenizes `line` and parses it.
    pub fn parse_line(&self, line: &str) -> ParseResult<'_, R> {
        let tokens: Vec<&str> = tokenize(line).collect();
        self.parse(&tokens)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.verbs.iter().position(|verb| {
            verb.info()
                .names()
                .any(|candidate| self.settings.names_match(candidate, name))
        })
    }
}

impl<R> fmt::Debug for Parser<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.verbs.iter().map(|verb| verb.info().name.as_str()).collect();
        f.debug_struct("Parser")
            .field("settings", &self.settings)
            .field("verbs", &names)
            .finish()
    }
}

/// Collects verbs and settings for a [`Parser`].
pub struct ParserBuilder<R> {
    settings: ParserSettings,
    verbs: Vec<Box<dyn BoundVerb<R>>>,
}

impl<R: 'static> ParserBuilder<R> {
    /// Replaces the default settings.
    pub fn settings(mut self, settings: ParserSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Registers a verb and how its target maps into `R`.
    pub fn verb<T, F>(mut self, verb: Verb<T>, wrap: F) -> Self
    where
        T: Default + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        self.verbs.push(Box::new(Binding { verb, wrap }));
        self
    }

    /// Validates the verb set against the settings.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoVerbs`] for an empty set, or the first
    /// duplicate verb name or help-switch collision.
    pub fn build(self) -> Result<Parser<R>, SchemaError> {
        validate_verb_set(&self.settings, self.verbs.iter().map(|verb| verb.info()))?;
        Ok(Parser {
            settings: self.settings,
            verbs: self.verbs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{from_str, text};
    use crate::types::{OptionArg, SwitchArg, ValueArg};

    #[derive(Debug, Default, PartialEq)]
    struct Add {
        title: String,
        priority: u8,
    }

    #[derive(Debug, Default, PartialEq)]
    struct List {
        all: bool,
    }

    #[derive(Debug, PartialEq)]
    enum Command {
        Add(Add),
        List(List),
    }

    fn parser(settings: ParserSettings) -> Parser<Command> {
        Parser::builder()
            .settings(settings)
            .verb(
                Verb::<Add>::builder("add")
                    .value(ValueArg::new("title", text(), |t: &mut Add, v| t.title = v).required())
                    .option(
                        OptionArg::new(Some("-p"), Some("--priority"), "priority", from_str(), |t: &mut Add, v| {
                            t.priority = v
                        })
                        .default_value(3),
                    )
                    .build()
                    .unwrap(),
                Command::Add,
            )
            .verb(
                Verb::<List>::builder("list")
                    .alias("ls")
                    .switch(SwitchArg::flag(Some("-a"), Some("--all"), "all", |t: &mut List, v| t.all = v))
                    .build()
                    .unwrap(),
                Command::List,
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_dispatch_selects_by_name_and_alias() {
        let parser = parser(ParserSettings::default());
        assert_eq!(
            parser.parse(&["add", "milk", "-p", "1"]).unwrap(),
            Command::Add(Add {
                title: "milk".to_string(),
                priority: 1,
            })
        );
        assert_eq!(
            parser.parse(&["LS", "--all"]).unwrap(),
            Command::List(List { all: true })
        );
    }

    #[test]
    fn test_case_sensitive_dispatch() {
        let parser = parser(ParserSettings {
            case_sensitive: true,
            ..ParserSettings::default()
        });
        let failure = parser.parse(&["LS"]).unwrap_err();
        assert_eq!(failure.errors()[0].code, ErrorCode::InvalidVerb);
        assert!(failure.verb().is_none());
    }

    #[test]
    fn test_empty_tokens_report_no_verb() {
        let parser = parser(ParserSettings::default());
        let failure = parser.parse::<&str>(&[]).unwrap_err();
        assert_eq!(failure.errors().len(), 1);
        assert_eq!(failure.errors()[0].code, ErrorCode::NoVerbFound);
        assert_eq!(parser.parse_line("   ").unwrap_err(), failure);
    }

    #[test]
    fn test_help_before_verb_is_distinct_from_invalid_verb() {
        let parser = parser(ParserSettings::default());
        let failure = parser.parse(&["--help"]).unwrap_err();
        assert!(failure.is_help());
        assert!(!failure.errors()[0].show_to_user);
        assert!(failure.verb().is_none());
    }

    #[test]
    fn test_help_after_verb_keeps_verb_context() {
        let parser = parser(ParserSettings::default());
        let failure = parser.parse(&["add", "-p", "x", "-h"]).unwrap_err();
        assert!(failure.is_help());
        assert_eq!(failure.verb().map(|v| v.name.as_str()), Some("add"));
    }

    #[test]
    fn test_failure_display_joins_messages() {
        let parser = parser(ParserSettings::default());
        let failure = parser.parse(&["add"]).unwrap_err();
        assert_eq!(failure.to_string(), "add: missing required value 'title'");
    }

    #[test]
    fn test_build_rejects_empty_verb_set() {
        let err = Parser::<Command>::builder().build().unwrap_err();
        assert_eq!(err, SchemaError::NoVerbs);
    }

    #[test]
    fn test_build_rejects_invalid_help_switch() {
        let err = Parser::<Command>::builder()
            .settings(ParserSettings {
                short_help: Some(String::new()),
                ..ParserSettings::default()
            })
            .verb(Verb::<List>::builder("list").build().unwrap(), Command::List)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::InvalidHelpSwitch(String::new()));
    }

    #[test]
    fn test_find_verb_and_listing() {
        let parser = parser(ParserSettings::default());
        assert_eq!(parser.find_verb("Ls").map(|v| v.name.as_str()), Some("list"));
        assert!(parser.find_verb("rm").is_none());
        let names: Vec<&str> = parser.verbs().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["add", "list"]);
    }

    #[test]
    fn test_parser_is_shareable_across_threads() {
        let parser = std::sync::Arc::new(parser(ParserSettings::default()));
        let handles: Vec<_> = (0..4u8)
            .map(|n| {
                let parser = std::sync::Arc::clone(&parser);
                std::thread::spawn(move || {
                    let priority = n.to_string();
                    match parser.parse(&["add", "task", "--priority", &priority]) {
                        Ok(Command::Add(add)) => add.priority,
                        other => panic!("unexpected result: {other:?}"),
                    }
                })
            })
            .collect();
        let mut seen: Vec<u8> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        seen.sort_unstable();
        assert_eq!(seen, [0, 1, 2, 3]);
    }
}
