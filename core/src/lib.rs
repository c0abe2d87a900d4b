//! Verb-style command-line parsing.
//!
//! A program declares one [`Verb`] per action it supports. Each verb binds
//! options, switches, positional values and an optional catch-all
//! multi-value to fields of its own target type through setter closures.
//! A [`Parser`] selects the verb from the first token and fills a fresh
//! target from the rest:
//!
//! - [`tokenize`] splits a raw line on whitespace, honouring `"`, `'` and
//!   `` ` `` quotes.
//! - [`Verb::parse`] classifies and assigns tokens, applies defaults and runs
//!   [dependency predicates](required_if).
//! - [`Parser::parse`] dispatches on the verb name and reports failures as a
//!   [`ParseFailure`] carrying one or more [`ParseError`]s.
//!
//! Help switches are an outcome, not an error path of their own:
//! a parse that meets one returns a single [`ErrorCode::HelpRequested`]
//! together with the verb (if known) so the caller can render help from
//! [`VerbInfo`].
//!
//! # Example
//!
//! ```
//! use verbline_core::*;
//!
//! #[derive(Debug, Default)]
//! struct Push { remote: String, force: bool, retries: u32 }
//!
//! let push = Verb::<Push>::builder("push")
//!     .describe("Upload local changes")
//!     .value(ValueArg::new("remote", text(), |t: &mut Push, v| t.remote = v).default_value("origin".into()))
//!     .switch(SwitchArg::flag(Some("-f"), Some("--force"), "force", |t: &mut Push, v| t.force = v))
//!     .option(
//!         OptionArg::new(None, Some("--retries"), "retries", from_str(), |t: &mut Push, v| t.retries = v)
//!             .default_value(2),
//!     )
//!     .build()?;
//!
//! let parser = Parser::builder().verb(push, |p| p).build()?;
//!
//! let parsed = parser.parse_line("push upstream --force").unwrap();
//! assert_eq!((parsed.remote.as_str(), parsed.force, parsed.retries), ("upstream", true, 2));
//!
//! let failure = parser.parse_line("push --retries many").unwrap_err();
//! assert_eq!(failure.errors()[0].code, ErrorCode::OptionConversionFailure);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod convert;
mod dependency;
mod dispatch;
mod error;
mod parse;
mod settings;
mod tokenize;
mod types;
mod validate;
mod verb;

pub use convert::{Converted, convert, from_str, text, to_text};
pub use dependency::{forbidden_if, required_if};
pub use dispatch::{Dispatch, ParseFailure, ParseResult, Parser, ParserBuilder, Selected};
pub use error::{ErrorCode, ParseError, SchemaError, SettingsError};
pub use settings::ParserSettings;
pub use tokenize::{Tokens, tokenize};
pub use types::{
    ArgInfo, ArgKind, MultiValueArg, OptionArg, Predicate, Requirement, SwitchArg, ValueArg,
    VerbInfo,
};
pub use verb::{Verb, VerbBuilder};
