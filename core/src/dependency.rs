//! Cross-argument checks that run after a clean scan.
//!
//! Every argument may carry a predicate that sees the finished target and
//! whether the argument itself was supplied. Unlike the scan, evaluation
//! collects every failing predicate: each check is independent once the
//! target's fields are known to be sane.
//!
//! [`required_if`] and [`forbidden_if`] cover the common "required when" and
//! "not allowed when" cases and produce the matching per-kind error codes.
//!
//! # Example
//!
//! ```
//! use verbline_core::*;
//!
//! #[derive(Debug, Default)]
//! struct Deploy { dry_run: bool, token: Option<String> }
//!
//! let verb = Verb::<Deploy>::builder("deploy")
//!     .switch(SwitchArg::flag(None, Some("--dry-run"), "dry run", |t: &mut Deploy, v| t.dry_run = v))
//!     .option(
//!         OptionArg::new(None, Some("--token"), "token", text(), |t: &mut Deploy, v| t.token = Some(v))
//!             .depends(required_if(ArgKind::Option, "--token", |t: &Deploy| !t.dry_run)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let settings = ParserSettings::default();
//! assert!(verb.parse(&["--dry-run"], &settings).is_ok());
//!
//! let errors = verb.parse::<&str>(&[], &settings).unwrap_err();
//! assert_eq!(errors[0].code, ErrorCode::MissingRequiredOption);
//! ```

use tracing::trace;

use crate::error::{ErrorCode, ParseError};
use crate::parse::Presence;
use crate::types::ArgKind;
use crate::verb::Verb;

/// Fails with the kind's missing-required code when the argument is absent
/// and `condition` holds for the target.
pub fn required_if<T, C>(
    kind: ArgKind,
    name: &str,
    condition: C,
) -> impl Fn(&T, bool) -> Option<ParseError> + Send + Sync + 'static
where
    T: 'static,
    C: Fn(&T) -> bool + Send + Sync + 'static,
{
    let name = name.to_string();
    move |target: &T, supplied: bool| {
        (!supplied && condition(target)).then(|| {
            ParseError::new(
                ErrorCode::missing_required(kind),
                format!("{} '{name}' is required here", kind.label()),
            )
        })
    }
}

/// Fails with the kind's must-not-be-provided code when the argument is
/// present and `condition` holds for the target.
pub fn forbidden_if<T, C>(
    kind: ArgKind,
    name: &str,
    condition: C,
) -> impl Fn(&T, bool) -> Option<ParseError> + Send + Sync + 'static
where
    T: 'static,
    C: Fn(&T) -> bool + Send + Sync + 'static,
{
    let name = name.to_string();
    move |target: &T, supplied: bool| {
        (supplied && condition(target)).then(|| {
            ParseError::new(
                ErrorCode::must_not_be_provided(kind),
                format!("{} '{name}' is not allowed here", kind.label()),
            )
        })
    }
}

/// Runs every predicate: values first, then options, switches and the
/// multi-value.
pub(crate) fn evaluate<T>(verb: &Verb<T>, target: &T, presence: &Presence) -> Vec<ParseError> {
    let values = verb
        .values
        .iter()
        .enumerate()
        .map(|(index, entry)| (&entry.dependency, index < presence.values_filled));
    let options = verb
        .options
        .iter()
        .zip(&presence.options)
        .map(|(entry, seen)| (&entry.dependency, *seen));
    let switches = verb
        .switches
        .iter()
        .zip(&presence.switches)
        .map(|(entry, seen)| (&entry.dependency, *seen));
    let multi_value = verb
        .multi_value
        .iter()
        .map(|entry| (&entry.dependency, presence.multi_value));

    let errors: Vec<ParseError> = values
        .chain(options)
        .chain(switches)
        .chain(multi_value)
        .filter_map(|(dependency, supplied)| {
            dependency
                .as_ref()
                .and_then(|predicate| predicate(target, supplied))
        })
        .collect();

    trace!(verb = %verb.info.name, failures = errors.len(), "Evaluated dependencies");
    errors
}
