//! The classification and assignment loop.
//!
//! One forward pass over the tokens of a single verb. Each token is tested,
//! in order, against the help switches, the option names, the switch names,
//! the next unfilled positional value and finally the multi-value buffer.
//! Per-token anomalies are collected and the scan carries on so that a help
//! switch later in the line still wins; only a trailing option without a
//! value ends the scan early.
//!
//! After the scan every unseen argument gets its default (accumulating all
//! failures). Any error so far returns immediately; otherwise the dependency
//! predicates run against the finished target.

use tracing::{debug, trace};

use crate::dependency;
use crate::error::{ErrorCode, ParseError};
use crate::settings::ParserSettings;
use crate::verb::Verb;

/// Which arguments the token stream supplied.
///
/// Indexed by each kind's position in the verb, not by hashing names.
#[derive(Debug)]
pub(crate) struct Presence {
    pub(crate) options: Vec<bool>,
    pub(crate) switches: Vec<bool>,
    pub(crate) values_filled: usize,
    pub(crate) multi_value: bool,
}

impl Presence {
    fn new<T>(verb: &Verb<T>) -> Self {
        Self {
            options: vec![false; verb.options.len()],
            switches: vec![false; verb.switches.len()],
            values_filled: 0,
            multi_value: false,
        }
    }
}

pub(crate) fn run<T, S>(
    verb: &Verb<T>,
    tokens: &[S],
    settings: &ParserSettings,
) -> Result<T, Vec<ParseError>>
where
    T: Default,
    S: AsRef<str>,
{
    let mut target = T::default();
    let mut presence = Presence::new(verb);
    let mut errors = Vec::new();
    let mut multi_buffer: Vec<&str> = Vec::new();

    let mut iter = tokens.iter().map(AsRef::<str>::as_ref);
    while let Some(token) = iter.next() {
        if settings.is_help(token) {
            debug!(verb = %verb.info.name, "Help requested");
            return Err(vec![ParseError::help_requested()]);
        }

        if let Some(index) = verb.find_option(token, settings) {
            let entry = &verb.options[index];
            let label = verb.arg(entry.arg).display_name();
            let Some(raw) = iter.next() else {
                errors.push(ParseError::new(
                    ErrorCode::UnexpectedEndOfArguments,
                    format!("option '{label}' expects a value"),
                ));
                break;
            };
            if settings.is_help(raw) {
                debug!(verb = %verb.info.name, "Help requested");
                return Err(vec![ParseError::help_requested()]);
            }
            trace!(option = label, value = raw, "Matched option");
            if presence.options[index] {
                errors.push(ParseError::new(
                    ErrorCode::DuplicateOption,
                    format!("option '{label}' given more than once"),
                ));
                continue;
            }
            presence.options[index] = true;
            if let Err(err) = (entry.assign)(&mut target, raw) {
                errors.push(err);
            }
            continue;
        }

        if let Some(index) = verb.find_switch(token, settings) {
            let entry = &verb.switches[index];
            let label = verb.arg(entry.arg).display_name();
            trace!(switch = label, "Matched switch");
            if presence.switches[index] {
                errors.push(ParseError::new(
                    ErrorCode::DuplicateSwitch,
                    format!("switch '{label}' given more than once"),
                ));
                continue;
            }
            presence.switches[index] = true;
            if let Err(err) = (entry.assign)(&mut target, token) {
                errors.push(err);
            }
            continue;
        }

        if let Some(entry) = verb.values.get(presence.values_filled) {
            trace!(value = %verb.arg(entry.arg).name, token, "Matched positional value");
            presence.values_filled += 1;
            if let Err(err) = (entry.assign)(&mut target, token) {
                errors.push(err);
            }
            continue;
        }

        if verb.multi_value.is_some() {
            trace!(token, "Collected multi-value token");
            multi_buffer.push(token);
            continue;
        }

        errors.push(if verb.values.is_empty() {
            ParseError::new(
                ErrorCode::UnexpectedArgument,
                format!("unexpected argument '{token}'"),
            )
        } else {
            ParseError::new(
                ErrorCode::TooManyValues,
                format!(
                    "unexpected extra value '{token}'; '{}' takes {} value(s)",
                    verb.info.name,
                    verb.values.len()
                ),
            )
        });
    }

    assign_defaults(verb, &mut target, &presence, &multi_buffer, &mut errors);
    presence.multi_value = !multi_buffer.is_empty();

    if !errors.is_empty() {
        debug!(verb = %verb.info.name, errors = errors.len(), "Parse failed");
        return Err(errors);
    }

    let errors = dependency::evaluate(verb, &target, &presence);
    if !errors.is_empty() {
        debug!(verb = %verb.info.name, errors = errors.len(), "Dependency checks failed");
        return Err(errors);
    }

    Ok(target)
}

/// Assigns defaults to every argument the scan did not see, and the
/// collected buffer to the multi-value.
fn assign_defaults<T>(
    verb: &Verb<T>,
    target: &mut T,
    presence: &Presence,
    multi_buffer: &[&str],
    errors: &mut Vec<ParseError>,
) {
    let unseen_options = verb
        .options
        .iter()
        .zip(&presence.options)
        .filter(|(_, seen)| !**seen);
    let unseen_switches = verb
        .switches
        .iter()
        .zip(&presence.switches)
        .filter(|(_, seen)| !**seen);

    for (entry, _) in unseen_options.chain(unseen_switches) {
        if let Err(err) = (entry.fallback)(target) {
            errors.push(err);
        }
    }

    for entry in &verb.values[presence.values_filled..] {
        if let Err(err) = (entry.fallback)(target) {
            errors.push(err);
        }
    }

    if let Some(multi) = &verb.multi_value {
        trace!(
            multi_value = %verb.arg(multi.arg).name,
            count = multi_buffer.len(),
            "Assigning collected tokens"
        );
        if let Err(err) = (multi.assign)(target, multi_buffer) {
            errors.push(err);
        }
    }
}
