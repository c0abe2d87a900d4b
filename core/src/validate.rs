//! Build-time validation of verbs and verb sets.
//!
//! Catches programmer mistakes (bad or duplicate names, a verb mixing
//! positional values with a multi-value, names shadowing help switches)
//! before any input is parsed. Parse-time code relies on these checks and
//! never re-validates.
//!
//! Checks come in two layers. [`validate_verb`] runs when a verb is built
//! and only looks at the verb itself. [`validate_verb_against`] needs the
//! settings, since collisions depend on the help switches and the name
//! comparer; it runs for every verb a parser is built with, and from
//! `Verb::check` for programs without verbs.

use std::collections::HashSet;

use crate::error::SchemaError;
use crate::settings::ParserSettings;
use crate::types::{ArgKind, VerbInfo};

/// Validates one verb's names and shape.
///
/// Option and switch names must be unique as written here; uniqueness
/// under the configured comparer is checked by [`validate_verb_against`].
pub(crate) fn validate_verb(verb: &VerbInfo) -> Result<(), SchemaError> {
    for name in verb.names() {
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(SchemaError::EmptyVerbName(name.to_string()));
        }
    }

    let values = verb.args_of(ArgKind::Value).count();
    let multi_values = verb.args_of(ArgKind::MultiValue).count();
    if multi_values > 1 || (multi_values == 1 && values > 0) {
        return Err(SchemaError::ValuesAndMultiValue(verb.name.clone()));
    }

    let mut seen = HashSet::new();
    for arg in verb.args.iter().filter(|arg| arg.kind.is_named()) {
        if arg.short.is_none() && arg.long.is_none() {
            return Err(SchemaError::MissingArgumentName(arg.name.clone()));
        }

        if let Some(short) = &arg.short {
            if !short.starts_with('-')
                || short.starts_with("--")
                || short.len() < 2
                || short.contains(char::is_whitespace)
            {
                return Err(SchemaError::InvalidShortName(short.clone()));
            }
            if !seen.insert(short.as_str()) {
                return Err(SchemaError::DuplicateArgumentName(short.clone()));
            }
        }

        if let Some(long) = &arg.long {
            if !long.starts_with("--") || long.len() < 3 || long.contains(char::is_whitespace) {
                return Err(SchemaError::InvalidLongName(long.clone()));
            }
            if !seen.insert(long.as_str()) {
                return Err(SchemaError::DuplicateArgumentName(long.clone()));
            }
        }
    }

    Ok(())
}

/// Rejects settings whose help switches could never be typed.
pub(crate) fn validate_settings(settings: &ParserSettings) -> Result<(), SchemaError> {
    match settings.invalid_help_switch() {
        Some(switch) => Err(SchemaError::InvalidHelpSwitch(switch.to_string())),
        None => Ok(()),
    }
}

/// Validates one verb's option and switch names under the settings.
///
/// Names must stay distinct under the configured comparer, and none may
/// equal a help switch, or the argument could never be matched.
pub(crate) fn validate_verb_against(
    settings: &ParserSettings,
    verb: &VerbInfo,
) -> Result<(), SchemaError> {
    let mut names: Vec<&str> = Vec::new();

    for arg in verb.args.iter().filter(|arg| arg.kind.is_named()) {
        for name in arg.switch_names() {
            if settings.is_help(name) {
                return Err(SchemaError::ArgumentCollidesWithHelp {
                    verb: verb.name.clone(),
                    name: name.to_string(),
                });
            }
            if names.iter().any(|seen| settings.names_match(seen, name)) {
                return Err(SchemaError::DuplicateArgumentName(name.to_string()));
            }
            names.push(name);
        }
    }

    Ok(())
}

/// Validates a verb set against the parser settings.
///
/// Verb names must be unique under the configured comparer and disjoint
/// from the help switches; every verb must also pass
/// [`validate_verb_against`].
pub(crate) fn validate_verb_set<'a>(
    settings: &ParserSettings,
    verbs: impl Iterator<Item = &'a VerbInfo>,
) -> Result<(), SchemaError> {
    validate_settings(settings)?;

    let mut names: Vec<&str> = Vec::new();
    let mut count = 0usize;

    for verb in verbs {
        count += 1;
        for name in verb.names() {
            if settings.is_help(name) {
                return Err(SchemaError::VerbCollidesWithHelp(name.to_string()));
            }
            if names.iter().any(|seen| settings.names_match(seen, name)) {
                return Err(SchemaError::DuplicateVerb(name.to_string()));
            }
            names.push(name);
        }
        validate_verb_against(settings, verb)?;
    }

    if count == 0 {
        return Err(SchemaError::NoVerbs);
    }

    Ok(())
}
