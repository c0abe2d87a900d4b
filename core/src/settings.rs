//! Parser settings: help switches and the name comparer.
//!
//! Settings are plain data and can be kept in a YAML file next to an
//! application's other configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! short_help: "-?"
//! long_help: "--help"
//! case_sensitive: true
//! ```
//!
//! Missing keys fall back to [`ParserSettings::default`].

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SettingsError};

/// Switches that request help, and how names are compared.
///
/// # Examples
///
/// ```
/// use verbline_core::ParserSettings;
///
/// let settings = ParserSettings::default();
/// assert!(settings.is_help("-h"));
/// assert!(settings.is_help("--HELP"));
/// assert!(settings.names_match("Add", "add"));
///
/// let strict = ParserSettings { case_sensitive: true, ..ParserSettings::default() };
/// assert!(!strict.names_match("Add", "add"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Short help switch; `None` disables it.
    pub short_help: Option<String>,
    /// Long help switch; `None` disables it.
    pub long_help: Option<String>,
    /// Compare verb, help, option and switch names case-sensitively.
    pub case_sensitive: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            short_help: Some("-h".to_string()),
            long_help: Some("--help".to_string()),
            case_sensitive: false,
        }
    }
}

impl ParserSettings {
    /// Loads settings from a YAML file and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](SettingsError::IoError) if the file cannot be
    /// read, [`YamlError`](SettingsError::YamlError) if parsing fails, or
    /// [`InvalidHelpSwitch`](SettingsError::InvalidHelpSwitch) if a help
    /// switch is unusable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let settings: Self = serde_yaml::from_reader(reader)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses and validates settings from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Saves the settings as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](SettingsError::IoError) if the file cannot be
    /// written, or [`YamlError`](SettingsError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks that every configured help switch is a usable token.
    pub fn validate(&self) -> Result<()> {
        match self.invalid_help_switch() {
            Some(switch) => Err(SettingsError::InvalidHelpSwitch(switch.to_string())),
            None => Ok(()),
        }
    }

    /// Returns the first help switch that could never match a token.
    pub(crate) fn invalid_help_switch(&self) -> Option<&str> {
        self.help_switches()
            .find(|switch| switch.is_empty() || switch.contains(char::is_whitespace))
    }

    /// Iterates over the enabled help switches.
    pub fn help_switches(&self) -> impl Iterator<Item = &str> {
        self.short_help
            .as_deref()
            .into_iter()
            .chain(self.long_help.as_deref())
    }

    /// Returns `true` if `token` is one of the help switches.
    pub fn is_help(&self, token: &str) -> bool {
        self.help_switches()
            .any(|switch| self.names_match(switch, token))
    }

    /// The configured name comparer.
    ///
    /// Case-insensitive comparison folds both sides with Unicode lowercase
    /// mapping, character by character, without allocating.
    pub fn names_match(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            fold(a).eq(fold(b))
        }
    }
}

/// Per-character lowercase folding shared by matching and validation.
///
/// Unlike `str::to_lowercase` this has no context rules, so a final `Σ`
/// folds to `σ` like any other.
pub(crate) fn fold(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().flat_map(char::to_lowercase)
}
