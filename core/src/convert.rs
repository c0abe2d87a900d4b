//! The conversion envelope shared by every argument kind.
//!
//! A converter turns raw token text into a typed value or a reason string.
//! [`convert`] lifts that reason into a [`ParseError`] carrying the right
//! per-kind code and the raw text, so the classification loop handles every
//! conversion the same way.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::{ErrorCode, ParseError};
use crate::types::ArgKind;

/// Outcome of one converter call: the typed value, or why the text was rejected.
pub type Converted<V> = Result<V, String>;

/// Boxed text converter stored inside a built verb.
pub(crate) type Converter<V> = Box<dyn Fn(&str) -> Converted<V> + Send + Sync>;

/// Runs `converter` on `raw` for the argument `label` of the given kind.
///
/// # Errors
///
/// Returns the kind's conversion-failure code with a message that quotes
/// `raw` and the converter's reason.
///
/// # Examples
///
/// ```
/// use verbline_core::{ArgKind, ErrorCode, convert, from_str};
///
/// let port = convert(ArgKind::Option, "--port", "8080", from_str::<u16>());
/// assert_eq!(port, Ok(8080));
///
/// let err = convert(ArgKind::Option, "--port", "eighty", from_str::<u16>()).unwrap_err();
/// assert_eq!(err.code, ErrorCode::OptionConversionFailure);
/// assert!(err.message.contains("'eighty'"));
/// ```
pub fn convert<V>(
    kind: ArgKind,
    label: &str,
    raw: &str,
    converter: impl Fn(&str) -> Converted<V>,
) -> Result<V, ParseError> {
    converter(raw).map_err(|reason| {
        ParseError::new(
            ErrorCode::conversion_failure(kind),
            format!("invalid value '{raw}' for {} '{label}': {reason}", kind.label()),
        )
    })
}

/// Converter backed by [`FromStr`], reporting the parse error's `Display` text.
pub fn from_str<V>() -> impl Fn(&str) -> Converted<V> + Clone + Send + Sync + 'static
where
    V: FromStr,
    V::Err: Display,
{
    |raw: &str| raw.parse::<V>().map_err(|err| err.to_string())
}

/// Renders a value back to token text; the inverse of [`from_str`] for
/// types whose `Display` and `FromStr` agree.
pub fn to_text<V: Display>(value: &V) -> String {
    value.to_string()
}

/// Identity converter for plain string arguments.
pub fn text() -> impl Fn(&str) -> Converted<String> + Clone + Send + Sync + 'static {
    |raw: &str| Ok(raw.to_string())
}
