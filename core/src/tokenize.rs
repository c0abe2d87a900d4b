//! Quote-aware splitting of a raw command line into tokens.
//!
//! The first non-whitespace character of each token decides its closing
//! delimiter: `"`, `'` and `` ` `` close on the same character, anything else
//! closes on whitespace. Quotes never nest and there are no escapes. An
//! unterminated quote runs to the end of the line.

use std::iter::FusedIterator;

/// Splits `line` into tokens lazily.
///
/// The returned iterator borrows from `line` and never allocates.
///
/// # Examples
///
/// ```
/// use verbline_core::tokenize;
///
/// let tokens: Vec<&str> = tokenize(r#"add "buy milk" --tag 'home'"#).collect();
/// assert_eq!(tokens, ["add", "buy milk", "--tag", "home"]);
///
/// assert_eq!(tokenize("   ").count(), 0);
/// ```
pub fn tokenize(line: &str) -> Tokens<'_> {
    Tokens { rest: line }
}

/// Iterator over the tokens of one line. See [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.rest.trim_start();
        let Some(open) = start.chars().next() else {
            self.rest = "";
            return None;
        };

        if is_quote(open) {
            let body = &start[open.len_utf8()..];
            match body.find(open) {
                Some(end) => {
                    // The closing quote may be the final byte; slicing at len is fine.
                    self.rest = &body[end + open.len_utf8()..];
                    Some(&body[..end])
                }
                None => {
                    self.rest = "";
                    Some(body)
                }
            }
        } else {
            let end = start.find(char::is_whitespace).unwrap_or(start.len());
            self.rest = &start[end..];
            Some(&start[..end])
        }
    }
}

impl FusedIterator for Tokens<'_> {}

fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '`')
}
