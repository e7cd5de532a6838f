//! Positional argument substitution.
//!
//! [`format_message`] first tries a strict `MessageFormat`-style pass
//! (`{0}`, `{1,number}`, `''` and `'quoted'` literals). Patterns that fail it
//! fall back to a literal `{i}` replacement, so a malformed translation still
//! renders.

use thiserror::Error;

/// Why the strict pass rejected a pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Unmatched '{{' at byte {position}")]
    UnclosedPlaceholder { position: usize },

    #[error("Unmatched '}}' at byte {position}")]
    UnmatchedClose { position: usize },

    #[error("Invalid argument index '{index}'")]
    InvalidIndex { index: String },

    #[error("Unterminated quote starting at byte {position}")]
    UnterminatedQuote { position: usize },
}

/// Substitutes `args` into `pattern`; never fails.
#[must_use]
pub fn format_message(pattern: &str, args: &[String]) -> String {
    if args.is_empty() {
        return pattern.to_string();
    }
    match try_format(pattern, args) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("Falling back to plain substitution for {pattern:?}: {e}");
            replace_placeholders(pattern, args)
        }
    }
}

/// Strict pass.
///
/// A placeholder is `{index}` or `{index,type[,style]}`; the type and style
/// are accepted but the argument is inserted as given. Placeholders beyond
/// `args` are kept verbatim. A single quote starts a literal section, and
/// `''` is one quote.
///
/// # Errors
/// Returns an error on unbalanced braces or quotes or a non-numeric index.
pub fn try_format(pattern: &str, args: &[String]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '\'' => {
                if chars.next_if(|&(_, next)| next == '\'').is_some() {
                    out.push('\'');
                    continue;
                }
                let mut closed = false;
                while let Some((_, quoted)) = chars.next() {
                    if quoted != '\'' {
                        out.push(quoted);
                    } else if chars.next_if(|&(_, next)| next == '\'').is_some() {
                        out.push('\'');
                    } else {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(FormatError::UnterminatedQuote { position });
                }
            }
            '{' => {
                let mut placeholder = String::new();
                let mut depth = 1;
                for (_, inner) in chars.by_ref() {
                    match inner {
                        '{' => depth += 1,
                        '}' => depth -= 1,
                        _ => {}
                    }
                    if depth == 0 {
                        break;
                    }
                    placeholder.push(inner);
                }
                if depth != 0 {
                    return Err(FormatError::UnclosedPlaceholder { position });
                }
                out.push_str(&render_placeholder(&placeholder, args)?);
            }
            '}' => return Err(FormatError::UnmatchedClose { position }),
            c => out.push(c),
        }
    }
    Ok(out)
}

fn render_placeholder(placeholder: &str, args: &[String]) -> Result<String, FormatError> {
    let index_text = placeholder.split(',').next().unwrap_or_default().trim();
    let index: usize = index_text
        .parse()
        .map_err(|_| FormatError::InvalidIndex { index: index_text.to_string() })?;
    Ok(args.get(index).cloned().unwrap_or_else(|| format!("{{{placeholder}}}")))
}

/// Fallback pass: literal `{i}` → `args[i]`.
#[must_use]
pub fn replace_placeholders(pattern: &str, args: &[String]) -> String {
    args.iter()
        .enumerate()
        .fold(pattern.to_string(), |text, (i, arg)| text.replace(&format!("{{{i}}}"), arg))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[rstest]
    #[case::simple("Hello, {0}!", &["Ana"], "Hello, Ana!")]
    #[case::reordered("{1} {0}", &["a", "b"], "b a")]
    #[case::typed("{0,number} items", &["3"], "3 items")]
    #[case::spaced("{ 0 }", &["x"], "x")]
    #[case::escaped_quote("It''s {0}", &["here"], "It's here")]
    #[case::quoted_braces("'{0}' is {0}", &["x"], "{0} is x")]
    #[case::missing_arg("{0} and {1}", &["a"], "a and {1}")]
    fn strict_format(#[case] pattern: &str, #[case] values: &[&str], #[case] expected: &str) {
        assert_eq!(try_format(pattern, &args(values)).unwrap(), expected);
    }

    #[rstest]
    #[case::unclosed("Hello {0", FormatError::UnclosedPlaceholder { position: 6 })]
    #[case::stray_close("a } b", FormatError::UnmatchedClose { position: 2 })]
    #[case::bad_index("{name}", FormatError::InvalidIndex { index: "name".into() })]
    #[case::open_quote("it's {0}", FormatError::UnterminatedQuote { position: 2 })]
    fn strict_format_errors(#[case] pattern: &str, #[case] expected: FormatError) {
        assert_eq!(try_format(pattern, &args(&["x"])).unwrap_err(), expected);
    }

    #[rstest]
    #[case::strict_ok("Hi {0}", "Hi Ana")]
    #[case::apostrophe_falls_back("it's {0}", "it's Ana")]
    #[case::named_falls_back("{name} {0}", "{name} Ana")]
    fn format_message_falls_back(#[case] pattern: &str, #[case] expected: &str) {
        assert_eq!(format_message(pattern, &args(&["Ana"])), expected);
    }

    #[test]
    fn no_args_returns_pattern_untouched() {
        assert_eq!(format_message("it's {0}", &[]), "it's {0}");
    }
}
