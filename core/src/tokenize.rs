//! Command-line tokenizer.

/// Splits a parameter string on whitespace, keeping double-quoted runs
/// together.
///
/// Quotes are retained in the resulting tokens; value primitives strip them
/// when they decode string values. A quoted run may start in the middle of
/// a token (`--image-path="C:\My Dumps"` is one token).
///
/// # Examples
///
/// ```
/// use dump_params_core::tokenize;
///
/// let tokens = tokenize(r#"cd F "my disc.bin" 8"#);
/// assert_eq!(tokens, vec!["cd", "F", "\"my disc.bin\"", "8"]);
/// ```
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            current.push(ch);
        } else if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(ch);
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Removes one pair of surrounding double quotes, if present.
pub fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
