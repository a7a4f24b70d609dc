//! Formatting helpers shared by the report sections.

/// Width of the key column, including the colon.
const KEY_WIDTH: usize = 16;

/// Indentation of section entries.
pub const ENTRY_INDENT: &str = "  ";

/// Indentation of block bodies beneath their header.
pub const BODY_INDENT: &str = "      ";

/// A `key: value` line aligned to the key column.
pub fn key_value_line(key: &str, value: impl std::fmt::Display) -> String {
    let key = format!("{key}:");
    format!("{ENTRY_INDENT}{key:<KEY_WIDTH$}{value}")
}

/// Prefix every line of `text`; empty text yields a single `(empty)` line.
pub fn indented_lines(text: &str, prefix: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![format!("{prefix}(empty)")];
    }
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect()
}

/// Format a token count with thousands separators.
///
/// Examples:
/// - `format_tokens(0)` → "0"
/// - `format_tokens(1234)` → "1,234"
/// - `format_tokens(1234567)` → "1,234,567"
pub fn format_tokens(tokens: u64) -> String {
    let digits = tokens.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_tokens_zero() {
        assert_eq!(format_tokens(0), "0");
    }

    #[test]
    fn format_tokens_small_value() {
        assert_eq!(format_tokens(123), "123");
    }

    #[test]
    fn format_tokens_thousands() {
        assert_eq!(format_tokens(13370), "13,370");
    }

    #[test]
    fn format_tokens_millions() {
        assert_eq!(format_tokens(1234567), "1,234,567");
    }

    #[test]
    fn key_value_line_aligns_values() {
        assert_eq!(key_value_line("model", "m"), "  model:          m");
        assert_eq!(key_value_line("cache creation", 5), "  cache creation: 5");
    }

    #[test]
    fn indented_lines_prefixes_each_line() {
        assert_eq!(
            indented_lines("a\n\nb", "    "),
            vec!["    a".to_string(), String::new(), "    b".to_string()]
        );
        assert_eq!(indented_lines("", "  "), vec!["  (empty)".to_string()]);
    }
}
