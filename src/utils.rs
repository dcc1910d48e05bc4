use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use nu_ansi_term::Color::Yellow;

/// Date pattern tokens and their chrono equivalents, longest first so that
/// `yyyy` wins over `yy` and `MMMM` over `MM`.
const PATTERN_TOKENS: &[(&str, &str)] = &[
    ("yyyy", "%Y"),
    ("yy", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("dd", "%d"),
    ("d", "%-d"),
    ("EEEE", "%A"),
    ("EEE", "%a"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%H"),
    ("h", "%-H"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("SSS", "%3f"),
    ("a", "%p"),
];

/// Translates a date pattern (`yyyy/MM/dd`, `hh:mm:ss`, ...) into a chrono
/// format string.
///
/// Text between single quotes is copied literally (`''` yields a quote),
/// unknown characters are kept as they are.
///
/// # Examples
///
/// ```
/// use tmaker::utils::translate_pattern;
///
/// assert_eq!(translate_pattern("yyyy/MM/dd"), "%Y/%m/%d");
/// assert_eq!(translate_pattern("hh:mm 'at' d"), "%H:%M at %-d");
/// ```
pub fn translate_pattern(pattern: &str) -> String {
    let mut result = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if c == '\'' {
            let quoted = &rest[1..];
            match quoted.find('\'') {
                Some(0) => {
                    result.push('\'');
                    rest = &quoted[1..];
                }
                Some(end) => {
                    push_literal(&mut result, &quoted[..end]);
                    rest = &quoted[end + 1..];
                }
                None => {
                    push_literal(&mut result, quoted);
                    rest = "";
                }
            }
            continue;
        }

        match PATTERN_TOKENS
            .iter()
            .find(|(token, _)| rest.starts_with(token))
        {
            Some((token, spec)) => {
                result.push_str(spec);
                rest = &rest[token.len()..];
            }
            None => {
                push_literal(&mut result, &rest[..c.len_utf8()]);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    result
}

fn push_literal(target: &mut String, text: &str) {
    for c in text.chars() {
        if c == '%' {
            target.push_str("%%");
        } else {
            target.push(c);
        }
    }
}

/// Safely formats a date using the provided chrono format string.
/// If the format string is invalid, a warning is printed and the ISO-like
/// `%Y-%m-%d %H:%M:%S` layout is used instead.
///
/// # Arguments
///
/// * `dt` - The date to format
/// * `format` - The chrono format string
///
/// # Returns
///
/// A string containing the formatted date
pub fn safe_time_format(dt: &NaiveDateTime, format: &str) -> String {
    let items: Vec<_> = StrftimeItems::new(format).collect();

    if items.iter().any(|item| matches!(item, Item::Error)) {
        eprintln!(
            "{}",
            Yellow.paint(format!(
                "WARNING: Invalid time format specified \"{}\"",
                format
            ))
        );
        return dt.format("%Y-%m-%d %H:%M:%S").to_string();
    }

    dt.format_with_items(items.into_iter()).to_string()
}

/// Formats a date with a date pattern such as `yyyy/MM/dd`.
pub fn format_pattern(dt: &NaiveDateTime, pattern: &str) -> String {
    safe_time_format(dt, &translate_pattern(pattern))
}

/// Returns the first line of a (possibly multiline) message.
pub fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(15, 7, 42, 250)
            .unwrap()
    }

    #[test]
    fn test_translate_common_tokens() {
        assert_eq!(translate_pattern("yyyy/MM/dd"), "%Y/%m/%d");
        assert_eq!(translate_pattern("hh:mm:ss"), "%H:%M:%S");
        assert_eq!(translate_pattern("d.M.yy"), "%-d.%-m.%y");
    }

    #[test]
    fn test_translate_escapes_percent() {
        assert_eq!(translate_pattern("100% mm"), "100%% %M");
    }

    #[test]
    fn test_translate_quoted_literals() {
        assert_eq!(translate_pattern("'day' dd"), "day %d");
        assert_eq!(translate_pattern("hh''mm"), "%H'%M");
        assert_eq!(translate_pattern("'unterminated mm"), "unterminated mm");
    }

    #[test]
    fn test_format_pattern() {
        assert_eq!(format_pattern(&sample(), "yyyy/MM/dd"), "2024/03/09");
        assert_eq!(format_pattern(&sample(), "hh:mm:ss.SSS"), "15:07:42.250");
        assert_eq!(format_pattern(&sample(), "EEE d MMM"), "Sat 9 Mar");
    }

    #[test]
    fn test_safe_time_format_invalid_falls_back() {
        assert_eq!(safe_time_format(&sample(), "%Q"), "2024-03-09 15:07:42");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("bad indentation\n at line 2"), "bad indentation");
        assert_eq!(first_line(""), "");
    }
}
