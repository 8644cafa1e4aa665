//! Clock values as minute offsets. Hours past 24 are kept as-is so overnight
//! trips sort after the rest of their service day.

pub type Minutes = u32;

fn clock_parts(text: &str) -> Option<(u32, u32)> {
    let parts = text
        .split(':')
        .map(|part| part.parse::<u32>().ok())
        .collect::<Option<Vec<u32>>>()?;
    match parts.as_slice() {
        [hours, minutes, ..] => Some((*hours, *minutes)),
        _ => None,
    }
}

/// `H:MM` or `HH:MM[:SS]` to minutes. None for anything that does not split
/// into at least two numeric parts.
pub fn parse_time(text: &str) -> Option<Minutes> {
    clock_parts(text).map(|(hours, minutes)| hours * 60 + minutes)
}

/// Zero-padded `HH:MM` display form, dropping a seconds part. Empty string
/// for malformed input.
pub fn format_time(text: &str) -> String {
    match clock_parts(text) {
        Some((hours, minutes)) => format!("{hours:02}:{minutes:02}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_minutes_since_midnight() {
        assert_eq!(parse_time("8:05"), Some(485));
        assert_eq!(parse_time("08:05:30"), Some(485));
        assert_eq!(parse_time("00:00"), Some(0));
    }

    #[test]
    fn keeps_hours_past_twenty_four() {
        assert_eq!(parse_time("25:10"), Some(1510));
    }

    #[test]
    fn rejects_short_or_non_numeric_input() {
        assert_eq!(parse_time("8"), None);
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("a:30"), None);
        assert_eq!(parse_time("12:xx"), None);
        assert_eq!(parse_time("12:30:ss"), None);
    }

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_time("8:5"), "08:05");
        assert_eq!(format_time("12:30:45"), "12:30");
        assert_eq!(format_time("26:03"), "26:03");
    }

    #[test]
    fn formats_malformed_input_as_empty() {
        assert_eq!(format_time("8"), "");
        assert_eq!(format_time("x:y"), "");
        assert_eq!(format_time(""), "");
    }
}
