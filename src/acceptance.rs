use std::sync::LazyLock;

use regex::Regex;

/// Delimiter used when none is configured.
pub const DEFAULT_DELIMITER: char = 'x';

static DEFAULT_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| pattern(DEFAULT_DELIMITER));

fn pattern(delimiter: char) -> Result<Regex, regex::Error> {
    let delimiter = regex::escape(delimiter.encode_utf8(&mut [0; 4]));
    Regex::new(&format!("^[01]+{delimiter}[01]+$"))
}

/// Returns true if `text` is one or more binary digits, the default
/// delimiter, and one or more binary digits, with nothing else around them.
pub fn is_accepted(text: &str) -> bool {
    match &*DEFAULT_PATTERN {
        Ok(re) => re.is_match(text),
        Err(_) => false,
    }
}

/// Same as [`is_accepted`] for an arbitrary delimiter.
pub fn is_accepted_with(text: &str, delimiter: char) -> bool {
    if delimiter == DEFAULT_DELIMITER {
        return is_accepted(text);
    }
    pattern(delimiter).is_ok_and(|re| re.is_match(text))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn binary_delim_binary_is_accepted(a in "[01]{1,40}", b in "[01]{1,40}") {
            let text = format!("{a}x{b}");
            prop_assert!(is_accepted(&text));
        }

        #[test]
        fn missing_delimiter_is_rejected(a in "[01]{0,40}") {
            prop_assert!(!is_accepted(&a));
        }

        #[test]
        fn non_binary_digit_is_rejected(
            a in "[01]{0,10}",
            bad in "[2-9]",
            b in "[01]{0,10}",
            c in "[01]{1,10}",
        ) {
            let text = format!("{a}{bad}{b}x{c}");
            prop_assert!(!is_accepted(&text));
        }
    }
}
