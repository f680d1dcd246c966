// Input-case mode and first-character case helpers.
//
// Grammars are authored over lower-cased surface forms. In `Cased` mode a
// grammar additionally accepts variants whose first character is uppercase
// ("Doce Dólares"); in `LowerCased` mode such input simply finds no path.

/// Casing mode a grammar is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputCase {
    /// Input is expected fully lower-cased; capitalized words do not match.
    #[default]
    LowerCased,
    /// Capitalized variants (first character uppercased) are also accepted.
    Cased,
}

/// Uppercase a single character, taking the first scalar of a multi-char
/// expansion. Sufficient for the Latin-script vocabularies used here
/// (e.g. 'd' -> 'D', 'é' -> 'É').
pub fn simple_upper(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

/// Lowercase counterpart of [`simple_upper`].
pub fn simple_lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Return the string with its first character uppercased, or `None` if the
/// first character has no distinct uppercase form (already capitalized,
/// digit, punctuation, empty).
pub fn capitalize_first(s: &str) -> Option<String> {
    let mut chars = s.chars();
    let first = chars.next()?;
    let upper = simple_upper(first);
    if upper == first {
        return None;
    }
    let mut out = String::with_capacity(s.len());
    out.push(upper);
    out.push_str(chars.as_str());
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_and_lower() {
        assert_eq!(simple_upper('d'), 'D');
        assert_eq!(simple_upper('é'), 'É');
        assert_eq!(simple_lower('D'), 'd');
        assert_eq!(simple_lower('Ó'), 'ó');
        assert_eq!(simple_upper('$'), '$');
    }

    #[test]
    fn capitalize_first_basic() {
        assert_eq!(capitalize_first("dólar").as_deref(), Some("Dólar"));
        assert_eq!(capitalize_first("euro").as_deref(), Some("Euro"));
    }

    #[test]
    fn capitalize_first_no_change() {
        assert_eq!(capitalize_first("Dólar"), None);
        assert_eq!(capitalize_first("$"), None);
        assert_eq!(capitalize_first(""), None);
    }

    #[test]
    fn input_case_default() {
        assert_eq!(InputCase::default(), InputCase::LowerCased);
    }
}
