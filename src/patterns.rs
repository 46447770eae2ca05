//! Pattern detection: sequential runs, repeats and keyboard walks.

use secrecy::{ExposeSecret, SecretString};

/// Run length at which sequential/repeated characters are flagged.
const MIN_RUN: usize = 3;

/// Physical-keyboard-adjacent sequences, matched as case-insensitive
/// substrings. A static table, not a generative adjacency model.
const KEYBOARD_SEQUENCES: &[&str] = &[
    "qwerty", "ytrewq", "asdfgh", "hgfdsa", "zxcvbn", "nbvcxz", "qazwsx",
    "qwer", "rewq", "asdf", "fdsa", "zxcv", "vcxz", "!@#$%^",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternReport {
    pub has_sequential: bool,
    pub has_repeated: bool,
    pub has_keyboard_pattern: bool,
}

impl PatternReport {
    /// True when any of the three detectors fired.
    pub fn any(&self) -> bool {
        self.has_sequential || self.has_repeated || self.has_keyboard_pattern
    }
}

/// Runs all three detectors over the password. Detection is substring
/// based: a pattern anywhere in the input triggers its flag.
pub fn detect_patterns(password: &SecretString) -> PatternReport {
    let pwd = password.expose_secret();
    PatternReport {
        has_sequential: has_sequential_run(pwd),
        has_repeated: has_repeated_run(pwd),
        has_keyboard_pattern: has_keyboard_sequence(pwd),
    }
}

/// Any run of `MIN_RUN`+ characters with a constant +1 or -1 code-point
/// step, case-insensitive for letters.
fn has_sequential_run(pwd: &str) -> bool {
    let points: Vec<i64> = pwd
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| c as i64)
        .collect();
    if points.len() < MIN_RUN {
        return false;
    }

    for step in [1i64, -1] {
        let mut run = 1;
        for pair in points.windows(2) {
            if pair[1] == pair[0] + step {
                run += 1;
                if run >= MIN_RUN {
                    return true;
                }
            } else {
                run = 1;
            }
        }
    }
    false
}

/// Any single character repeated `MIN_RUN`+ times consecutively.
fn has_repeated_run(pwd: &str) -> bool {
    let mut run = 1;
    let mut prev: Option<char> = None;
    for c in pwd.chars() {
        if Some(c) == prev {
            run += 1;
            if run >= MIN_RUN {
                return true;
            }
        } else {
            run = 1;
        }
        prev = Some(c);
    }
    false
}

fn has_keyboard_sequence(pwd: &str) -> bool {
    let lowered = pwd.to_lowercase();
    KEYBOARD_SEQUENCES
        .iter()
        .any(|sequence| lowered.contains(sequence))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    #[test]
    fn test_ascending_sequence() {
        assert!(detect_patterns(&secret("abcdefgh")).has_sequential);
        assert!(detect_patterns(&secret("x123y")).has_sequential);
    }

    #[test]
    fn test_descending_sequence() {
        assert!(detect_patterns(&secret("cba")).has_sequential);
        assert!(detect_patterns(&secret("pass321word")).has_sequential);
    }

    #[test]
    fn test_sequence_is_case_insensitive() {
        assert!(detect_patterns(&secret("AbC")).has_sequential);
        assert!(detect_patterns(&secret("xYz")).has_sequential);
    }

    #[test]
    fn test_two_char_step_is_not_sequential() {
        let report = detect_patterns(&secret("acegik"));
        assert!(!report.has_sequential);
    }

    #[test]
    fn test_repeated_characters() {
        assert!(detect_patterns(&secret("aaa")).has_repeated);
        assert!(detect_patterns(&secret("passsword")).has_repeated);
        assert!(!detect_patterns(&secret("aabbaabb")).has_repeated);
    }

    #[test]
    fn test_keyboard_walks() {
        assert!(detect_patterns(&secret("qwerty99")).has_keyboard_pattern);
        assert!(detect_patterns(&secret("MyASDFpass")).has_keyboard_pattern);
        assert!(detect_patterns(&secret("xzxcvx")).has_keyboard_pattern);
        assert!(!detect_patterns(&secret("quiet-woods")).has_keyboard_pattern);
    }

    #[test]
    fn test_clean_password() {
        let report = detect_patterns(&secret("R4ndom!Ph5ase"));
        assert!(!report.any());
    }

    #[test]
    fn test_short_input() {
        assert!(!detect_patterns(&secret("ab")).any());
        assert!(!detect_patterns(&secret("")).any());
    }
}
