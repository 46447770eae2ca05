//! Cryptographically secure password generation.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;
use secrecy::SecretString;
use thiserror::Error;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
/// Characters easily confused with one another.
const AMBIGUOUS: &str = "0O1lI";

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("password length must be between {MIN_LENGTH} and {MAX_LENGTH}")]
    InvalidLength,
    #[error("at least one character class must be enabled")]
    EmptyCharacterPool,
}

#[derive(Debug, Clone, Copy)]
pub struct GeneratorOptions {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub avoid_ambiguous: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 16,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
            avoid_ambiguous: false,
        }
    }
}

/// Generates a random password from the OS CSPRNG.
///
/// Guarantees at least one character from every enabled class; the final
/// order is shuffled so class-guaranteed characters do not cluster at the
/// front.
pub fn generate_password(options: &GeneratorOptions) -> Result<SecretString, GeneratorError> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&options.length) {
        return Err(GeneratorError::InvalidLength);
    }

    let selected = [
        (options.lowercase, LOWERCASE),
        (options.uppercase, UPPERCASE),
        (options.digits, DIGITS),
        (options.symbols, SYMBOLS),
    ];
    let classes: Vec<Vec<char>> = selected
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, set)| {
            set.chars()
                .filter(|c| !options.avoid_ambiguous || !AMBIGUOUS.contains(*c))
                .collect()
        })
        .collect();

    if classes.is_empty() {
        return Err(GeneratorError::EmptyCharacterPool);
    }

    let pool: Vec<char> = classes.iter().flatten().copied().collect();
    let mut rng = OsRng;
    let mut chars: Vec<char> = Vec::with_capacity(options.length);

    for class in &classes {
        chars.push(class[rng.gen_range(0..class.len())]);
    }
    while chars.len() < options.length {
        chars.push(pool[rng.gen_range(0..pool.len())]);
    }
    chars.shuffle(&mut rng);

    Ok(SecretString::new(chars.into_iter().collect::<String>().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_length() {
        let password = generate_password(&GeneratorOptions::default()).unwrap();
        assert_eq!(password.expose_secret().chars().count(), 16);
    }

    #[test]
    fn test_every_enabled_class_is_represented() {
        let password = generate_password(&GeneratorOptions::default()).unwrap();
        let pwd = password.expose_secret();
        assert!(pwd.chars().any(|c| c.is_ascii_lowercase()));
        assert!(pwd.chars().any(|c| c.is_ascii_uppercase()));
        assert!(pwd.chars().any(|c| c.is_ascii_digit()));
        assert!(pwd.chars().any(|c| c.is_ascii_punctuation()));
    }

    #[test]
    fn test_disabled_classes_are_excluded() {
        let options = GeneratorOptions {
            symbols: false,
            digits: false,
            ..Default::default()
        };
        let password = generate_password(&options).unwrap();
        let pwd = password.expose_secret();
        assert!(pwd.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_avoid_ambiguous_characters() {
        let options = GeneratorOptions {
            length: 64,
            avoid_ambiguous: true,
            ..Default::default()
        };
        let password = generate_password(&options).unwrap();
        assert!(password
            .expose_secret()
            .chars()
            .all(|c| !AMBIGUOUS.contains(c)));
    }

    #[test]
    fn test_length_bounds() {
        let too_short = GeneratorOptions {
            length: 7,
            ..Default::default()
        };
        assert!(matches!(
            generate_password(&too_short),
            Err(GeneratorError::InvalidLength)
        ));

        let too_long = GeneratorOptions {
            length: 129,
            ..Default::default()
        };
        assert!(matches!(
            generate_password(&too_long),
            Err(GeneratorError::InvalidLength)
        ));
    }

    #[test]
    fn test_no_enabled_classes_is_an_error() {
        let options = GeneratorOptions {
            lowercase: false,
            uppercase: false,
            digits: false,
            symbols: false,
            ..Default::default()
        };
        assert!(matches!(
            generate_password(&options),
            Err(GeneratorError::EmptyCharacterPool)
        ));
    }
}
