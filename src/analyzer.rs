//! Password analyzer - orchestrates the entropy, pattern, dictionary and
//! breach checks and blends them into one strength score.

use crate::analysis::{
    AnalysisError, BreachStatus, Criteria, PasswordAnalysis, StrengthRating,
};
use crate::entropy::estimate_entropy;
use crate::patterns::detect_patterns;
use crate::wordlist::contains_dictionary_word;
use secrecy::{ExposeSecret, SecretString};

#[cfg(feature = "breach")]
use crate::breach::BreachClient;
#[cfg(feature = "breach")]
use std::sync::Arc;
#[cfg(feature = "breach")]
use tokio::{sync::Semaphore, task::JoinSet};

/// Length at which the `min_length` criterion is satisfied.
const MIN_LENGTH: usize = 12;

/// Entropy contributes linearly up to this cap, worth `ENTROPY_WEIGHT`
/// points at the cap.
const ENTROPY_CAP_BITS: f64 = 80.0;
const ENTROPY_WEIGHT: f64 = 40.0;
/// Points per satisfied character-class criterion.
const CLASS_WEIGHT: f64 = 7.5;
/// Points for meeting the minimum length.
const LENGTH_WEIGHT: f64 = 15.0;
/// Points each for the pattern, dictionary and sequential criteria.
const HYGIENE_WEIGHT: f64 = 7.5;
/// Penalty applied when the password appears in a known breach; the final
/// score is additionally capped at `BREACH_SCORE_CAP`.
const BREACH_PENALTY: f64 = 40.0;
const BREACH_SCORE_CAP: f64 = 40.0;

/// Maximum breach lookups in flight during batch analysis.
#[cfg(feature = "breach")]
pub const DEFAULT_BREACH_CONCURRENCY: usize = 5;

/// Analyzes a password without consulting the breach service
/// (`breach_status` is `NotChecked`).
///
/// Deterministic: the same input always yields the same record.
///
/// # Errors
/// Returns [`AnalysisError::EmptyPassword`] for empty input.
pub fn analyze_password(password: &SecretString) -> Result<PasswordAnalysis, AnalysisError> {
    analyze_with_breach_status(password, BreachStatus::NotChecked)
}

/// Analyzes a password, folding in a breach status the caller already
/// obtained (or `NotChecked` / `CheckFailed` when it could not).
pub fn analyze_with_breach_status(
    password: &SecretString,
    breach_status: BreachStatus,
) -> Result<PasswordAnalysis, AnalysisError> {
    let estimate = estimate_entropy(password)?;
    let criteria = check_criteria(password);
    let length = password.expose_secret().chars().count();

    let strength_score = strength_score(&criteria, estimate.entropy_bits, &breach_status);
    let strength_rating = StrengthRating::from_score(strength_score);
    let recommendations =
        recommendations(length, estimate.entropy_bits, &criteria, &breach_status);

    Ok(PasswordAnalysis {
        length,
        entropy_bits: estimate.entropy_bits,
        character_pool_size: estimate.character_pool_size,
        crack_time_online: estimate.crack_time_online,
        crack_time_offline: estimate.crack_time_offline,
        criteria,
        breach_status,
        strength_score,
        strength_rating,
        recommendations,
    })
}

/// Analyzes a password including a breach lookup. A failed lookup degrades
/// to `CheckFailed` instead of failing the analysis.
#[cfg(feature = "breach")]
pub async fn analyze_password_online(
    password: &SecretString,
    client: &BreachClient,
) -> Result<PasswordAnalysis, AnalysisError> {
    // Reject empty input before anything is hashed or sent.
    if password.expose_secret().is_empty() {
        return Err(AnalysisError::EmptyPassword);
    }
    let status = client.check(password).await;
    analyze_with_breach_status(password, status)
}

/// Analyzes many passwords, bounding concurrent breach lookups with a
/// semaphore to respect the remote service's implicit rate limits.
///
/// Results come back in input order. A failing entry (empty password,
/// failed lookup) never aborts the rest of the batch.
#[cfg(feature = "breach")]
pub async fn analyze_batch(
    passwords: Vec<SecretString>,
    client: &BreachClient,
    concurrency: usize,
) -> Vec<Result<PasswordAnalysis, AnalysisError>> {
    let total = passwords.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, password) in passwords.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let client = client.clone();
        tasks.spawn(async move {
            if password.expose_secret().is_empty() {
                return (index, Err(AnalysisError::EmptyPassword));
            }
            // The semaphore is never closed, so acquire cannot fail.
            let _permit = semaphore.acquire().await.ok();
            let status = client.check(&password).await;
            drop(_permit);
            (index, analyze_with_breach_status(&password, status))
        });
    }

    let mut slots: Vec<Option<Result<PasswordAnalysis, AnalysisError>>> =
        (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        if let Ok((index, result)) = joined {
            slots[index] = Some(result);
        }
    }
    slots
        .into_iter()
        .map(|slot| slot.unwrap_or(Err(AnalysisError::TaskFailed)))
        .collect()
}

fn check_criteria(password: &SecretString) -> Criteria {
    let pwd = password.expose_secret();
    let report = detect_patterns(password);

    Criteria {
        min_length: pwd.chars().count() >= MIN_LENGTH,
        has_lowercase: pwd.chars().any(|c| c.is_ascii_lowercase()),
        has_uppercase: pwd.chars().any(|c| c.is_ascii_uppercase()),
        has_digits: pwd.chars().any(|c| c.is_ascii_digit()),
        has_symbols: pwd.chars().any(|c| c.is_ascii_punctuation()),
        no_common_patterns: !report.any(),
        not_dictionary_word: !contains_dictionary_word(pwd),
        no_sequential_chars: !report.has_sequential,
    }
}

fn strength_score(criteria: &Criteria, entropy_bits: f64, breach: &BreachStatus) -> u8 {
    let mut score = entropy_bits.min(ENTROPY_CAP_BITS) / ENTROPY_CAP_BITS * ENTROPY_WEIGHT;

    score += f64::from(criteria.character_classes_met()) * CLASS_WEIGHT;
    if criteria.min_length {
        score += LENGTH_WEIGHT;
    }
    for met in [
        criteria.no_common_patterns,
        criteria.not_dictionary_word,
        criteria.no_sequential_chars,
    ] {
        if met {
            score += HYGIENE_WEIGHT;
        }
    }

    // Raw contributions can exceed 100; clamp before the breach penalty so
    // a breached password is capped from a bounded base.
    score = score.min(100.0);

    if matches!(breach, BreachStatus::Found { .. }) {
        score = (score - BREACH_PENALTY).min(BREACH_SCORE_CAP);
    }

    score.clamp(0.0, 100.0).round() as u8
}

/// Rebuilds recommendations from the criteria and breach fields, ordered
/// by decreasing severity: breach, length, missing character classes,
/// patterns, dictionary.
fn recommendations(
    length: usize,
    entropy_bits: f64,
    criteria: &Criteria,
    breach: &BreachStatus,
) -> Vec<String> {
    let mut recs = Vec::new();

    match breach {
        BreachStatus::Found { occurrences } => recs.push(format!(
            "Password found in {occurrences} known data breaches, change it immediately"
        )),
        BreachStatus::CheckFailed { .. } => recs.push(
            "Breach check could not be completed, treat breach status as unknown".to_string(),
        ),
        _ => {}
    }

    if !criteria.min_length {
        if length < 8 {
            recs.push(
                "Password is too short, use at least 8 characters (12 or more recommended)"
                    .to_string(),
            );
        } else {
            recs.push("Increase length to at least 12 characters".to_string());
        }
    }

    if !criteria.has_lowercase {
        recs.push("Add lowercase letters (a-z)".to_string());
    }
    if !criteria.has_uppercase {
        recs.push("Add uppercase letters (A-Z)".to_string());
    }
    if !criteria.has_digits {
        recs.push("Add numbers (0-9)".to_string());
    }
    if !criteria.has_symbols {
        recs.push("Add symbols (!@#$%^&* etc.)".to_string());
    }

    if !criteria.no_common_patterns {
        recs.push("Avoid repeated characters and keyboard walks like 'qwerty'".to_string());
    }
    if !criteria.no_sequential_chars {
        recs.push("Avoid sequential characters such as 'abc' or '123'".to_string());
    }
    if !criteria.not_dictionary_word {
        recs.push("Contains a common password or dictionary word, pick something unique".to_string());
    }

    if entropy_bits < 40.0 {
        recs.push("Entropy is low, make the password longer and more random".to_string());
    }

    if recs.is_empty() {
        recs.push("Password meets security best practices".to_string());
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn setup_with_tempfile(words: &[&str]) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        for word in words {
            writeln!(temp_file, "{}", word).expect("Failed to write");
        }
        temp_file
    }

    fn setup_wordlist() -> NamedTempFile {
        crate::wordlist::reset_wordlist_for_testing();
        let temp_file = setup_with_tempfile(&["password", "123456", "qwerty", "admin"]);
        let _ = crate::wordlist::init_wordlist_from_path(temp_file.path());
        temp_file
    }

    #[test]
    #[serial]
    fn test_empty_password_is_invalid_input() {
        let _wordlist = setup_wordlist();
        assert_eq!(
            analyze_password(&secret("")),
            Err(AnalysisError::EmptyPassword)
        );
    }

    #[test]
    #[serial]
    fn test_analysis_is_deterministic() {
        let _wordlist = setup_wordlist();
        let first = analyze_password(&secret("MyPass123!x")).unwrap();
        let second = analyze_password(&secret("MyPass123!x")).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.breach_status, BreachStatus::NotChecked);
    }

    #[test]
    #[serial]
    fn test_score_stays_in_bounds() {
        let _wordlist = setup_wordlist();
        for pwd in ["a", "password", "MyPass123!", "X9$kL2#vQ8@wZ5!mN3^", "ñ"] {
            let analysis = analyze_password(&secret(pwd)).unwrap();
            assert!(analysis.strength_score <= 100, "score out of bounds for {pwd:?}");
            assert_eq!(
                analysis.strength_rating,
                StrengthRating::from_score(analysis.strength_score)
            );
            assert_eq!(analysis.criteria.entries().len(), 8);
        }
    }

    #[test]
    #[serial]
    fn test_dictionary_password_fails_criterion() {
        let _wordlist = setup_wordlist();
        let analysis = analyze_password(&secret("password")).unwrap();
        assert!(!analysis.criteria.not_dictionary_word);
        assert!(analysis.strength_score < 50, "got {}", analysis.strength_score);
        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r.contains("common password")));
    }

    #[test]
    #[serial]
    fn test_sequential_password_fails_criterion() {
        let _wordlist = setup_wordlist();
        let analysis = analyze_password(&secret("abcdefgh")).unwrap();
        assert!(!analysis.criteria.no_sequential_chars);
        assert!(!analysis.criteria.no_common_patterns);
    }

    #[test]
    #[serial]
    fn test_strong_password_rates_very_strong() {
        let _wordlist = setup_wordlist();
        let analysis = analyze_password(&secret("X9$kL2#vQ8@wZ5!mN3^")).unwrap();
        assert!(analysis.strength_score >= 90, "got {}", analysis.strength_score);
        assert_eq!(analysis.strength_rating, StrengthRating::VeryStrong);
        assert_eq!(
            analysis.recommendations,
            vec!["Password meets security best practices".to_string()]
        );
    }

    #[test]
    #[serial]
    fn test_breached_password_never_rates_above_cap() {
        let _wordlist = setup_wordlist();
        // High entropy, every criterion met, but breached.
        let analysis = analyze_with_breach_status(
            &secret("X9$kL2#vQ8@wZ5!mN3^"),
            BreachStatus::Found { occurrences: 9_545_824 },
        )
        .unwrap();
        assert!(analysis.strength_score <= 40, "got {}", analysis.strength_score);
        assert!(matches!(
            analysis.strength_rating,
            StrengthRating::Weak | StrengthRating::Moderate
        ));
        assert_eq!(
            analysis.breach_status,
            BreachStatus::Found { occurrences: 9_545_824 }
        );
        // Breach recommendation carries the exact count and comes first.
        assert!(analysis.recommendations[0].contains("9545824"));
    }

    #[test]
    #[serial]
    fn test_check_failed_is_not_treated_as_clean() {
        let _wordlist = setup_wordlist();
        let analysis = analyze_with_breach_status(
            &secret("MyPass123!x"),
            BreachStatus::CheckFailed {
                reason: "request timed out".to_string(),
            },
        )
        .unwrap();
        assert!(matches!(
            analysis.breach_status,
            BreachStatus::CheckFailed { .. }
        ));
        // No penalty, but the uncertainty is surfaced.
        assert!(analysis.recommendations[0].contains("could not be completed"));
    }

    #[test]
    #[serial]
    fn test_missing_class_recommendations_in_severity_order() {
        let _wordlist = setup_wordlist();
        let analysis = analyze_password(&secret("mmqqwwrrttyy")).unwrap();
        let joined = analysis.recommendations.join("\n");
        let upper = joined.find("uppercase").expect("uppercase hint");
        let digits = joined.find("numbers").expect("digits hint");
        let symbols = joined.find("symbols").expect("symbols hint");
        assert!(upper < digits && digits < symbols);
    }
}
