//! Analysis result types.
//!
//! `PasswordAnalysis` is the immutable record produced once per input
//! password and handed to callers (formatters, exporters, batch layers).

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("analysis task failed to complete")]
    TaskFailed,
}

/// Strength tier, a pure function of the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthRating {
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl StrengthRating {
    /// Maps a 0-100 score to its tier.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => StrengthRating::Weak,
            40..=69 => StrengthRating::Moderate,
            70..=89 => StrengthRating::Strong,
            _ => StrengthRating::VeryStrong,
        }
    }
}

impl fmt::Display for StrengthRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrengthRating::Weak => "WEAK",
            StrengthRating::Moderate => "MODERATE",
            StrengthRating::Strong => "STRONG",
            StrengthRating::VeryStrong => "VERY_STRONG",
        };
        f.write_str(label)
    }
}

/// Estimated time to exhaust the search space at a fixed guess rate.
///
/// Saturates to `EffectivelyInfinite` instead of overflowing once entropy
/// passes the practical threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrackTime {
    Seconds(f64),
    EffectivelyInfinite,
}

impl fmt::Display for CrackTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrackTime::EffectivelyInfinite => f.write_str("effectively uncrackable"),
            CrackTime::Seconds(secs) => f.write_str(&format_seconds(*secs)),
        }
    }
}

impl Serialize for CrackTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn format_seconds(seconds: f64) -> String {
    if seconds < 0.001 {
        "instant".to_string()
    } else if seconds < 1.0 {
        format!("{seconds:.3} seconds")
    } else if seconds < 60.0 {
        format!("{seconds:.1} seconds")
    } else if seconds < 3_600.0 {
        format!("{:.1} minutes", seconds / 60.0)
    } else if seconds < 86_400.0 {
        format!("{:.1} hours", seconds / 3_600.0)
    } else if seconds < 604_800.0 {
        format!("{:.1} days", seconds / 86_400.0)
    } else if seconds < 2_592_000.0 {
        format!("{:.1} weeks", seconds / 604_800.0)
    } else if seconds < 31_536_000.0 {
        format!("{:.1} months", seconds / 2_592_000.0)
    } else if seconds < 3_153_600_000.0 {
        format!("{:.1} years", seconds / 31_536_000.0)
    } else if seconds < 31_536_000_000.0 {
        format!("{:.1} centuries", seconds / 3_153_600_000.0)
    } else {
        format!("{:.1} millennia", seconds / 31_536_000_000.0)
    }
}

/// Outcome of the breach lookup.
///
/// `CheckFailed` is deliberately distinct from `Clean`: absence of evidence
/// must never read as confirmed-clean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BreachStatus {
    NotChecked,
    CheckFailed { reason: String },
    Clean,
    Found { occurrences: u64 },
}

/// The eight named boolean checks, each computed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Criteria {
    pub min_length: bool,
    pub has_lowercase: bool,
    pub has_uppercase: bool,
    pub has_digits: bool,
    pub has_symbols: bool,
    pub no_common_patterns: bool,
    pub not_dictionary_word: bool,
    pub no_sequential_chars: bool,
}

impl Criteria {
    pub const COUNT: usize = 8;

    /// Named view over all entries, in declaration order.
    pub fn entries(&self) -> [(&'static str, bool); Self::COUNT] {
        [
            ("min_length", self.min_length),
            ("has_lowercase", self.has_lowercase),
            ("has_uppercase", self.has_uppercase),
            ("has_digits", self.has_digits),
            ("has_symbols", self.has_symbols),
            ("no_common_patterns", self.no_common_patterns),
            ("not_dictionary_word", self.not_dictionary_word),
            ("no_sequential_chars", self.no_sequential_chars),
        ]
    }

    pub(crate) fn character_classes_met(&self) -> u32 {
        [
            self.has_lowercase,
            self.has_uppercase,
            self.has_digits,
            self.has_symbols,
        ]
        .iter()
        .filter(|&&met| met)
        .count() as u32
    }
}

/// Complete analysis of a single password.
///
/// Created once per `analyze_*` call and never mutated; the raw password is
/// not retained anywhere in the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordAnalysis {
    pub length: usize,
    pub entropy_bits: f64,
    pub character_pool_size: usize,
    pub crack_time_online: CrackTime,
    pub crack_time_offline: CrackTime,
    pub criteria: Criteria,
    pub breach_status: BreachStatus,
    pub strength_score: u8,
    pub strength_rating: StrengthRating,
    pub recommendations: Vec<String>,
}

impl PasswordAnalysis {
    /// Pretty JSON rendering for the export layer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Column names matching [`Self::to_csv_row`].
    pub fn csv_header() -> [&'static str; 19] {
        [
            "strength_score",
            "strength_rating",
            "length",
            "entropy_bits",
            "character_pool_size",
            "min_length",
            "has_lowercase",
            "has_uppercase",
            "has_digits",
            "has_symbols",
            "no_common_patterns",
            "not_dictionary_word",
            "no_sequential_chars",
            "breach_checked",
            "breached",
            "breach_count",
            "breach_error",
            "crack_time_online",
            "crack_time_offline",
        ]
    }

    /// Flat CSV row for the export layer.
    pub fn to_csv_row(&self) -> Vec<String> {
        let (checked, found, count, error) = match &self.breach_status {
            BreachStatus::NotChecked => (false, false, 0, String::new()),
            BreachStatus::CheckFailed { reason } => (false, false, 0, reason.clone()),
            BreachStatus::Clean => (true, false, 0, String::new()),
            BreachStatus::Found { occurrences } => (true, true, *occurrences, String::new()),
        };
        let mut row = vec![
            self.strength_score.to_string(),
            self.strength_rating.to_string(),
            self.length.to_string(),
            format!("{:.2}", self.entropy_bits),
            self.character_pool_size.to_string(),
        ];
        row.extend(self.criteria.entries().map(|(_, met)| met.to_string()));
        row.extend([
            checked.to_string(),
            found.to_string(),
            count.to_string(),
            error,
            self.crack_time_online.to_string(),
            self.crack_time_offline.to_string(),
        ]);
        row
    }
}
