//! Password strength analysis library
//!
//! This library analyzes passwords for strength: entropy estimation,
//! pattern and dictionary detection, an optional k-anonymity breach
//! lookup, and a blended 0-100 score with actionable recommendations.
//! It also generates cryptographically secure random passwords.
//!
//! # Features
//!
//! - `breach` (default): Enables the async breach lookup against the
//!   HIBP range API
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `SECUREPASS_WORDLIST_PATH`: Custom path to the common-password
//!   wordlist (default: `./assets/common-passwords.txt`)
//!
//! # Example
//!
//! ```rust,no_run
//! use securepass::{init_wordlist, analyze_password};
//! use secrecy::SecretString;
//!
//! // Initialize the wordlist (call once at startup)
//! init_wordlist().expect("Failed to load wordlist");
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! let analysis = analyze_password(&password)?;
//!
//! println!("Score: {}/100 ({})", analysis.strength_score, analysis.strength_rating);
//! for recommendation in &analysis.recommendations {
//!     println!("- {recommendation}");
//! }
//! # Ok::<(), securepass::AnalysisError>(())
//! ```

// Internal modules
mod analysis;
mod analyzer;
#[cfg(feature = "breach")]
mod breach;
mod entropy;
mod generator;
mod patterns;
mod wordlist;

// Public API
pub use analysis::{
    AnalysisError, BreachStatus, CrackTime, Criteria, PasswordAnalysis, StrengthRating,
};
pub use analyzer::{analyze_password, analyze_with_breach_status};
pub use entropy::{estimate_entropy, EntropyEstimate};
pub use generator::{generate_password, GeneratorError, GeneratorOptions};
pub use patterns::{detect_patterns, PatternReport};
pub use wordlist::{
    contains_dictionary_word, get_wordlist, get_wordlist_path, init_wordlist,
    init_wordlist_from_path, WordlistError,
};

#[cfg(feature = "breach")]
pub use analyzer::{analyze_batch, analyze_password_online, DEFAULT_BREACH_CONCURRENCY};
#[cfg(feature = "breach")]
pub use breach::{BreachClient, BreachError};
