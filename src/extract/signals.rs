//! Fixed-vocabulary signal detection and sentiment scoring over body text.

use regex::Regex;

use crate::models::{ContentSignal, SignalKind};

/// Persuasion words scanned for in article bodies.
pub const POWER_WORDS: [&str; 14] = [
    "proven",
    "guaranteed",
    "exclusive",
    "limited",
    "secret",
    "amazing",
    "revolutionary",
    "breakthrough",
    "discover",
    "transform",
    "ultimate",
    "essential",
    "powerful",
    "effective",
];

/// Call-to-action phrases scanned for in article bodies.
pub const CTA_PHRASES: [&str; 9] = [
    "click here",
    "learn more",
    "get started",
    "buy now",
    "shop now",
    "sign up",
    "subscribe",
    "download",
    "try now",
];

/// Social-proof patterns; every match is recorded as an occurrence.
const SOCIAL_PROOF_PATTERNS: [&str; 5] = [
    r"\d+\s+(?:people|users|customers)",
    r"testimonial",
    r"review",
    r"rated",
    r"trusted by",
];

const POSITIVE_WORDS: [&str; 20] = [
    "good", "great", "best", "healthy", "boost", "improve", "benefit", "energy", "strong",
    "effective", "easy", "natural", "safe", "support", "gain", "happy", "love", "better",
    "success", "vital",
];

const NEGATIVE_WORDS: [&str; 20] = [
    "bad", "worst", "risk", "danger", "harm", "pain", "avoid", "toxic", "fail", "loss",
    "problem", "fear", "sick", "stress", "damage", "warning", "weak", "poor", "wrong",
    "chronic",
];

/// Power words present in the text, in vocabulary order.
pub fn detect_power_words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut found = Vec::new();
    for word in POWER_WORDS {
        if lower.contains(word) {
            found.push(word.to_string());
        }
    }
    found
}

/// Every tagged signal occurrence in the text.
pub fn scan_signals(text: &str) -> Vec<ContentSignal> {
    let lower = text.to_lowercase();
    let mut signals = Vec::new();

    for word in POWER_WORDS {
        if lower.contains(word) {
            signals.push(ContentSignal {
                kind: SignalKind::PowerWord,
                text: word.to_string(),
            });
        }
    }

    for phrase in CTA_PHRASES {
        if lower.contains(phrase) {
            signals.push(ContentSignal {
                kind: SignalKind::Cta,
                text: phrase.to_string(),
            });
        }
    }

    for pattern in SOCIAL_PROOF_PATTERNS {
        if let Ok(regex) = Regex::new(pattern) {
            for matched in regex.find_iter(&lower) {
                signals.push(ContentSignal {
                    kind: SignalKind::SocialProof,
                    text: matched.as_str().to_string(),
                });
            }
        }
    }

    signals
}

/// Emotional polarity of the text, bounded to [-1, 1].
///
/// Ratio of positive to negative lexicon hits over the word tokens; 0.0 when
/// the text hits neither list.
pub fn emotional_polarity(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let mut positive = 0usize;
    let mut negative = 0usize;
    for token in lower.split(|c: char| !c.is_ascii_alphabetic()) {
        if token.is_empty() {
            continue;
        }
        if POSITIVE_WORDS.contains(&token) {
            positive += 1;
        } else if NEGATIVE_WORDS.contains(&token) {
            negative += 1;
        }
    }
    if positive + negative == 0 {
        return 0.0;
    }
    (positive as f64 - negative as f64) / (positive + negative) as f64
}
