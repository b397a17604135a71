// Heuristic overrides — deterministic rules applied on top of the AI verdict.
//
// The provider is prompted to flag shorteners and phishing wording itself,
// but its judgment drifts. These rules are the backstop: they can only
// escalate a result, never soften it, and a second pass over an already
// escalated result changes nothing.

use super::result::{AnalysisResult, RiskLevel};

/// Domain fragments of known URL shorteners. Matched as case-insensitive
/// substrings of the scanned URL.
const SHORTENER_DOMAINS: &[&str] = &[
    "bit.ly",
    "t.co",
    "tinyurl",
    "cutt.ly",
    "is.gd",
    "buff.ly",
    "ow.ly",
    "t.me",
    "rebrand.ly",
    "goo.gl",
    "qr.net",
];

/// URL fragments associated with credential-phishing pages.
const PHISHING_KEYWORDS: &[&str] = &[
    "login",
    "verify",
    "update-account",
    "secure-bank",
    "netflix-payment",
    "account-suspended",
    "password-reset",
];

const SHORTENER_THREAT: &str = "URL shortener (destination concealment)";

const SHORTENER_SUMMARY: &str = "This link uses a shortening service. Shortened links are \
classified as dangerous by default because they conceal their final destination, a standard \
tactic in phishing and malware campaigns (including QR-based quishing).";

const KEYWORD_NOTE: &str = " Note: the address contains wording commonly used on credential \
phishing pages. Treat any login or payment form behind this link with caution.";

/// Floor score forced by the shortener rule.
const SHORTENER_MIN_SCORE: u8 = 90;

/// Floor score forced by the keyword rule.
const KEYWORD_MIN_SCORE: u8 = 45;

/// True when the URL contains a known shortener domain fragment.
pub fn is_shortener(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    SHORTENER_DOMAINS.iter().any(|s| url.contains(s))
}

/// True when the URL contains a fragment associated with phishing pages.
pub fn has_phishing_keyword(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    PHISHING_KEYWORDS.iter().any(|k| url.contains(k))
}

/// Apply the override rules to a normalized result, in place.
///
/// Rules fire independently against the current state, so escalation is
/// monotonic (severity and score never decrease) and the whole pass is
/// idempotent. The result's own `url` field is the subject of the match —
/// it holds the exact string that was analyzed.
pub fn apply_overrides(result: &mut AnalysisResult) {
    // Rule 1: shorteners are dangerous no matter what the provider said.
    // The forced summary replaces the provider's narrative, which the
    // escalation has just invalidated.
    if is_shortener(&result.url) && result.risk_level != RiskLevel::Dangerous {
        result.risk_level = RiskLevel::Dangerous;
        result.score = result.score.max(SHORTENER_MIN_SCORE);
        result.threats.push(SHORTENER_THREAT.to_string());
        result.summary = SHORTENER_SUMMARY.to_string();
    }

    // Rule 2: phishing wording turns a clean verdict into a suspicious one.
    // Only fires on SAFE — an UNKNOWN, SUSPICIOUS, or DANGEROUS verdict is
    // left alone. The note is appended; the provider's narrative stays.
    if has_phishing_keyword(&result.url) && result.risk_level == RiskLevel::Safe {
        result.risk_level = RiskLevel::Suspicious;
        result.score = result.score.max(KEYWORD_MIN_SCORE);
        result.summary.push_str(KEYWORD_NOTE);
    }
}
