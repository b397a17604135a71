// Unit tests for the heuristic override engine.
//
// The override pass must be monotonic (severity and score only go up) and
// idempotent (a second pass is a no-op), independent of what the provider
// concluded.

use cinnabar::analysis::heuristics::{apply_overrides, has_phishing_keyword, is_shortener};
use cinnabar::analysis::result::{AnalysisResult, RiskLevel, TechnicalDetails};

fn result(url: &str, level: RiskLevel, score: u8) -> AnalysisResult {
    AnalysisResult {
        url: url.to_string(),
        risk_level: level,
        score,
        summary: "The link appears legitimate.".to_string(),
        threats: vec![],
        recommendations: vec![],
        technical_details: TechnicalDetails::default(),
    }
}

// ============================================================
// Predicates
// ============================================================

#[test]
fn known_shorteners_match() {
    for url in [
        "https://bit.ly/promo",
        "https://t.co/abc",
        "https://tinyurl.com/xyz",
        "https://cutt.ly/q",
        "https://is.gd/short",
        "https://buff.ly/z",
        "https://ow.ly/z",
        "https://t.me/channel",
        "https://rebrand.ly/z",
        "https://goo.gl/maps",
        "https://qr.net/z",
    ] {
        assert!(is_shortener(url), "{url} should match the shortener list");
    }
}

#[test]
fn shortener_match_is_substring_and_case_insensitive() {
    assert!(is_shortener("HTTPS://BIT.LY/ABC"));
    assert!(is_shortener("https://redirect.example/?to=bit.ly/x"));
}

#[test]
fn plain_domains_are_not_shorteners() {
    assert!(!is_shortener("https://example.com"));
    assert!(!is_shortener("https://bitly-tutorials.example.com/about"));
}

#[test]
fn phishing_keywords_match() {
    assert!(has_phishing_keyword("https://example.com/login"));
    assert!(has_phishing_keyword("https://verify.example.com"));
    assert!(has_phishing_keyword("https://secure-bank.example.net"));
    assert!(has_phishing_keyword("https://netflix-payment.example"));
    assert!(!has_phishing_keyword("https://example.com/blog"));
}

// ============================================================
// Shortener rule
// ============================================================

#[test]
fn shortener_overrides_a_safe_verdict() {
    let mut r = result("https://bit.ly/abc", RiskLevel::Safe, 2);
    apply_overrides(&mut r);

    assert_eq!(r.risk_level, RiskLevel::Dangerous);
    assert!(r.score >= 90);
    assert!(r.threats.iter().any(|t| t.contains("shortener")));
}

#[test]
fn shortener_overrides_an_unknown_verdict() {
    let mut r = result("https://goo.gl/abc", RiskLevel::Unknown, 0);
    apply_overrides(&mut r);

    assert_eq!(r.risk_level, RiskLevel::Dangerous);
    assert!(r.score >= 90);
}

#[test]
fn shortener_never_lowers_a_higher_score() {
    let mut r = result("https://bit.ly/abc", RiskLevel::Suspicious, 98);
    apply_overrides(&mut r);

    assert_eq!(r.risk_level, RiskLevel::Dangerous);
    assert_eq!(r.score, 98);
}

// ============================================================
// Keyword rule
// ============================================================

#[test]
fn keyword_escalates_only_safe_verdicts() {
    let mut safe = result("https://secure-bank-login.example.com", RiskLevel::Safe, 5);
    apply_overrides(&mut safe);
    assert_eq!(safe.risk_level, RiskLevel::Suspicious);
    assert!(safe.score >= 45);

    let mut suspicious = result(
        "https://secure-bank-login.example.com",
        RiskLevel::Suspicious,
        60,
    );
    apply_overrides(&mut suspicious);
    assert_eq!(suspicious.risk_level, RiskLevel::Suspicious);
    assert_eq!(suspicious.score, 60);

    let mut dangerous = result(
        "https://secure-bank-login.example.com",
        RiskLevel::Dangerous,
        95,
    );
    apply_overrides(&mut dangerous);
    assert_eq!(dangerous.risk_level, RiskLevel::Dangerous);
    assert_eq!(dangerous.score, 95);
}

#[test]
fn keyword_note_is_appended_not_replaced() {
    let mut r = result("https://example.com/login", RiskLevel::Safe, 5);
    apply_overrides(&mut r);

    assert!(r.summary.starts_with("The link appears legitimate."));
    assert!(r.summary.len() > "The link appears legitimate.".len());
}

// ============================================================
// Monotonicity and idempotence
// ============================================================

#[test]
fn overrides_never_reduce_severity_or_score() {
    let urls = [
        "https://example.com/articles",
        "https://bit.ly/abc",
        "https://example.com/login",
        "https://bit.ly/login",
    ];
    let levels = [
        RiskLevel::Safe,
        RiskLevel::Unknown,
        RiskLevel::Suspicious,
        RiskLevel::Dangerous,
    ];

    for url in urls {
        for level in levels {
            for score in [0u8, 30, 45, 90, 100] {
                let mut r = result(url, level, score);
                apply_overrides(&mut r);
                assert!(
                    r.risk_level.severity() >= level.severity(),
                    "{url}: {level} must not downgrade to {}",
                    r.risk_level
                );
                assert!(r.score >= score, "{url}: score {score} must not drop");
            }
        }
    }
}

#[test]
fn double_application_is_identical_to_single() {
    let urls = [
        "https://bit.ly/abc",
        "https://example.com/login",
        "https://bit.ly/login",
        "https://example.com/articles",
    ];

    for url in urls {
        let mut once = result(url, RiskLevel::Safe, 10);
        apply_overrides(&mut once);

        let mut twice = once.clone();
        apply_overrides(&mut twice);

        assert_eq!(once.risk_level, twice.risk_level, "{url}");
        assert_eq!(once.score, twice.score, "{url}");
        assert_eq!(once.threats, twice.threats, "{url}");
        assert_eq!(once.summary, twice.summary, "{url}");
    }
}
