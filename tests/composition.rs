// Composition tests — the scan flow end to end over a scripted provider.
//
// These exercise the data flow between modules:
//   input normalization -> provider call -> payload parse -> normalize ->
//   heuristic overrides
// plus the QR extraction path, the tips fallback, and the news/stats
// collaborators over an in-memory store. No network, no filesystem.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use cinnabar::analysis::result::RiskLevel;
use cinnabar::analysis::scanner::{daily_tips, extract_qr_url, scan_qr_image, scan_url};
use cinnabar::error::ScanError;
use cinnabar::gemini::traits::{ProviderFailure, RiskAssessor};
use cinnabar::news;
use cinnabar::stats::ScanStats;
use cinnabar::store::{Store, NEWS_KEY};

// ============================================================
// Test doubles
// ============================================================

/// Provider double with scripted responses per capability. Records what it
/// was called with so tests can assert on the dispatched values.
#[derive(Default)]
struct ScriptedAssessor {
    assess: Option<Result<String, ProviderFailure>>,
    qr: Option<Result<String, ProviderFailure>>,
    tips: Option<Result<String, ProviderFailure>>,
    assess_calls: AtomicUsize,
    seen_urls: Mutex<Vec<String>>,
    seen_qr_payloads: Mutex<Vec<String>>,
}

impl ScriptedAssessor {
    fn with_assessment(payload: &str) -> Self {
        Self {
            assess: Some(Ok(payload.to_string())),
            ..Default::default()
        }
    }

    fn with_assess_failure(status: Option<u16>, message: &str) -> Self {
        Self {
            assess: Some(Err(ProviderFailure::new(status, message))),
            ..Default::default()
        }
    }

    fn with_qr(qr_text: &str, assessment: &str) -> Self {
        Self {
            qr: Some(Ok(qr_text.to_string())),
            assess: Some(Ok(assessment.to_string())),
            ..Default::default()
        }
    }

    fn with_qr_failure(status: Option<u16>, message: &str) -> Self {
        Self {
            qr: Some(Err(ProviderFailure::new(status, message))),
            ..Default::default()
        }
    }

    fn with_tips(payload: Result<String, ProviderFailure>) -> Self {
        Self {
            tips: Some(payload),
            ..Default::default()
        }
    }
}

#[async_trait]
impl RiskAssessor for ScriptedAssessor {
    async fn assess_url(&self, url: &str) -> Result<String, ProviderFailure> {
        self.assess_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_urls.lock().unwrap().push(url.to_string());
        self.assess.clone().expect("assess_url was not scripted")
    }

    async fn extract_qr_url(&self, image_base64: &str) -> Result<String, ProviderFailure> {
        self.seen_qr_payloads
            .lock()
            .unwrap()
            .push(image_base64.to_string());
        self.qr.clone().expect("extract_qr_url was not scripted")
    }

    async fn security_tips(&self) -> Result<String, ProviderFailure> {
        self.tips.clone().expect("security_tips was not scripted")
    }
}

/// In-memory Store for the news/stats collaborators.
#[derive(Default)]
struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.slots.lock().unwrap().get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.slots
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

const SAFE_PAYLOAD: &str = r#"{
    "riskLevel": "SAFE",
    "score": 5,
    "summary": "No threat signals found.",
    "threats": [],
    "recommendations": ["Keep your browser up to date"],
    "technicalDetails": {"protocol": "https", "isIpAddress": false, "hasPunycode": false}
}"#;

// ============================================================
// URL scan flow
// ============================================================

#[tokio::test]
async fn clean_url_passes_through_unchanged() {
    let assessor = ScriptedAssessor::with_assessment(SAFE_PAYLOAD);
    let result = scan_url(&assessor, "https://example.org/articles/1")
        .await
        .unwrap();

    assert_eq!(result.url, "https://example.org/articles/1");
    assert_eq!(result.risk_level, RiskLevel::Safe);
    assert_eq!(result.score, 5);
    assert_eq!(result.summary, "No threat signals found.");
}

#[tokio::test]
async fn bare_input_is_dispatched_with_https_scheme() {
    let assessor = ScriptedAssessor::with_assessment(SAFE_PAYLOAD);
    scan_url(&assessor, "  example.org ").await.unwrap();

    let seen = assessor.seen_urls.lock().unwrap();
    assert_eq!(seen.as_slice(), ["https://example.org"]);
}

#[tokio::test]
async fn http_input_is_dispatched_as_is() {
    let assessor = ScriptedAssessor::with_assessment(SAFE_PAYLOAD);
    scan_url(&assessor, "http://example.org").await.unwrap();

    let seen = assessor.seen_urls.lock().unwrap();
    assert_eq!(seen.as_slice(), ["http://example.org"]);
}

#[tokio::test]
async fn empty_input_never_reaches_the_provider() {
    let assessor = ScriptedAssessor::with_assessment(SAFE_PAYLOAD);
    let err = scan_url(&assessor, "   \n").await.unwrap_err();

    assert_eq!(err, ScanError::EmptyInput);
    assert_eq!(assessor.assess_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn shortener_input_is_dangerous_regardless_of_provider_verdict() {
    let assessor = ScriptedAssessor::with_assessment(SAFE_PAYLOAD);
    let result = scan_url(&assessor, "bit.ly/abc").await.unwrap();

    assert_eq!(result.url, "https://bit.ly/abc");
    assert_eq!(result.risk_level, RiskLevel::Dangerous);
    assert!(result.score >= 90);
    assert!(result.threats.iter().any(|t| t.contains("shortener")));
}

#[tokio::test]
async fn phishing_wording_turns_safe_into_suspicious() {
    let assessor = ScriptedAssessor::with_assessment(SAFE_PAYLOAD);
    let result = scan_url(&assessor, "https://secure-bank-login.example.com")
        .await
        .unwrap();

    assert_eq!(result.risk_level, RiskLevel::Suspicious);
    assert!(result.score >= 45);
}

#[tokio::test]
async fn sparse_payload_still_yields_a_complete_result() {
    let assessor = ScriptedAssessor::with_assessment(r#"{"riskLevel": "SAFE"}"#);
    let result = scan_url(&assessor, "https://example.org").await.unwrap();

    assert_eq!(result.risk_level, RiskLevel::Safe);
    assert_eq!(result.score, 0);
    assert!(!result.summary.is_empty());
    assert!(result.threats.is_empty());
    assert_eq!(result.technical_details.protocol, "unknown");
}

#[tokio::test]
async fn rate_limited_provider_surfaces_as_rate_limited() {
    let assessor = ScriptedAssessor::with_assess_failure(Some(429), "Resource exhausted");
    let err = scan_url(&assessor, "https://example.org").await.unwrap_err();

    assert_eq!(err, ScanError::RateLimited);
    assert!(err.to_string().contains("personal API key"));
}

#[tokio::test]
async fn transport_failure_surfaces_as_generic_connectivity() {
    let assessor = ScriptedAssessor::with_assess_failure(None, "connection reset by peer");
    let err = scan_url(&assessor, "https://example.org").await.unwrap_err();

    assert_eq!(err, ScanError::GenericConnectivity);
}

#[tokio::test]
async fn unparseable_payload_surfaces_as_malformed_response() {
    let assessor = ScriptedAssessor::with_assessment("I could not comply with the schema");
    let err = scan_url(&assessor, "https://example.org").await.unwrap_err();

    assert_eq!(err, ScanError::MalformedResponse);
}

// ============================================================
// QR extraction flow
// ============================================================

#[tokio::test]
async fn qr_scan_feeds_the_extracted_url_into_the_scan_flow() {
    let assessor = ScriptedAssessor::with_qr(" https://example.org/promo \n", SAFE_PAYLOAD);
    let result = scan_qr_image(&assessor, "AAAABBBB").await.unwrap();

    assert_eq!(result.url, "https://example.org/promo");
    assert_eq!(result.risk_level, RiskLevel::Safe);

    let seen = assessor.seen_urls.lock().unwrap();
    assert_eq!(seen.as_slice(), ["https://example.org/promo"]);
}

#[tokio::test]
async fn data_uri_prefix_is_stripped_before_dispatch() {
    let assessor = ScriptedAssessor::with_qr("https://example.org", SAFE_PAYLOAD);
    scan_qr_image(&assessor, "data:image/png;base64,AAAABBBB")
        .await
        .unwrap();

    let seen = assessor.seen_qr_payloads.lock().unwrap();
    assert_eq!(seen.as_slice(), ["AAAABBBB"]);
}

#[tokio::test]
async fn no_url_sentinel_is_rejected() {
    let assessor = ScriptedAssessor::with_qr("No URL found", SAFE_PAYLOAD);
    let err = scan_qr_image(&assessor, "AAAA").await.unwrap_err();

    assert_eq!(err, ScanError::NoUrlDetected);
}

#[tokio::test]
async fn answer_without_a_domain_separator_is_rejected() {
    let assessor = ScriptedAssessor::with_qr("just some text", SAFE_PAYLOAD);
    let err = extract_qr_url(&assessor, "AAAA").await.unwrap_err();

    assert_eq!(err, ScanError::NoUrlDetected);
}

#[tokio::test]
async fn qr_provider_failures_use_the_same_taxonomy() {
    let assessor = ScriptedAssessor::with_qr_failure(Some(429), "quota exceeded");
    let err = scan_qr_image(&assessor, "AAAA").await.unwrap_err();

    assert_eq!(err, ScanError::RateLimited);
}

// ============================================================
// Daily tips — the one lenient path
// ============================================================

#[tokio::test]
async fn fresh_tips_are_returned_when_the_provider_delivers() {
    let assessor = ScriptedAssessor::with_tips(Ok(
        r#"["Use a password manager", "Enable 2FA", "Check sender domains"]"#.to_string(),
    ));
    let tips = daily_tips(&assessor).await;

    assert_eq!(tips.len(), 3);
    assert_eq!(tips[0], "Use a password manager");
}

#[tokio::test]
async fn provider_failure_falls_back_to_default_tips() {
    let assessor =
        ScriptedAssessor::with_tips(Err(ProviderFailure::new(Some(429), "quota exceeded")));
    let tips = daily_tips(&assessor).await;

    assert_eq!(tips.len(), 3);
    assert!(tips.iter().any(|t| t.contains("QR")));
}

#[tokio::test]
async fn malformed_tips_fall_back_to_defaults() {
    let assessor = ScriptedAssessor::with_tips(Ok("not a json array".to_string()));
    assert_eq!(daily_tips(&assessor).await.len(), 3);

    let assessor = ScriptedAssessor::with_tips(Ok("[]".to_string()));
    assert_eq!(daily_tips(&assessor).await.len(), 3);
}

// ============================================================
// News and counters over the store
// ============================================================

#[tokio::test]
async fn first_news_load_seeds_and_persists_defaults() {
    let store = MemoryStore::default();
    let entries = news::load_news(&store).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert!(store.slots.lock().unwrap().contains_key(NEWS_KEY));

    // Second load reads the persisted list, not a fresh seed
    let again = news::load_news(&store).await.unwrap();
    assert_eq!(again.len(), 2);
    assert_eq!(again[0].id, entries[0].id);
}

#[tokio::test]
async fn added_entries_go_to_the_top_and_can_be_removed() {
    let store = MemoryStore::default();

    let entry = news::add_entry(&store, "Fake toll notice", "SMS wave about unpaid tolls.", None)
        .await
        .unwrap();
    assert_eq!(entry.author, "Admin");

    let entries = news::load_news(&store).await.unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].title, "Fake toll notice");

    assert!(news::remove_entry(&store, &entry.id).await.unwrap());
    assert!(!news::remove_entry(&store, &entry.id).await.unwrap());
    assert_eq!(news::load_news(&store).await.unwrap().len(), 2);
}

#[tokio::test]
async fn counters_round_trip_through_the_store() {
    let store = MemoryStore::default();

    let mut stats = ScanStats::load(&store).await.unwrap();
    assert_eq!(stats, ScanStats::default());

    stats.record(RiskLevel::Dangerous);
    stats.record(RiskLevel::Safe);
    stats.save(&store).await.unwrap();

    let reloaded = ScanStats::load(&store).await.unwrap();
    assert_eq!(reloaded.total, 2);
    assert_eq!(reloaded.dangerous, 1);
    assert_eq!(reloaded.safe, 1);
}
