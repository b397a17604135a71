// Scan orchestration — the end-to-end flow behind every user action.
//
// A URL scan is: normalize the input, call the provider, parse, normalize
// the payload, apply heuristic overrides. A QR scan extracts a URL from the
// image first and then runs the same URL flow. Failures on either path are
// classified exactly once and surfaced — nothing is swallowed. The sole
// exception is daily_tips, which falls back to a static list.

use tracing::{debug, info};

use super::heuristics;
use super::normalize::{normalize, RawAssessment};
use super::result::AnalysisResult;
use crate::error::{classify_failure, ScanError};
use crate::gemini::traits::RiskAssessor;

/// Sentinel the provider is instructed to answer when a QR image holds no URL.
const NO_URL_SENTINEL: &str = "no url";

/// Fallback tips shown when the provider can't supply fresh ones.
const DEFAULT_TIPS: &[&str] = &[
    "Never click shortened links from unknown sources; expand them with a URL expander first.",
    "Check that an email sender's address exactly matches the company's official domain.",
    "Quishing (phishing via QR codes) is on the rise. Only scan QR codes from verified physical sources.",
];

/// Prepare a raw user input for scanning.
///
/// Trims whitespace and prepends "https://" when no scheme is present.
/// Returns None for empty input — the provider must not be called for it.
pub fn normalize_input(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}

/// Scan a URL end to end.
///
/// The returned result always has every field populated, with heuristic
/// overrides already applied. Counters and history are the caller's job.
pub async fn scan_url(
    assessor: &dyn RiskAssessor,
    raw_input: &str,
) -> Result<AnalysisResult, ScanError> {
    let url = normalize_input(raw_input).ok_or(ScanError::EmptyInput)?;

    debug!(url = %url, "Dispatching URL assessment");

    let payload = assessor
        .assess_url(&url)
        .await
        .map_err(|f| classify_failure(&f))?;

    let raw: RawAssessment =
        serde_json::from_str(&payload).map_err(|_| ScanError::MalformedResponse)?;

    let mut result = normalize(raw, &url);
    heuristics::apply_overrides(&mut result);

    info!(
        url = %result.url,
        risk = result.risk_level.as_str(),
        score = result.score,
        "Scan complete"
    );

    Ok(result)
}

/// Ask the provider to read the URL out of a QR image.
///
/// `image_data` is base64 image content, with or without a data-URI prefix.
/// Rejects with NoUrlDetected when the answer carries the "no URL" sentinel
/// or doesn't look like a domain.
pub async fn extract_qr_url(
    assessor: &dyn RiskAssessor,
    image_data: &str,
) -> Result<String, ScanError> {
    // "data:image/png;base64,AAAA..." -> "AAAA..."
    let payload = image_data
        .split_once(',')
        .map(|(_, rest)| rest)
        .unwrap_or(image_data);

    let extracted = assessor
        .extract_qr_url(payload)
        .await
        .map_err(|f| classify_failure(&f))?;

    let extracted = extracted.trim().to_string();

    if extracted.to_ascii_lowercase().contains(NO_URL_SENTINEL) || !extracted.contains('.') {
        return Err(ScanError::NoUrlDetected);
    }

    Ok(extracted)
}

/// Scan the URL embedded in a QR image: extract, then run the URL flow.
pub async fn scan_qr_image(
    assessor: &dyn RiskAssessor,
    image_data: &str,
) -> Result<AnalysisResult, ScanError> {
    let url = extract_qr_url(assessor, image_data).await?;
    info!(url = %url, "QR code decoded");
    scan_url(assessor, &url).await
}

/// Fetch today's security tips, falling back to the static defaults.
///
/// Tips are decorative, so any failure — provider or parse — yields the
/// defaults instead of an error. Scan paths never get this leniency.
pub async fn daily_tips(assessor: &dyn RiskAssessor) -> Vec<String> {
    match assessor.security_tips().await {
        Ok(payload) => match serde_json::from_str::<Vec<String>>(&payload) {
            Ok(tips) if !tips.is_empty() => tips,
            _ => default_tips(),
        },
        Err(f) => {
            debug!(message = %f.message, "Tips unavailable, using defaults");
            default_tips()
        }
    }
}

fn default_tips() -> Vec<String> {
    DEFAULT_TIPS.iter().map(|t| t.to_string()).collect()
}
