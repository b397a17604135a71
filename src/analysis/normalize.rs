// Result normalization — the single choke point between the provider's
// untrusted payload and the strict internal types.
//
// The provider is asked for a JSON document matching our schema, but the
// contract here assumes nothing: any field may be missing or carry the
// wrong type. Missing or garbled fields degrade to defaults. Only a
// syntactically malformed payload is an error, and that is raised by the
// caller (scanner.rs), not here.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::result::{AnalysisResult, RiskLevel, TechnicalDetails};

/// Summary used when the provider returned none.
const DEFAULT_SUMMARY: &str = "Analysis completed. No detailed summary was provided.";

/// The provider's assessment as parsed, before defaults are applied.
///
/// Every field is lenient: a wrong-typed value deserializes to None for
/// that field instead of failing the whole document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAssessment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub threats: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub recommendations: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_details")]
    pub technical_details: Option<RawTechnicalDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTechnicalDetails {
    #[serde(default, deserialize_with = "lenient_string")]
    pub protocol: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_ip_address: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_punycode: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub domain_age: Option<String>,
}

/// Build a fully-populated AnalysisResult from a raw assessment.
///
/// `url` is the exact string that was sent for analysis; it is echoed into
/// the result rather than trusting whatever the provider claims it scanned.
/// Pure transform, never fails.
pub fn normalize(raw: RawAssessment, url: &str) -> AnalysisResult {
    let risk_level = raw
        .risk_level
        .as_deref()
        .map(RiskLevel::parse)
        .unwrap_or(RiskLevel::Unknown);

    let score = raw
        .score
        .map(|s| s.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0);

    let summary = match raw.summary {
        Some(s) if !s.trim().is_empty() => s,
        _ => DEFAULT_SUMMARY.to_string(),
    };

    let tech = raw.technical_details.unwrap_or_default();

    AnalysisResult {
        url: url.to_string(),
        risk_level,
        score,
        summary,
        threats: raw.threats.unwrap_or_default(),
        recommendations: raw.recommendations.unwrap_or_default(),
        technical_details: TechnicalDetails {
            protocol: tech.protocol.unwrap_or_else(|| "unknown".to_string()),
            is_ip_address: tech.is_ip_address.unwrap_or(false),
            has_punycode: tech.has_punycode.unwrap_or(false),
            domain_age: tech.domain_age,
        },
    }
}

// --- Lenient field deserializers ---
//
// Each accepts any JSON value and keeps only what it can use. serde's
// default behavior would reject the entire document on one bad field.

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        // Providers occasionally quote numbers
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => Some(b),
        _ => None,
    })
}

fn lenient_details<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<RawTechnicalDetails>, D::Error> {
    let value = Value::deserialize(d)?;
    // Inner fields are lenient themselves, so this only rejects non-objects
    Ok(serde_json::from_value(value).ok())
}

fn lenient_string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        // Keep string elements, drop anything else
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}
