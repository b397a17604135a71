// Result types — the structs that flow through the application.
//
// These mirror the JSON schema the provider is asked to fill, so they
// serialize camelCase. Everything downstream (overrides, display, stats)
// works on AnalysisResult; nothing outside normalize.rs ever touches the
// raw provider payload.

use serde::{Deserialize, Serialize};

/// Verdict for a scanned URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Safe,
    Suspicious,
    Dangerous,
    Unknown,
}

impl RiskLevel {
    /// Parse a provider-supplied level string. Anything unrecognized maps
    /// to Unknown rather than failing.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "SAFE" => RiskLevel::Safe,
            "SUSPICIOUS" => RiskLevel::Suspicious,
            "DANGEROUS" => RiskLevel::Dangerous,
            _ => RiskLevel::Unknown,
        }
    }

    /// Rank for escalation checks. Unknown sits above Safe: an unassessed
    /// link is never treated as verified-safe.
    pub fn severity(&self) -> u8 {
        match self {
            RiskLevel::Safe => 0,
            RiskLevel::Unknown => 1,
            RiskLevel::Suspicious => 2,
            RiskLevel::Dangerous => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Suspicious => "SUSPICIOUS",
            RiskLevel::Dangerous => "DANGEROUS",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A completed scan verdict. Every field is populated — defaults are applied
/// in normalize.rs for anything the provider omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The exact input that was analyzed, echoed back.
    pub url: String,
    pub risk_level: RiskLevel,
    /// 0 to 100, where 100 is most dangerous.
    pub score: u8,
    pub summary: String,
    /// Short threat labels (e.g. "Phishing", "URL shortener"). Heuristic
    /// overrides may append to this list.
    pub threats: Vec<String>,
    pub recommendations: Vec<String>,
    pub technical_details: TechnicalDetails,
}

/// Technical observations about the scanned URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalDetails {
    pub protocol: String,
    pub is_ip_address: bool,
    pub has_punycode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_age: Option<String>,
}

impl Default for TechnicalDetails {
    fn default() -> Self {
        Self {
            protocol: "unknown".to_string(),
            is_ip_address: false,
            has_punycode: false,
            domain_age: None,
        }
    }
}
