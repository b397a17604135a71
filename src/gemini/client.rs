// Gemini API implementation of the RiskAssessor trait.
//
// Uses the generateContent REST endpoint. URL scans ask for a JSON response
// constrained to the assessment schema; QR extraction sends the image as an
// inline part and gets plain text back. Failures are captured as
// (status, message) pairs and classified by the caller, not here.
//
// API docs: https://ai.google.dev/api/generate-content

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::traits::{ProviderFailure, RiskAssessor};

/// Default endpoint for the Gemini API.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

const SCAN_SYSTEM_INSTRUCTION: &str = "You are a senior cybersecurity analyst with access to \
global threat intelligence. Your mission is to protect the user by detecting even the most \
subtle threats. You are extremely strict: when you cannot verify that a link is absolutely \
safe (as with URL shorteners), warn the user with high severity.";

const TIPS_SYSTEM_INSTRUCTION: &str = "You are an expert in digital fraud prevention. \
Give technical but approachable advice.";

const QR_PROMPT: &str = "Extract only the URL contained in this QR code. If there is no URL, \
answer 'No URL found'. Respond with the plain URL only.";

/// Gemini-backed risk assessor.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for the given key and model.
    ///
    /// `base_url` defaults to the public Gemini endpoint — pass a different
    /// URL for testing or proxied deployments.
    pub fn new(api_key: String, base_url: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("cinnabar/0.1 (url-risk-scanner)")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// POST a generateContent request and return the first candidate's text.
    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, ProviderFailure> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        debug!(model = %self.model, "generateContent request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderFailure::new(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // The API wraps errors as {"error": {"code", "message", "status"}};
            // fall back to the raw body when it doesn't.
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderFailure::new(Some(status.as_u16()), message));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::new(None, format!("unreadable response body: {e}")))?;

        // A response with no text is not a transport failure — surface it as
        // empty text and let the caller's validation reject it.
        Ok(parsed.first_text().unwrap_or_default())
    }
}

#[async_trait]
impl RiskAssessor for GeminiClient {
    async fn assess_url(&self, url: &str) -> Result<String, ProviderFailure> {
        let prompt = format!(
            "Perform a deep security scan of the URL: {url}.\n\n\
             CRITICAL INSTRUCTIONS:\n\
             1. Use the search tool to consult reputation databases, recent phishing reports, \
             and cybersecurity blocklists.\n\
             2. GOLDEN RULE: if the link is a URL shortener (e.g. bit.ly, t.co, tinyurl, \
             cutt.ly, is.gd), automatically classify it as DANGEROUS or SUSPICIOUS with a score \
             above 85. Explain that shorteners conceal the final destination and are a common \
             attack vector.\n\
             3. Check for discrepancies between the link text and the real domain.\n\
             4. Check whether the domain is recently registered or impersonates a known brand."
        );

        let request = GenerateContentRequest {
            contents: vec![Content::text(prompt)],
            system_instruction: Some(Content::text(SCAN_SYSTEM_INSTRUCTION.to_string())),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Some(assessment_schema()),
            }),
            tools: Some(vec![json!({ "googleSearch": {} })]),
        };

        self.generate(&request).await
    }

    async fn extract_qr_url(&self, image_base64: &str) -> Result<String, ProviderFailure> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: "image/jpeg".to_string(),
                            data: image_base64.to_string(),
                        }),
                    },
                    Part {
                        text: Some(QR_PROMPT.to_string()),
                        inline_data: None,
                    },
                ],
            }],
            system_instruction: None,
            generation_config: None,
            tools: None,
        };

        self.generate(&request).await
    }

    async fn security_tips(&self) -> Result<String, ProviderFailure> {
        let request = GenerateContentRequest {
            contents: vec![Content::text(
                "Generate 3 advanced, specific cybersecurity tips for avoiding online fraud today."
                    .to_string(),
            )],
            system_instruction: Some(Content::text(TIPS_SYSTEM_INSTRUCTION.to_string())),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Some(json!({
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                })),
            }),
            tools: None,
        };

        self.generate(&request).await
    }
}

/// JSON schema the provider must fill for a URL assessment. Mirrors
/// `analysis::result::AnalysisResult` minus the echoed `url` field.
fn assessment_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "riskLevel": {
                "type": "STRING",
                "description": "Risk level: SAFE, SUSPICIOUS, DANGEROUS"
            },
            "score": {
                "type": "NUMBER",
                "description": "Score from 0 to 100, where 100 is most dangerous"
            },
            "summary": {
                "type": "STRING",
                "description": "Explanatory summary of the detailed analysis"
            },
            "threats": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Detected threats (e.g. Phishing, Malware, Opaque shortener)"
            },
            "recommendations": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Specific preventive advice"
            },
            "technicalDetails": {
                "type": "OBJECT",
                "properties": {
                    "protocol": { "type": "STRING" },
                    "isIpAddress": { "type": "BOOLEAN" },
                    "hasPunycode": { "type": "BOOLEAN" }
                },
                "required": ["protocol", "isIpAddress", "hasPunycode"]
            }
        },
        "required": ["riskLevel", "score", "summary", "threats", "recommendations", "technicalDetails"]
    })
}

// --- generateContent request/response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

impl Content {
    fn text(text: String) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text),
                inline_data: None,
            }],
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(|p| p.text.clone())
    }
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}
