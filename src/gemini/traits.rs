// Risk assessor trait — the swap-ready provider abstraction.
//
// All three capabilities are one-shot request/response calls that return
// raw text. Parsing and classification happen in the caller: the scanner
// turns assess_url payloads into AnalysisResults, and classify_failure
// turns ProviderFailures into the error taxonomy. Keeping the trait at
// the raw-text level means a mock in tests is three string returns.

use async_trait::async_trait;

/// A failure signal from the provider boundary, before classification.
///
/// `status` is the HTTP status when one was received; transport-level
/// failures (DNS, connection reset) carry None. `message` is whatever
/// detail the provider or transport offered.
#[derive(Debug, Clone)]
pub struct ProviderFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// External generative-AI capability: assess a URL, read a QR image, or
/// produce security tips. Implementations must be async because providers
/// are HTTP APIs.
#[async_trait]
pub trait RiskAssessor: Send + Sync {
    /// Ask the provider for a structured risk assessment of `url`.
    /// Returns the raw JSON text of the assessment document.
    async fn assess_url(&self, url: &str) -> Result<String, ProviderFailure>;

    /// Ask the provider to read the URL embedded in a QR image.
    /// `image_base64` is the raw base64 payload (no data-URI prefix).
    /// Returns the provider's plain-text answer, unvalidated.
    async fn extract_qr_url(&self, image_base64: &str) -> Result<String, ProviderFailure>;

    /// Ask the provider for today's security tips.
    /// Returns the raw JSON text of a string array.
    async fn security_tips(&self) -> Result<String, ProviderFailure>;
}
