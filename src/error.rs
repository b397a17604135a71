// Scan error taxonomy — every failure the scan and QR paths can surface.
//
// The provider boundary hands back an opaque (status, message) pair;
// `classify_failure` inspects it once, in a fixed priority order, and maps
// it to exactly one variant. Callers never re-derive classification from
// message strings. Each variant's display text is the fixed user-facing
// message, carrying the corrective action where one exists.

use thiserror::Error;

use crate::gemini::traits::ProviderFailure;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error(
        "Analysis quota exceeded. Wait a minute before retrying, or configure a personal API key."
    )]
    RateLimited,

    #[error(
        "The configured API key is invalid or has been revoked. Set a valid GEMINI_API_KEY and try again."
    )]
    InvalidCredential,

    #[error(
        "The API key's project was not found. Select a key tied to a billing-enabled project."
    )]
    CredentialNotUsable,

    #[error(
        "The request could not be processed. The input may be malformed or blocked by content safety filters."
    )]
    BadRequestOrBlockedContent,

    #[error("The analysis engine returned an unreadable response. Try the scan again.")]
    MalformedResponse,

    #[error("No URL was detected in the image. Use a clear, well-lit photo of the QR code.")]
    NoUrlDetected,

    #[error("Could not reach the analysis engine. Check your connection and try again.")]
    GenericConnectivity,

    #[error("Nothing to scan. Enter a URL first.")]
    EmptyInput,
}

/// Map a provider failure to a ScanError.
///
/// Signals overlap — a 429 body can also mention the API key — so the checks
/// run in priority order: quota > auth > not-found > bad-request > generic.
/// The first match wins.
pub fn classify_failure(failure: &ProviderFailure) -> ScanError {
    let status = failure.status;
    let message = failure.message.to_ascii_lowercase();

    if status == Some(429) || message.contains("quota") || message.contains("resource_exhausted") {
        return ScanError::RateLimited;
    }

    if status == Some(401)
        || status == Some(403)
        || message.contains("api key not valid")
        || message.contains("api_key_invalid")
        || message.contains("permission_denied")
    {
        return ScanError::InvalidCredential;
    }

    if message.contains("requested entity was not found") {
        return ScanError::CredentialNotUsable;
    }

    if status == Some(400) {
        return ScanError::BadRequestOrBlockedContent;
    }

    ScanError::GenericConnectivity
}
