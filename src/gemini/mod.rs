// Provider boundary — trait-based abstraction over the generative-AI service.
//
// The RiskAssessor trait defines the capability. GeminiClient implements it
// against Google's generateContent REST API; tests implement it with scripted
// responses. Nothing outside this module knows which provider is in use.

pub mod client;
pub mod traits;
