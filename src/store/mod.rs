// Persistence boundary — a named-slot key-value store.
//
// The scan core never touches storage; the news feed and usage counters go
// through this trait. Implementors: JsonFileStore (a single JSON file on
// disk). All methods are async so a future backend with real I/O latency
// fits behind the same interface.

pub mod json;

use anyhow::Result;
use async_trait::async_trait;

pub use json::JsonFileStore;

/// Slot name for the scam-news feed.
pub const NEWS_KEY: &str = "scam_news";

/// Slot name for the usage counters.
pub const STATS_KEY: &str = "scan_stats";

#[async_trait]
pub trait Store: Send + Sync {
    /// Get the value stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` (upsert).
    async fn save(&self, key: &str, value: &str) -> Result<()>;
}
