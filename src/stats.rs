// Usage counters — how many scans ran and how they came out.
//
// Persisted in the "scan_stats" store slot. Recording is the caller's
// responsibility after a successful scan; the orchestrator itself never
// touches these.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::result::RiskLevel;
use crate::store::{Store, STATS_KEY};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub total: u64,
    pub safe: u64,
    pub suspicious: u64,
    pub dangerous: u64,
}

impl ScanStats {
    /// Load the counters, defaulting to zeros when none are stored yet.
    pub async fn load(store: &dyn Store) -> Result<Self> {
        match store.load(STATS_KEY).await? {
            Some(json) => serde_json::from_str(&json).context("Stored scan stats are not valid"),
            None => Ok(Self::default()),
        }
    }

    pub async fn save(&self, store: &dyn Store) -> Result<()> {
        store.save(STATS_KEY, &serde_json::to_string(self)?).await
    }

    /// Count one completed scan. UNKNOWN verdicts only bump the total —
    /// there is no bucket for them.
    pub fn record(&mut self, level: RiskLevel) {
        self.total += 1;
        match level {
            RiskLevel::Safe => self.safe += 1,
            RiskLevel::Suspicious => self.suspicious += 1,
            RiskLevel::Dangerous => self.dangerous += 1,
            RiskLevel::Unknown => {}
        }
    }
}
