// Scam-news feed — a locally persisted list of current fraud campaigns.
//
// Entries live in the "scam_news" store slot as a JSON array, newest first.
// The feed ships with two seed entries so a fresh install isn't empty.
// Mutation is password-gated at the CLI layer (Config::require_admin);
// this module only does the storage work.

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Store, NEWS_KEY};

/// One published scam alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScamNewsEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub author: String,
}

fn default_entries() -> Vec<ScamNewsEntry> {
    vec![
        ScamNewsEntry {
            id: "1".to_string(),
            title: "Fake parcel delivery fee".to_string(),
            description: "Mass SMS campaign claiming a customs fee is pending on a package."
                .to_string(),
            date: "22 May 2025".to_string(),
            author: "Admin".to_string(),
        },
        ScamNewsEntry {
            id: "2".to_string(),
            title: "AI investment scam".to_string(),
            description: "Platforms promising impossible returns from AI-driven trading."
                .to_string(),
            date: "21 May 2025".to_string(),
            author: "Admin".to_string(),
        },
    ]
}

/// Load the feed. An empty or missing slot is seeded with the default
/// entries, which are persisted so later loads see the same list.
pub async fn load_news(store: &dyn Store) -> Result<Vec<ScamNewsEntry>> {
    match store.load(NEWS_KEY).await? {
        Some(json) => {
            serde_json::from_str(&json).context("Stored scam news is not a valid entry list")
        }
        None => {
            let defaults = default_entries();
            save_news(store, &defaults).await?;
            Ok(defaults)
        }
    }
}

async fn save_news(store: &dyn Store, entries: &[ScamNewsEntry]) -> Result<()> {
    store
        .save(NEWS_KEY, &serde_json::to_string(entries)?)
        .await
}

/// Publish a new alert at the top of the feed and return it.
pub async fn add_entry(
    store: &dyn Store,
    title: &str,
    description: &str,
    author: Option<&str>,
) -> Result<ScamNewsEntry> {
    let entry = ScamNewsEntry {
        id: Utc::now().timestamp_millis().to_string(),
        title: title.to_string(),
        description: description.to_string(),
        date: Local::now().format("%-d %B %Y").to_string(),
        author: author.unwrap_or("Admin").to_string(),
    };

    let mut entries = load_news(store).await?;
    entries.insert(0, entry.clone());
    save_news(store, &entries).await?;

    Ok(entry)
}

/// Remove an alert by id. Returns false when no entry matched.
pub async fn remove_entry(store: &dyn Store, id: &str) -> Result<bool> {
    let mut entries = load_news(store).await?;
    let before = entries.len();
    entries.retain(|e| e.id != id);
    if entries.len() == before {
        return Ok(false);
    }
    save_news(store, &entries).await?;
    Ok(true)
}
