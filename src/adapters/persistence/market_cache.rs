//! Market Cache - Local JSON Snapshot of the Market Catalog
//!
//! Walking the full cursor-paginated market listing takes minutes, so
//! the catalog is cached as JSON in the config directory with a 1-hour
//! TTL. `refresh` rebuilds it; search commands read it and tell the
//! user to refresh when it has gone stale.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapters::api::types::Market;

const CACHE_FILE: &str = "markets.json";

/// Cache validity window.
const CACHE_TTL_HOURS: i64 = 1;

/// One market reduced to what the CLI's commands need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedMarket {
    pub condition_id: String,
    pub question: String,
    pub yes_token_id: String,
    pub no_token_id: String,
    pub active: bool,
    pub closed: bool,
    pub neg_risk: bool,
}

impl CachedMarket {
    /// Reduce an API market to its cached form; `None` when the market
    /// has no recognizable Yes/No token pair.
    pub fn from_api(market: &Market) -> Option<Self> {
        let yes = market.tokens.iter().find(|t| t.outcome == "Yes")?;
        let no = market.tokens.iter().find(|t| t.outcome == "No")?;

        Some(Self {
            condition_id: market.condition_id.clone(),
            question: market.question.clone(),
            yes_token_id: yes.token_id.clone(),
            no_token_id: no.token_id.clone(),
            active: market.active,
            closed: market.closed,
            neg_risk: market.neg_risk,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct CacheFile {
    fetched_at: DateTime<Utc>,
    markets: Vec<CachedMarket>,
}

/// File-backed market catalog with TTL-based staleness.
pub struct MarketCache {
    path: PathBuf,
}

impl MarketCache {
    /// Cache living inside the config directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(CACHE_FILE),
        }
    }

    /// Load the cached catalog if present and fresh.
    pub fn load(&self) -> Result<Option<Vec<CachedMarket>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let cache: CacheFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        let age = Utc::now() - cache.fetched_at;
        if age > Duration::hours(CACHE_TTL_HOURS) {
            debug!(age_minutes = age.num_minutes(), "Market cache is stale");
            return Ok(None);
        }

        Ok(Some(cache.markets))
    }

    /// Replace the cache with a freshly fetched catalog.
    pub fn save(&self, markets: Vec<CachedMarket>) -> Result<usize> {
        let count = markets.len();
        let cache = CacheFile {
            fetched_at: Utc::now(),
            markets,
        };

        let content = serde_json::to_string(&cache).context("Failed to serialize market cache")?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to rename {}", self.path.display()))?;

        info!(count, path = %self.path.display(), "Market cache updated");
        Ok(count)
    }
}

/// Case-insensitive substring search over cached market questions.
pub fn filter_markets<'a>(markets: &'a [CachedMarket], query: &str) -> Vec<&'a CachedMarket> {
    let query = query.to_lowercase();
    markets
        .iter()
        .filter(|m| m.question.to_lowercase().contains(&query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::api::types::MarketToken;

    fn sample(question: &str) -> CachedMarket {
        CachedMarket {
            condition_id: "0xabc".to_string(),
            question: question.to_string(),
            yes_token_id: "1".to_string(),
            no_token_id: "2".to_string(),
            active: true,
            closed: false,
            neg_risk: false,
        }
    }

    #[test]
    fn round_trips_through_the_cache_file() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = MarketCache::in_dir(tmp.path());

        assert!(cache.load().unwrap().is_none());

        let count = cache.save(vec![sample("Will it rain?")]).unwrap();
        assert_eq!(count, 1);

        let markets = cache.load().unwrap().unwrap();
        assert_eq!(markets[0].question, "Will it rain?");
    }

    #[test]
    fn stale_cache_loads_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = MarketCache::in_dir(tmp.path());

        let stale = CacheFile {
            fetched_at: Utc::now() - Duration::hours(2),
            markets: vec![sample("old")],
        };
        std::fs::write(
            tmp.path().join(CACHE_FILE),
            serde_json::to_string(&stale).unwrap(),
        )
        .unwrap();

        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn filter_is_case_insensitive() {
        let markets = vec![sample("Will BTC hit 100k?"), sample("Will it rain?")];
        let hits = filter_markets(&markets, "btc");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].question, "Will BTC hit 100k?");
    }

    #[test]
    fn from_api_requires_a_yes_no_pair() {
        let market = Market {
            condition_id: "0xabc".to_string(),
            question: "q".to_string(),
            tokens: vec![MarketToken {
                token_id: "1".to_string(),
                outcome: "Yes".to_string(),
            }],
            active: true,
            closed: false,
            neg_risk: true,
        };
        assert!(CachedMarket::from_api(&market).is_none());

        let mut full = market.clone();
        full.tokens.push(MarketToken {
            token_id: "2".to_string(),
            outcome: "No".to_string(),
        });
        let cached = CachedMarket::from_api(&full).unwrap();
        assert!(cached.neg_risk);
        assert_eq!(cached.no_token_id, "2");
    }
}
