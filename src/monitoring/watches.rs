//! Wallet addresses placed under extended observation.

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Blockchain networks an address can be watched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Bitcoin,
    Ethereum,
    Litecoin,
    Polygon,
    Tron,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Bitcoin => "bitcoin",
            Network::Ethereum => "ethereum",
            Network::Litecoin => "litecoin",
            Network::Polygon => "polygon",
            Network::Tron => "tron",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown network '{0}'")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bitcoin" | "btc" => Ok(Network::Bitcoin),
            "ethereum" | "eth" => Ok(Network::Ethereum),
            "litecoin" | "ltc" => Ok(Network::Litecoin),
            "polygon" | "matic" => Ok(Network::Polygon),
            "tron" | "trx" => Ok(Network::Tron),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }
}

/// One watched address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Watch {
    /// Address as entered by the user.
    pub address: String,
    pub network: Network,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub comment: String,
}

impl Watch {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at >= now
    }
}

/// Concurrent map of (lower-cased address, network) → watch.
///
/// Scheduling the same address again replaces the previous watch.
#[derive(Default)]
pub struct WatchRegistry {
    watches: DashMap<(String, Network), Watch>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch an address for `days` days starting now.
    pub fn schedule(&self, address: &str, network: Network, days: u32, comment: Option<&str>) -> Watch {
        self.schedule_at(address, network, days, comment, Utc::now())
    }

    pub fn schedule_at(
        &self,
        address: &str,
        network: Network,
        days: u32,
        comment: Option<&str>,
        now: DateTime<Utc>,
    ) -> Watch {
        let watch = Watch {
            address: address.to_string(),
            network,
            created_at: now,
            expires_at: now + Duration::days(i64::from(days)),
            comment: comment.unwrap_or_default().to_string(),
        };
        self.watches
            .insert((address.to_lowercase(), network), watch.clone());
        watch
    }

    /// Unexpired watches, soonest expiry first.
    pub fn active(&self) -> Vec<Watch> {
        self.active_at(Utc::now())
    }

    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Watch> {
        let mut active: Vec<Watch> = self
            .watches
            .iter()
            .filter(|r| r.value().is_active_at(now))
            .map(|r| r.value().clone())
            .collect();
        active.sort_by_key(|w| w.expires_at);
        active
    }

    /// Unexpired watches for one address, matched case-insensitively.
    pub fn watch_for(&self, address: &str, network: Network) -> Vec<Watch> {
        self.watch_for_at(address, network, Utc::now())
    }

    pub fn watch_for_at(&self, address: &str, network: Network, now: DateTime<Utc>) -> Vec<Watch> {
        let normalized = address.to_lowercase();
        let mut watches: Vec<Watch> = self
            .watches
            .iter()
            .filter(|r| r.key().0 == normalized && r.key().1 == network)
            .filter(|r| r.value().is_active_at(now))
            .map(|r| r.value().clone())
            .collect();
        watches.sort_by_key(|w| w.expires_at);
        watches
    }

    /// Number of active watches expiring within `window` of `now`.
    pub fn expiring_within(&self, window: Duration, now: DateTime<Utc>) -> usize {
        let threshold = now + window;
        self.active_at(now)
            .iter()
            .filter(|w| w.expires_at <= threshold)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parse() {
        assert_eq!("BTC".parse::<Network>().unwrap(), Network::Bitcoin);
        assert_eq!("ethereum".parse::<Network>().unwrap(), Network::Ethereum);
        assert!("dogecoin".parse::<Network>().is_err());
        assert_eq!(serde_json::to_string(&Network::Tron).unwrap(), "\"tron\"");
    }

    #[test]
    fn test_expired_watches_are_hidden() {
        let registry = WatchRegistry::new();
        let now = Utc::now();
        registry.schedule_at("bc1qold", Network::Bitcoin, 1, None, now - Duration::days(3));
        registry.schedule_at("bc1qlong", Network::Bitcoin, 30, None, now);
        registry.schedule_at("0xShort", Network::Ethereum, 2, Some("exchange"), now);

        let active = registry.active_at(now);
        let addresses: Vec<_> = active.iter().map(|w| w.address.as_str()).collect();
        assert_eq!(addresses, vec!["0xShort", "bc1qlong"]);
        assert_eq!(active[0].comment, "exchange");
        assert!(registry.watch_for_at("bc1qold", Network::Bitcoin, now).is_empty());
    }

    #[test]
    fn test_watch_for_matches_lowercase_address() {
        let registry = WatchRegistry::new();
        let now = Utc::now();
        registry.schedule_at("0xAbCdEf", Network::Ethereum, 7, None, now);

        let found = registry.watch_for_at("0xabcdef", Network::Ethereum, now);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].address, "0xAbCdEf");
        assert!(registry.watch_for_at("0xABCDEF", Network::Polygon, now).is_empty());
    }

    #[test]
    fn test_reschedule_replaces_watch() {
        let registry = WatchRegistry::new();
        let now = Utc::now();
        registry.schedule_at("TAddr", Network::Tron, 1, None, now);
        registry.schedule_at("taddr", Network::Tron, 10, None, now);

        let active = registry.active_at(now);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].expires_at, now + Duration::days(10));
    }

    #[test]
    fn test_expiring_within() {
        let registry = WatchRegistry::new();
        let now = Utc::now();
        registry.schedule_at("a", Network::Litecoin, 1, None, now);
        registry.schedule_at("b", Network::Litecoin, 3, None, now);
        registry.schedule_at("c", Network::Litecoin, 30, None, now);

        assert_eq!(registry.expiring_within(Duration::days(3), now), 2);
    }
}
