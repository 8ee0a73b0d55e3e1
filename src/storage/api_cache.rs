// Opportunistic market / jump-gate cache keyed by waypoint symbol
use dashmap::DashMap;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Market,
    JumpGate,
}

/// Two unbounded namespaces with no expiry. Concurrent writers for one key
/// race; the last write wins.
#[derive(Debug, Default)]
pub struct ApiCache {
    markets: DashMap<String, Value>,
    jump_gates: DashMap<String, Value>,
}

impl ApiCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn namespace(&self, kind: CacheKind) -> &DashMap<String, Value> {
        match kind {
            CacheKind::Market => &self.markets,
            CacheKind::JumpGate => &self.jump_gates,
        }
    }

    /// A cached market only counts once it carries transaction history; a
    /// jump gate counts as soon as anything was stored.
    pub fn get(&self, kind: CacheKind, waypoint_symbol: &str) -> Option<Value> {
        let entry = self.namespace(kind).get(waypoint_symbol)?;
        let usable = match kind {
            CacheKind::Market => entry.get("transactions").is_some_and(|t| !t.is_null()),
            CacheKind::JumpGate => true,
        };
        if usable {
            debug!(?kind, waypoint = waypoint_symbol, "cache hit");
            Some(entry.value().clone())
        } else {
            None
        }
    }

    pub fn put(&self, kind: CacheKind, waypoint_symbol: &str, value: Value) {
        self.namespace(kind).insert(waypoint_symbol.to_string(), value);
    }

    pub fn len(&self, kind: CacheKind) -> usize {
        self.namespace(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty() && self.jump_gates.is_empty()
    }

    /// Ordered copy of one namespace, for inspection and persistence
    pub fn snapshot(&self, kind: CacheKind) -> BTreeMap<String, Value> {
        self.namespace(kind)
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn clear(&self) {
        self.markets.clear();
        self.jump_gates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn market_without_transactions_is_a_miss() {
        let cache = ApiCache::new();
        cache.put(CacheKind::Market, "X1-A-B", json!({"symbol": "X1-A-B", "exports": []}));
        assert!(cache.get(CacheKind::Market, "X1-A-B").is_none());
        assert_eq!(cache.len(CacheKind::Market), 1);

        cache.put(CacheKind::Market, "X1-A-B", json!({"symbol": "X1-A-B", "transactions": []}));
        assert!(cache.get(CacheKind::Market, "X1-A-B").is_some());
    }

    #[test]
    fn namespaces_are_independent() {
        let cache = ApiCache::new();
        cache.put(CacheKind::JumpGate, "X1-A-G", json!({}));
        assert_eq!(cache.get(CacheKind::JumpGate, "X1-A-G"), Some(json!({})));
        assert!(cache.get(CacheKind::Market, "X1-A-G").is_none());
        assert_eq!(cache.snapshot(CacheKind::JumpGate).len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
