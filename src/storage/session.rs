// Explicitly owned session state: credential plus both caches
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::api_cache::{ApiCache, CacheKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    /// Callsign the token was registered for, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_symbol: Option<String>,
}

impl Credential {
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            agent_symbol: None,
        }
    }
}

/// On-disk form of a session
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub credential: Option<Credential>,
    #[serde(default)]
    pub markets: BTreeMap<String, Value>,
    #[serde(default)]
    pub jump_gates: BTreeMap<String, Value>,
}

#[derive(Debug, Default)]
pub struct Session {
    credential: RwLock<Option<Credential>>,
    cache: ApiCache,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_credential(Credential::token(token));
        session
    }

    pub fn credential(&self) -> Option<Credential> {
        self.credential.read().clone()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.credential.read().as_ref().map(|c| c.token.clone())
    }

    pub fn set_credential(&self, credential: Credential) {
        *self.credential.write() = Some(credential);
    }

    pub fn cache(&self) -> &ApiCache {
        &self.cache
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            credential: self.credential(),
            markets: self.cache.snapshot(CacheKind::Market),
            jump_gates: self.cache.snapshot(CacheKind::JumpGate),
        }
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let session = Self::new();
        if let Some(credential) = snapshot.credential {
            session.set_credential(credential);
        }
        for (waypoint, market) in snapshot.markets {
            session.cache.put(CacheKind::Market, &waypoint, market);
        }
        for (waypoint, gate) in snapshot.jump_gates {
            session.cache.put(CacheKind::JumpGate, &waypoint, gate);
        }
        session
    }

    /// Load a persisted session, starting empty when the file is missing or unreadable
    pub fn load_or_default(path: &str) -> Self {
        if !Path::new(path).exists() {
            debug!("No session state at {}, starting empty", path);
            return Self::new();
        }
        match Self::load(path) {
            Ok(session) => session,
            Err(e) => {
                warn!("Failed to load session state from {}: {}", path, e);
                Self::new()
            }
        }
    }

    pub fn load(path: &str) -> Result<Self> {
        let json_str = fs::read_to_string(path)?;
        let snapshot: SessionSnapshot = serde_json::from_str(&json_str)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json_str = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, json_str)?;
        debug!("Saved session state to {}", path);
        Ok(())
    }

    /// Save whatever the session gathered, whether or not `outcome` succeeded.
    /// A failed save is only reported when the outcome itself was fine.
    pub fn save_after<T>(&self, path: &str, outcome: Result<T>) -> Result<T> {
        match (self.save(path), outcome) {
            (Ok(()), outcome) => outcome,
            (Err(save_err), Ok(_)) => Err(save_err),
            (Err(save_err), Err(err)) => {
                warn!("Failed to save session state to {}: {}", path, save_err);
                Err(err)
            }
        }
    }
}
