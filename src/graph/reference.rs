// Typed references to remote entities and the free-text parser for symbols like `X1-AB12-XYZ`

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SystemRef {
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WaypointRef {
    #[serde(rename = "systemSymbol")]
    pub system_symbol: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ShipRef {
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContractRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind")]
pub enum ResourceRef {
    System(SystemRef),
    Waypoint(WaypointRef),
    Ship(ShipRef),
    Contract(ContractRef),
}

impl SystemRef {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into() }
    }
}

impl WaypointRef {
    pub fn new(system_symbol: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            system_symbol: system_symbol.into(),
            symbol: symbol.into(),
        }
    }

    /// Derive the system from the first two dash-separated segments
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let mut parts = symbol.splitn(3, '-');
        let sector = parts.next().filter(|s| !s.is_empty())?;
        let system = parts.next().filter(|s| !s.is_empty())?;
        parts.next().filter(|s| !s.is_empty())?;
        Some(Self::new(format!("{}-{}", sector, system), symbol))
    }

    pub fn system(&self) -> SystemRef {
        SystemRef::new(self.system_symbol.clone())
    }
}

impl ResourceRef {
    pub fn symbol(&self) -> &str {
        match self {
            ResourceRef::System(r) => &r.symbol,
            ResourceRef::Waypoint(r) => &r.symbol,
            ResourceRef::Ship(r) => &r.symbol,
            ResourceRef::Contract(r) => &r.id,
        }
    }
}

fn system_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^X1-[A-Z0-9]{3,4}$").expect("static system pattern"))
}

fn waypoint_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(X1-[A-Z0-9]{3,4})-[A-Z0-9]{3,6}$").expect("static waypoint pattern")
    })
}

/// Parse free text into the references it could denote. Input matching
/// neither pattern yields an empty list.
pub fn parse_references(text: &str) -> Vec<ResourceRef> {
    let text = text.trim().to_uppercase();

    if system_pattern().is_match(&text) {
        return vec![ResourceRef::System(SystemRef::new(text))];
    }
    if let Some(captures) = waypoint_pattern().captures(&text) {
        let system = captures[1].to_string();
        return vec![ResourceRef::Waypoint(WaypointRef::new(system, text.clone()))];
    }
    Vec::new()
}

/// Parse text that must name a waypoint
pub fn parse_waypoint(text: &str) -> Option<WaypointRef> {
    parse_references(text).into_iter().find_map(|r| match r {
        ResourceRef::Waypoint(w) => Some(w),
        _ => None,
    })
}

/// Parse text that must name a system
pub fn parse_system(text: &str) -> Option<SystemRef> {
    parse_references(text).into_iter().find_map(|r| match r {
        ResourceRef::System(s) => Some(s),
        _ => None,
    })
}
