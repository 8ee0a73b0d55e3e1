use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize, Clone)]
pub struct Trait {
    pub symbol: String,
}

/// The parts of a waypoint payload that say which facilities it hosts
#[derive(Debug, Deserialize, Clone, Default)]
pub struct WaypointFacilities {
    #[serde(rename = "type")]
    pub waypoint_type: Option<String>,
    pub traits: Option<Vec<Trait>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facility {
    Market,
    Shipyard,
    JumpGate,
}

impl WaypointFacilities {
    pub fn from_value(data: &Value) -> Self {
        serde_json::from_value(data.clone()).unwrap_or_default()
    }

    fn has_trait(&self, symbol: &str) -> Option<bool> {
        self.traits
            .as_ref()
            .map(|traits| traits.iter().any(|t| t.symbol == symbol))
    }

    /// `Some(false)` when the payload rules the facility out, `None` when it
    /// does not say.
    pub fn hosts(&self, facility: Facility) -> Option<bool> {
        match facility {
            Facility::Market => self.has_trait("MARKETPLACE"),
            Facility::Shipyard => self.has_trait("SHIPYARD"),
            Facility::JumpGate => self.waypoint_type.as_ref().map(|t| t == "JUMP_GATE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_traits_and_type() {
        let facilities = WaypointFacilities::from_value(&json!({
            "symbol": "X1-A-B",
            "type": "PLANET",
            "traits": [{"symbol": "MARKETPLACE", "name": "Marketplace"}]
        }));
        assert_eq!(facilities.hosts(Facility::Market), Some(true));
        assert_eq!(facilities.hosts(Facility::Shipyard), Some(false));
        assert_eq!(facilities.hosts(Facility::JumpGate), Some(false));
    }

    #[test]
    fn stub_says_nothing() {
        let facilities = WaypointFacilities::from_value(&json!({"symbol": "X1-A-B"}));
        assert_eq!(facilities.hosts(Facility::Market), None);
        assert_eq!(facilities.hosts(Facility::JumpGate), None);
    }
}
