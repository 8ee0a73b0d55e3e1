// Factions, systems and waypoints: lazily fetched entities linked by symbol
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;
use crate::graph::node::{
    page_request, project_field, resolve_list, resolve_node, resolve_optional, GraphNode, Lazy, PageNode,
};
use crate::graph::nodes::str_field;
use crate::graph::{Field, WaypointRef};
use crate::models::{Facility, WaypointFacilities};
use crate::operations::{Proxy, WaypointFilter};

pub struct FactionNode {
    symbol: String,
    lazy: Lazy,
}

impl FactionNode {
    pub fn stub(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            lazy: Lazy::known(json!({ "symbol": symbol })),
            symbol,
        }
    }

    pub fn loaded(data: Value) -> Self {
        Self {
            symbol: str_field(&data, "symbol").unwrap_or_default().to_string(),
            lazy: Lazy::loaded(data),
        }
    }
}

#[async_trait]
impl GraphNode for FactionNode {
    fn type_name(&self) -> &'static str {
        "Faction"
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        let load = || async move { proxy.factions().get_faction(&self.symbol).await };
        match field.name.as_str() {
            "headquarters" => {
                let hq = self.lazy.get("headquarters", load).await?;
                let node = hq.as_str().and_then(WaypointRef::from_symbol).map(WaypointNode::stub);
                resolve_optional(node.as_ref().map(|n| n as &dyn GraphNode), proxy, field).await
            }
            name => Ok(project_field(&self.lazy.get(name, load).await?, field)),
        }
    }
}

pub struct SystemNode {
    symbol: String,
    lazy: Lazy,
}

impl SystemNode {
    pub fn stub(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            lazy: Lazy::known(json!({ "symbol": symbol })),
            symbol,
        }
    }

    pub fn loaded(data: Value) -> Self {
        Self {
            symbol: str_field(&data, "symbol").unwrap_or_default().to_string(),
            lazy: Lazy::loaded(data),
        }
    }
}

#[async_trait]
impl GraphNode for SystemNode {
    fn type_name(&self) -> &'static str {
        "System"
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        let load = || async move { proxy.systems().get_system(&self.symbol).await };
        match field.name.as_str() {
            // the short entries embedded in the system payload
            "waypoints" => {
                let entries = self.lazy.get("waypoints", load).await?;
                let nodes: Vec<WaypointNode> = entries
                    .as_array()
                    .map(|entries| {
                        entries
                            .iter()
                            .filter_map(|entry| WaypointNode::partial(entry.clone(), &self.symbol))
                            .collect()
                    })
                    .unwrap_or_default();
                resolve_list(&nodes, proxy, field).await
            }
            // the paged, filterable waypoint list endpoint
            "waypointPage" => {
                let filter = WaypointFilter {
                    traits: field.arg_str("traits")?,
                    waypoint_type: field.arg_str("type")?,
                };
                let page = proxy
                    .systems()
                    .list_waypoints(&self.symbol, page_request(field)?, &filter)
                    .await?;
                let page = page.map(WaypointNode::loaded);
                resolve_node(&PageNode { items: page.items, next: page.next }, proxy, field).await
            }
            "factions" => {
                let factions = self.lazy.get("factions", load).await?;
                let nodes: Vec<FactionNode> = symbols_of(&factions).map(FactionNode::stub).collect();
                resolve_list(&nodes, proxy, field).await
            }
            name => Ok(project_field(&self.lazy.get(name, load).await?, field)),
        }
    }
}

/// `symbol` of every object in a JSON array
fn symbols_of(value: &Value) -> impl Iterator<Item = &str> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| str_field(entry, "symbol"))
}

pub struct WaypointNode {
    reference: WaypointRef,
    lazy: Lazy,
}

impl WaypointNode {
    /// Only the identity is known
    pub fn stub(reference: WaypointRef) -> Self {
        Self {
            lazy: Lazy::known(json!({
                "symbol": reference.symbol,
                "systemSymbol": reference.system_symbol
            })),
            reference,
        }
    }

    /// A short entry, e.g. from a system's waypoint list
    pub fn partial(mut entry: Value, system_symbol: &str) -> Option<Self> {
        let symbol = str_field(&entry, "symbol")?.to_string();
        if let Some(map) = entry.as_object_mut() {
            map.entry("systemSymbol").or_insert_with(|| json!(system_symbol));
        }
        Some(Self {
            reference: WaypointRef::new(system_symbol, symbol),
            lazy: Lazy::known(entry),
        })
    }

    pub fn loaded(data: Value) -> Self {
        let symbol = str_field(&data, "symbol").unwrap_or_default();
        let reference = match str_field(&data, "systemSymbol") {
            Some(system) => WaypointRef::new(system, symbol),
            None => WaypointRef::from_symbol(symbol).unwrap_or_else(|| WaypointRef::new("", symbol)),
        };
        Self {
            reference,
            lazy: Lazy::loaded(data),
        }
    }

    async fn facility(&self, proxy: &Proxy, field: &Field, facility: Facility) -> Result<Value> {
        let known = WaypointFacilities::from_value(self.lazy.current());
        let data = proxy.waypoints().facility(&self.reference, &known, facility).await?;
        Ok(data.map(|data| project_field(&data, field)).unwrap_or(Value::Null))
    }

    fn neighbour(&self, symbol: &str) -> WaypointNode {
        WaypointNode::stub(WaypointRef::new(self.reference.system_symbol.clone(), symbol))
    }
}

#[async_trait]
impl GraphNode for WaypointNode {
    fn type_name(&self) -> &'static str {
        "Waypoint"
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        let load = || async move { proxy.waypoints().get_waypoint(&self.reference).await };
        match field.name.as_str() {
            "system" => resolve_node(&SystemNode::stub(self.reference.system_symbol.clone()), proxy, field).await,
            "orbitals" => {
                let orbitals = self.lazy.get("orbitals", load).await?;
                let nodes: Vec<WaypointNode> = symbols_of(&orbitals).map(|s| self.neighbour(s)).collect();
                resolve_list(&nodes, proxy, field).await
            }
            "orbits" => {
                let orbits = self.lazy.get("orbits", load).await?;
                let node = orbits.as_str().map(|s| self.neighbour(s));
                resolve_optional(node.as_ref().map(|n| n as &dyn GraphNode), proxy, field).await
            }
            "faction" => {
                let faction = self.lazy.get("faction", load).await?;
                let node = str_field(&faction, "symbol").map(FactionNode::stub);
                resolve_optional(node.as_ref().map(|n| n as &dyn GraphNode), proxy, field).await
            }
            "market" => self.facility(proxy, field, Facility::Market).await,
            "shipyard" => self.facility(proxy, field, Facility::Shipyard).await,
            "jumpGate" => self.facility(proxy, field, Facility::JumpGate).await,
            name => Ok(project_field(&self.lazy.get(name, load).await?, field)),
        }
    }
}
