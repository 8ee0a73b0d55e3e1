// Contract node
use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::graph::node::{project_field, resolve_list, resolve_optional, GraphNode};
use crate::graph::nodes::{str_field, FactionNode, WaypointNode};
use crate::graph::{Field, WaypointRef};
use crate::operations::Proxy;

pub struct ContractNode {
    data: Value,
}

impl ContractNode {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// Distinct delivery destinations, in the order the terms list them
    fn destinations(&self) -> Vec<WaypointRef> {
        let mut out: Vec<WaypointRef> = Vec::new();
        let deliveries = self
            .data
            .pointer("/terms/deliver")
            .and_then(Value::as_array)
            .into_iter()
            .flatten();
        for delivery in deliveries {
            let Some(reference) = str_field(delivery, "destinationSymbol").and_then(WaypointRef::from_symbol) else {
                continue;
            };
            if !out.contains(&reference) {
                out.push(reference);
            }
        }
        out
    }
}

#[async_trait]
impl GraphNode for ContractNode {
    fn type_name(&self) -> &'static str {
        "Contract"
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        match field.name.as_str() {
            "faction" => {
                let node = str_field(&self.data, "factionSymbol").map(FactionNode::stub);
                resolve_optional(node.as_ref().map(|n| n as &dyn GraphNode), proxy, field).await
            }
            "destinations" => {
                let nodes: Vec<WaypointNode> = self.destinations().into_iter().map(WaypointNode::stub).collect();
                resolve_list(&nodes, proxy, field).await
            }
            name => Ok(project_field(self.data.get(name).unwrap_or(&Value::Null), field)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn destinations_are_deduplicated() {
        let contract = ContractNode::new(json!({
            "id": "c1",
            "terms": {"deliver": [
                {"tradeSymbol": "IRON_ORE", "destinationSymbol": "X1-DF55-A1"},
                {"tradeSymbol": "COPPER_ORE", "destinationSymbol": "X1-DF55-A1"},
                {"tradeSymbol": "ICE_WATER", "destinationSymbol": "X1-DF55-B2"}
            ]}
        }));
        let symbols: Vec<String> = contract.destinations().into_iter().map(|w| w.symbol).collect();
        assert_eq!(symbols, vec!["X1-DF55-A1", "X1-DF55-B2"]);
    }
}
