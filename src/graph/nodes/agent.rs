// Agent node: the authenticated player's agent and its fleet/contracts
use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::graph::node::{page_request, project_field, resolve_node, resolve_optional, GraphNode, PageNode};
use crate::graph::nodes::{str_field, ContractNode, FactionNode, ShipNode, WaypointNode};
use crate::graph::{Field, WaypointRef};
use crate::operations::Proxy;

pub struct AgentNode {
    data: Value,
}

impl AgentNode {
    pub fn new(data: Value) -> Self {
        Self { data }
    }
}

#[async_trait]
impl GraphNode for AgentNode {
    fn type_name(&self) -> &'static str {
        "Agent"
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        match field.name.as_str() {
            "headquarters" => {
                let node = str_field(&self.data, "headquarters")
                    .and_then(WaypointRef::from_symbol)
                    .map(WaypointNode::stub);
                resolve_optional(node.as_ref().map(|n| n as &dyn GraphNode), proxy, field).await
            }
            "startingFaction" => {
                let node = str_field(&self.data, "startingFaction").map(FactionNode::stub);
                resolve_optional(node.as_ref().map(|n| n as &dyn GraphNode), proxy, field).await
            }
            "ships" => {
                let page = proxy.ships().list_ships(page_request(field)?).await?.map(ShipNode::loaded);
                resolve_node(&PageNode { items: page.items, next: page.next }, proxy, field).await
            }
            "contracts" => {
                let page = proxy
                    .contracts()
                    .list_contracts(page_request(field)?)
                    .await?
                    .map(ContractNode::new);
                resolve_node(&PageNode { items: page.items, next: page.next }, proxy, field).await
            }
            name => Ok(project_field(self.data.get(name).unwrap_or(&Value::Null), field)),
        }
    }
}
