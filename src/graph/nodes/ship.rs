// Ship node: the fetched ship plus fields derived from its nav block
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;
use crate::graph::node::{project_field, resolve_optional, GraphNode, Lazy};
use crate::graph::nodes::{str_field, SystemNode, WaypointNode};
use crate::graph::{Field, WaypointRef};
use crate::models::ShipNav;
use crate::operations::Proxy;

pub struct ShipNode {
    symbol: String,
    lazy: Lazy,
}

impl ShipNode {
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

    async fn nav(&self, proxy: &Proxy) -> Result<Option<ShipNav>> {
        let nav = self
            .lazy
            .get("nav", || async move { proxy.ships().get_ship(&self.symbol).await })
            .await?;
        Ok(serde_json::from_value(nav).ok())
    }
}

#[async_trait]
impl GraphNode for ShipNode {
    fn type_name(&self) -> &'static str {
        "Ship"
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        match field.name.as_str() {
            "statusText" => Ok(self
                .nav(proxy)
                .await?
                .map(|nav| Value::String(nav.status_text()))
                .unwrap_or(Value::Null)),
            "location" => {
                let node = self
                    .nav(proxy)
                    .await?
                    .map(|nav| WaypointNode::stub(WaypointRef::new(nav.system_symbol, nav.waypoint_symbol)));
                resolve_optional(node.as_ref().map(|n| n as &dyn GraphNode), proxy, field).await
            }
            "system" => {
                let node = self.nav(proxy).await?.map(|nav| SystemNode::stub(nav.system_symbol));
                resolve_optional(node.as_ref().map(|n| n as &dyn GraphNode), proxy, field).await
            }
            "destination" => {
                let node = self.nav(proxy).await?.and_then(|nav| nav.route).map(|route| {
                    WaypointNode::stub(WaypointRef::new(
                        route.destination.system_symbol,
                        route.destination.symbol,
                    ))
                });
                resolve_optional(node.as_ref().map(|n| n as &dyn GraphNode), proxy, field).await
            }
            "cooldown" => Ok(project_field(&proxy.ships().get_cooldown(&self.symbol).await?, field)),
            // always fetched fresh, unlike the snapshot inside the ship payload
            "cargo" => Ok(project_field(&proxy.ships().get_cargo(&self.symbol).await?, field)),
            "arrival" => {
                let ticket = proxy.arrivals().pending(&self.symbol);
                let value = match ticket {
                    Some(ticket) => serde_json::to_value(ticket)?,
                    None => Value::Null,
                };
                Ok(project_field(&value, field))
            }
            name => {
                let value = self
                    .lazy
                    .get(name, || async move { proxy.ships().get_ship(&self.symbol).await })
                    .await?;
                Ok(project_field(&value, field))
            }
        }
    }
}
