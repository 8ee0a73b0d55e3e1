// Entry points of a document: the query root and the mutation root
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{ProxyError, Result};
use crate::graph::node::{
    page_request, project_field, resolve_list, resolve_node, unknown_field, GraphNode, PageNode, TYPENAME_FIELD,
};
use crate::graph::nodes::{
    waypoint_target, AgentNode, ContractActionsNode, ContractNode, FactionNode, ShipActionsNode, ShipNode,
    SystemNode, WaypointNode,
};
use crate::graph::{needs_fetch, parse_references, Field, ResourceRef, WaypointRef};
use crate::operations::{ConfigureArgs, Proxy, WaypointFilter, SYSTEM_IDENTITY_FIELDS};

/// `symbol` argument naming a waypoint
fn waypoint_arg(field: &Field) -> Result<WaypointRef> {
    let symbol = field.require_str("symbol")?;
    WaypointRef::from_symbol(&symbol)
        .ok_or_else(|| ProxyError::invalid(format!("'{}' is not a waypoint symbol", symbol)))
}

fn reference_node(reference: ResourceRef) -> Box<dyn GraphNode> {
    match reference {
        ResourceRef::System(system) => Box::new(SystemNode::stub(system.symbol)),
        ResourceRef::Waypoint(waypoint) => Box::new(WaypointNode::stub(waypoint)),
        ResourceRef::Ship(ship) => Box::new(ShipNode::stub(ship.symbol)),
        ResourceRef::Contract(contract) => Box::new(ContractNode::new(json!({ "id": contract.id }))),
    }
}

pub struct QueryRoot;

#[async_trait]
impl GraphNode for QueryRoot {
    fn type_name(&self) -> &'static str {
        "Query"
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        match field.name.as_str() {
            "agent" => {
                let agent = proxy.agent().get_agent().await?;
                resolve_node(&AgentNode::new(agent), proxy, field).await
            }
            "factions" => {
                let page = proxy
                    .factions()
                    .list_factions(page_request(field)?)
                    .await?
                    .map(FactionNode::loaded);
                resolve_node(&PageNode { items: page.items, next: page.next }, proxy, field).await
            }
            "faction" => resolve_node(&FactionNode::stub(field.require_str("symbol")?), proxy, field).await,
            "contracts" => {
                let page = proxy
                    .contracts()
                    .list_contracts(page_request(field)?)
                    .await?
                    .map(ContractNode::new);
                resolve_node(&PageNode { items: page.items, next: page.next }, proxy, field).await
            }
            "contract" => {
                let contract = proxy.contracts().get_contract(&field.require_str("id")?).await?;
                resolve_node(&ContractNode::new(contract), proxy, field).await
            }
            "ships" => {
                let page = proxy.ships().list_ships(page_request(field)?).await?.map(ShipNode::loaded);
                resolve_node(&PageNode { items: page.items, next: page.next }, proxy, field).await
            }
            "ship" => resolve_node(&ShipNode::stub(field.require_str("symbol")?), proxy, field).await,
            "systems" => {
                let page = proxy.systems().list_systems(page_request(field)?).await?.map(SystemNode::loaded);
                resolve_node(&PageNode { items: page.items, next: page.next }, proxy, field).await
            }
            "system" => {
                let symbol = field.require_str("symbol")?;
                let requested: Vec<&str> = field
                    .selection
                    .field_names()
                    .filter(|name| *name != TYPENAME_FIELD)
                    .collect();
                let fetched = needs_fetch(requested.iter().copied(), SYSTEM_IDENTITY_FIELDS);
                let data = proxy.systems().get_system_for(&symbol, requested).await?;
                let node = if fetched { SystemNode::loaded(data) } else { SystemNode::stub(symbol) };
                resolve_node(&node, proxy, field).await
            }
            "waypoints" => {
                let system = field.require_str("system")?;
                let filter = WaypointFilter {
                    traits: field.arg_str("traits")?,
                    waypoint_type: field.arg_str("type")?,
                };
                let page = proxy
                    .systems()
                    .list_waypoints(&system, page_request(field)?, &filter)
                    .await?
                    .map(WaypointNode::loaded);
                resolve_node(&PageNode { items: page.items, next: page.next }, proxy, field).await
            }
            "waypoint" => resolve_node(&WaypointNode::stub(waypoint_arg(field)?), proxy, field).await,
            "market" => {
                let market = proxy.waypoints().get_market(&waypoint_arg(field)?).await?;
                Ok(market.map(|m| project_field(&m, field)).unwrap_or(Value::Null))
            }
            "shipyard" => {
                let shipyard = proxy.waypoints().get_shipyard(&waypoint_arg(field)?).await?;
                Ok(shipyard.map(|s| project_field(&s, field)).unwrap_or(Value::Null))
            }
            "jumpGate" => {
                let gate = proxy.waypoints().get_jump_gate(&waypoint_arg(field)?).await?;
                Ok(gate.map(|g| project_field(&g, field)).unwrap_or(Value::Null))
            }
            "lookup" => {
                let nodes: Vec<Box<dyn GraphNode>> = parse_references(&field.require_str("text")?)
                    .into_iter()
                    .map(reference_node)
                    .collect();
                resolve_list(&nodes, proxy, field).await
            }
            other => Err(unknown_field(self.type_name(), other)),
        }
    }
}

pub struct MutationRoot;

#[async_trait]
impl GraphNode for MutationRoot {
    fn type_name(&self) -> &'static str {
        "Mutation"
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        match field.name.as_str() {
            "configure" => {
                let args = ConfigureArgs {
                    token: field.arg_str("token")?,
                    callsign: field.arg_str("callsign")?,
                    faction: field.arg_str("faction")?,
                    email: field.arg_str("email")?,
                };
                let data = proxy.agent().configure(args).await?;
                Ok(project_field(&data, field))
            }
            "purchaseShip" => {
                let ship_type = field.require_str("shipType")?;
                let data = proxy.ships().purchase_ship(&ship_type, &waypoint_target(field)?).await?;
                Ok(project_field(&data, field))
            }
            "ship" => resolve_node(&ShipActionsNode::new(field.require_str("symbol")?), proxy, field).await,
            "contract" => resolve_node(&ContractActionsNode::new(field.require_str("id")?), proxy, field).await,
            other => Err(unknown_field(self.type_name(), other)),
        }
    }
}
