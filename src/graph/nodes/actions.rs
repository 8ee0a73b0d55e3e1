// Mutation-side nodes: every field is one forwarded action
use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::graph::node::{project_field, unknown_field, GraphNode};
use crate::graph::nodes::{ship_target, system_target, waypoint_target};
use crate::graph::Field;
use crate::models::FlightMode;
use crate::operations::{DeliverArgs, NavigateOutcome, Proxy, ShipTarget};

/// Route payload with the scheduled arrival ticket under `arrival`
fn with_arrival(outcome: NavigateOutcome) -> Result<Value> {
    let mut data = outcome.data;
    if let (Some(map), Some(ticket)) = (data.as_object_mut(), outcome.arrival) {
        map.insert("arrival".to_string(), serde_json::to_value(ticket)?);
    }
    Ok(data)
}

/// Actions of one ship, reached through `mutation { ship(symbol: ...) { ... } }`
pub struct ShipActionsNode {
    symbol: String,
}

impl ShipActionsNode {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into() }
    }

    async fn perform(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        let ships = proxy.ships();
        let ship = self.symbol.as_str();
        match field.name.as_str() {
            "orbit" => ships.orbit(ship).await,
            "dock" => ships.dock(ship).await,
            "refuel" => {
                ships
                    .refuel(ship, field.arg_u32("units")?, field.arg_bool("fromCargo")?)
                    .await
            }
            "navigate" => with_arrival(ships.navigate(ship, &waypoint_target(field)?).await?),
            "setFlightMode" => {
                let mode: FlightMode = field.require_str("mode")?.parse()?;
                ships.set_flight_mode(ship, mode).await
            }
            "extract" => ships.extract(ship, field.arg("survey").cloned()).await,
            "survey" => ships.create_survey(ship).await,
            "sell" => {
                ships
                    .sell_cargo(ship, &field.require_str("symbol")?, field.require_u32("units")?)
                    .await
            }
            "purchase" => {
                ships
                    .purchase_cargo(ship, &field.require_str("symbol")?, field.require_u32("units")?)
                    .await
            }
            "jettison" => {
                ships
                    .jettison(ship, &field.require_str("symbol")?, field.require_u32("units")?)
                    .await
            }
            "transfer" => {
                let to = ship_target(field)?;
                ships
                    .transfer_cargo(ship, &field.require_str("tradeSymbol")?, field.require_u32("units")?, &to)
                    .await
            }
            "refine" => ships.refine(ship, &field.require_str("produce")?).await,
            "jump" => ships.jump(ship, &system_target(field)?).await,
            "warp" => with_arrival(ships.warp(ship, &waypoint_target(field)?).await?),
            "chart" => ships.chart(ship).await,
            "installMount" => ships.install_mount(ship, &field.require_str("symbol")?).await,
            "removeMount" => ships.remove_mount(ship, &field.require_str("symbol")?).await,
            "negotiateContract" => proxy.contracts().negotiate_contract(&ShipTarget::symbol(ship)).await,
            "scanWaypoints" => ships.scan_waypoints(ship).await,
            "scanSystems" => ships.scan_systems(ship).await,
            "scanShips" => ships.scan_ships(ship).await,
            "cancelArrival" => Ok(Value::Bool(proxy.arrivals().cancel(ship))),
            other => Err(unknown_field(self.type_name(), other)),
        }
    }
}

#[async_trait]
impl GraphNode for ShipActionsNode {
    fn type_name(&self) -> &'static str {
        "ShipActions"
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        let data = self.perform(proxy, field).await?;
        Ok(project_field(&data, field))
    }
}

/// Actions of one contract, reached through `mutation { contract(id: ...) { ... } }`
pub struct ContractActionsNode {
    id: String,
}

impl ContractActionsNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl GraphNode for ContractActionsNode {
    fn type_name(&self) -> &'static str {
        "ContractActions"
    }

    async fn resolve_field(&self, proxy: &Proxy, field: &Field) -> Result<Value> {
        let contracts = proxy.contracts();
        let data = match field.name.as_str() {
            "accept" => contracts.accept_contract(&self.id).await?,
            "fulfill" => contracts.fulfill_contract(&self.id).await?,
            "deliver" => {
                let args = DeliverArgs {
                    ship: ship_target(field)?,
                    trade_symbol: field.require_str("tradeSymbol")?,
                    units: field.require_u32("units")?,
                };
                contracts.deliver_contract(&self.id, args).await?
            }
            other => return Err(unknown_field(self.type_name(), other)),
        };
        Ok(project_field(&data, field))
    }
}
