// Individual ship operations module
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::client::SpaceTradersClient;
use crate::error::Result;
use crate::graph::{Page, PageRequest, WaypointRef};
use crate::models::{unwrap_data, FlightMode, ShipNav};
use crate::operations::{
    fetch_data, fetch_page, post_action, ArrivalScheduler, ArrivalTicket, ShipTarget, SystemTarget, WaypointTarget,
};

/// Result of a navigate or warp call: the API payload plus the scheduled arrival
#[derive(Debug, Clone)]
pub struct NavigateOutcome {
    pub data: Value,
    pub arrival: Option<ArrivalTicket>,
}

pub struct ShipOperations<'a> {
    client: &'a SpaceTradersClient,
    arrivals: &'a ArrivalScheduler,
}

impl<'a> ShipOperations<'a> {
    pub fn new(client: &'a SpaceTradersClient, arrivals: &'a ArrivalScheduler) -> Self {
        Self { client, arrivals }
    }

    fn path(ship_symbol: &str, action: &str) -> String {
        format!("/my/ships/{}/{}", ship_symbol, action)
    }

    pub async fn list_ships(&self, request: PageRequest) -> Result<Page<Value>> {
        fetch_page(self.client, "/my/ships", request, &[]).await
    }

    pub async fn get_ship(&self, ship_symbol: &str) -> Result<Value> {
        fetch_data(self.client, &format!("/my/ships/{}", ship_symbol)).await
    }

    /// Empty object while the ship has no active cooldown (the API answers 204)
    pub async fn get_cooldown(&self, ship_symbol: &str) -> Result<Value> {
        fetch_data(self.client, &Self::path(ship_symbol, "cooldown")).await
    }

    pub async fn get_cargo(&self, ship_symbol: &str) -> Result<Value> {
        fetch_data(self.client, &Self::path(ship_symbol, "cargo")).await
    }

    pub async fn purchase_ship(&self, ship_type: &str, waypoint: &WaypointTarget) -> Result<Value> {
        let waypoint_symbol = waypoint.resolve()?;
        let payload = json!({
            "shipType": ship_type,
            "waypointSymbol": waypoint_symbol
        });
        info!("Purchasing {} at {}", ship_type, waypoint_symbol);
        post_action(self.client, "/my/ships", Some(payload)).await
    }

    pub async fn orbit(&self, ship_symbol: &str) -> Result<Value> {
        post_action(self.client, &Self::path(ship_symbol, "orbit"), None).await
    }

    pub async fn dock(&self, ship_symbol: &str) -> Result<Value> {
        post_action(self.client, &Self::path(ship_symbol, "dock"), None).await
    }

    pub async fn refuel(&self, ship_symbol: &str, units: Option<u32>, from_cargo: Option<bool>) -> Result<Value> {
        let mut payload = json!({});
        if let Some(units) = units {
            payload["units"] = json!(units);
        }
        if let Some(from_cargo) = from_cargo {
            payload["fromCargo"] = json!(from_cargo);
        }
        post_action(self.client, &Self::path(ship_symbol, "refuel"), Some(payload)).await
    }

    /// Navigate within the system and schedule an arrival notification for the
    /// route's arrival time.
    pub async fn navigate(&self, ship_symbol: &str, waypoint: &WaypointTarget) -> Result<NavigateOutcome> {
        let waypoint_symbol = waypoint.resolve()?;
        let payload = json!({ "waypointSymbol": waypoint_symbol });
        let data = post_action(self.client, &Self::path(ship_symbol, "navigate"), Some(payload)).await?;

        let arrival = self.schedule_arrival(ship_symbol, &data);
        Ok(NavigateOutcome { data, arrival })
    }

    /// Replaces any pending arrival of the ship; a response without a route leaves none
    fn schedule_arrival(&self, ship_symbol: &str, data: &Value) -> Option<ArrivalTicket> {
        let route = match data.get("nav").cloned().map(serde_json::from_value::<ShipNav>) {
            Some(Ok(ShipNav { route: Some(route), .. })) => route,
            _ => {
                debug!("Route response for {} had no readable nav route", ship_symbol);
                self.arrivals.cancel(ship_symbol);
                return None;
            }
        };
        let destination = WaypointRef::new(route.destination.system_symbol, route.destination.symbol);
        Some(self.arrivals.schedule(ship_symbol, destination, route.arrival))
    }

    pub async fn set_flight_mode(&self, ship_symbol: &str, mode: FlightMode) -> Result<Value> {
        let payload = json!({ "flightMode": mode.as_str() });
        let response = self.client.patch(&Self::path(ship_symbol, "nav"), Some(&payload)).await?;
        Ok(unwrap_data(response))
    }

    /// Extract at the current waypoint, optionally steering the yield with a survey
    pub async fn extract(&self, ship_symbol: &str, survey: Option<Value>) -> Result<Value> {
        let payload = survey.map(|survey| json!({ "survey": survey }));
        post_action(self.client, &Self::path(ship_symbol, "extract"), payload).await
    }

    pub async fn create_survey(&self, ship_symbol: &str) -> Result<Value> {
        post_action(self.client, &Self::path(ship_symbol, "survey"), None).await
    }

    pub async fn sell_cargo(&self, ship_symbol: &str, trade_symbol: &str, units: u32) -> Result<Value> {
        let payload = json!({ "symbol": trade_symbol, "units": units });
        post_action(self.client, &Self::path(ship_symbol, "sell"), Some(payload)).await
    }

    pub async fn purchase_cargo(&self, ship_symbol: &str, trade_symbol: &str, units: u32) -> Result<Value> {
        let payload = json!({ "symbol": trade_symbol, "units": units });
        post_action(self.client, &Self::path(ship_symbol, "purchase"), Some(payload)).await
    }

    pub async fn jettison(&self, ship_symbol: &str, trade_symbol: &str, units: u32) -> Result<Value> {
        let payload = json!({ "symbol": trade_symbol, "units": units });
        post_action(self.client, &Self::path(ship_symbol, "jettison"), Some(payload)).await
    }

    pub async fn transfer_cargo(
        &self,
        ship_symbol: &str,
        trade_symbol: &str,
        units: u32,
        to: &ShipTarget,
    ) -> Result<Value> {
        let target_symbol = to.resolve()?;
        let payload = json!({
            "tradeSymbol": trade_symbol,
            "units": units,
            "shipSymbol": target_symbol
        });
        post_action(self.client, &Self::path(ship_symbol, "transfer"), Some(payload)).await
    }

    pub async fn refine(&self, ship_symbol: &str, produce: &str) -> Result<Value> {
        let payload = json!({ "produce": produce });
        post_action(self.client, &Self::path(ship_symbol, "refine"), Some(payload)).await
    }

    /// Jump to another system; drops any pending arrival of the ship
    pub async fn jump(&self, ship_symbol: &str, system: &SystemTarget) -> Result<Value> {
        let system_symbol = system.resolve()?;
        let payload = json!({ "systemSymbol": system_symbol });
        let data = post_action(self.client, &Self::path(ship_symbol, "jump"), Some(payload)).await?;
        if self.arrivals.cancel(ship_symbol) {
            debug!("Dropped pending arrival of {} after jump", ship_symbol);
        }
        Ok(data)
    }

    pub async fn warp(&self, ship_symbol: &str, waypoint: &WaypointTarget) -> Result<NavigateOutcome> {
        let waypoint_symbol = waypoint.resolve()?;
        let payload = json!({ "waypointSymbol": waypoint_symbol });
        let data = post_action(self.client, &Self::path(ship_symbol, "warp"), Some(payload)).await?;

        let arrival = self.schedule_arrival(ship_symbol, &data);
        Ok(NavigateOutcome { data, arrival })
    }

    pub async fn chart(&self, ship_symbol: &str) -> Result<Value> {
        post_action(self.client, &Self::path(ship_symbol, "chart"), None).await
    }

    pub async fn install_mount(&self, ship_symbol: &str, mount_symbol: &str) -> Result<Value> {
        let payload = json!({ "symbol": mount_symbol });
        post_action(self.client, &Self::path(ship_symbol, "mounts/install"), Some(payload)).await
    }

    pub async fn remove_mount(&self, ship_symbol: &str, mount_symbol: &str) -> Result<Value> {
        let payload = json!({ "symbol": mount_symbol });
        post_action(self.client, &Self::path(ship_symbol, "mounts/remove"), Some(payload)).await
    }

    pub async fn scan_waypoints(&self, ship_symbol: &str) -> Result<Value> {
        post_action(self.client, &Self::path(ship_symbol, "scan/waypoints"), None).await
    }

    pub async fn scan_systems(&self, ship_symbol: &str) -> Result<Value> {
        post_action(self.client, &Self::path(ship_symbol, "scan/systems"), None).await
    }

    pub async fn scan_ships(&self, ship_symbol: &str) -> Result<Value> {
        post_action(self.client, &Self::path(ship_symbol, "scan/ships"), None).await
    }
}
