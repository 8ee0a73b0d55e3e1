// Waypoint operations: the waypoint itself and its optional facilities
use serde_json::Value;
use tracing::debug;

use crate::client::SpaceTradersClient;
use crate::error::Result;
use crate::graph::WaypointRef;
use crate::models::{Facility, WaypointFacilities};
use crate::operations::fetch_data;
use crate::storage::CacheKind;

/// Statuses the API uses to say a waypoint has no such facility
const MARKET_MISSING: &[u16] = &[404];
const SHIPYARD_MISSING: &[u16] = &[404];
const JUMP_GATE_MISSING: &[u16] = &[400, 404];

pub struct WaypointOperations<'a> {
    client: &'a SpaceTradersClient,
}

impl<'a> WaypointOperations<'a> {
    pub fn new(client: &'a SpaceTradersClient) -> Self {
        Self { client }
    }

    fn path(waypoint: &WaypointRef, facility: &str) -> String {
        format!("/systems/{}/waypoints/{}/{}", waypoint.system_symbol, waypoint.symbol, facility)
    }

    pub async fn get_waypoint(&self, waypoint: &WaypointRef) -> Result<Value> {
        fetch_data(
            self.client,
            &format!("/systems/{}/waypoints/{}", waypoint.system_symbol, waypoint.symbol),
        )
        .await
    }

    /// Market, served from the cache once a copy with transaction history is held
    pub async fn get_market(&self, waypoint: &WaypointRef) -> Result<Option<Value>> {
        let cache = self.client.session().cache();
        if let Some(market) = cache.get(CacheKind::Market, &waypoint.symbol) {
            return Ok(Some(market));
        }

        match fetch_data(self.client, &Self::path(waypoint, "market")).await {
            Ok(market) => {
                cache.put(CacheKind::Market, &waypoint.symbol, market.clone());
                Ok(Some(market))
            }
            Err(e) if e.has_status(MARKET_MISSING) => {
                debug!("No market at {}", waypoint.symbol);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get_shipyard(&self, waypoint: &WaypointRef) -> Result<Option<Value>> {
        match fetch_data(self.client, &Self::path(waypoint, "shipyard")).await {
            Ok(shipyard) => Ok(Some(shipyard)),
            Err(e) if e.has_status(SHIPYARD_MISSING) => {
                debug!("No shipyard at {}", waypoint.symbol);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Jump gate, served from the cache after any successful fetch
    pub async fn get_jump_gate(&self, waypoint: &WaypointRef) -> Result<Option<Value>> {
        let cache = self.client.session().cache();
        if let Some(gate) = cache.get(CacheKind::JumpGate, &waypoint.symbol) {
            return Ok(Some(gate));
        }

        match fetch_data(self.client, &Self::path(waypoint, "jump-gate")).await {
            Ok(gate) => {
                cache.put(CacheKind::JumpGate, &waypoint.symbol, gate.clone());
                Ok(Some(gate))
            }
            Err(e) if e.has_status(JUMP_GATE_MISSING) => {
                debug!("No jump gate at {}", waypoint.symbol);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch a facility unless the waypoint's known traits/type rule it out
    pub async fn facility(
        &self,
        waypoint: &WaypointRef,
        known: &WaypointFacilities,
        facility: Facility,
    ) -> Result<Option<Value>> {
        if known.hosts(facility) == Some(false) {
            return Ok(None);
        }
        match facility {
            Facility::Market => self.get_market(waypoint).await,
            Facility::Shipyard => self.get_shipyard(waypoint).await,
            Facility::JumpGate => self.get_jump_gate(waypoint).await,
        }
    }
}
