// System operations
use serde_json::{json, Value};
use tracing::debug;

use crate::client::SpaceTradersClient;
use crate::error::Result;
use crate::graph::{needs_fetch, Page, PageRequest};
use crate::operations::{fetch_data, fetch_page};

/// Fields a system reference already carries
pub const SYSTEM_IDENTITY_FIELDS: &[&str] = &["symbol"];

/// Optional filters of the waypoint list endpoint
#[derive(Debug, Clone, Default)]
pub struct WaypointFilter {
    pub traits: Option<String>,
    pub waypoint_type: Option<String>,
}

pub struct SystemOperations<'a> {
    client: &'a SpaceTradersClient,
}

impl<'a> SystemOperations<'a> {
    pub fn new(client: &'a SpaceTradersClient) -> Self {
        Self { client }
    }

    pub async fn list_systems(&self, request: PageRequest) -> Result<Page<Value>> {
        fetch_page(self.client, "/systems", request, &[]).await
    }

    pub async fn get_system(&self, system_symbol: &str) -> Result<Value> {
        fetch_data(self.client, &format!("/systems/{}", system_symbol)).await
    }

    /// Answer with `{symbol}` when nothing beyond the symbol was asked for,
    /// otherwise fetch the system.
    pub async fn get_system_for<'f>(
        &self,
        system_symbol: &str,
        requested: impl IntoIterator<Item = &'f str>,
    ) -> Result<Value> {
        if needs_fetch(requested, SYSTEM_IDENTITY_FIELDS) {
            self.get_system(system_symbol).await
        } else {
            debug!("System {} answered from its reference", system_symbol);
            Ok(json!({ "symbol": system_symbol }))
        }
    }

    pub async fn list_waypoints(
        &self,
        system_symbol: &str,
        request: PageRequest,
        filter: &WaypointFilter,
    ) -> Result<Page<Value>> {
        let filters = [("traits", filter.traits.clone()), ("type", filter.waypoint_type.clone())];
        fetch_page(self.client, &format!("/systems/{}/waypoints", system_symbol), request, &filters).await
    }
}
