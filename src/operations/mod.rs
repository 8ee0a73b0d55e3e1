// Operations module - per-entity resolvers over the API client

pub mod agent;
pub mod arrivals;
pub mod contracts;
pub mod factions;
pub mod ships;
pub mod systems;
pub mod targets;
pub mod waypoints;

pub use agent::*;
pub use arrivals::*;
pub use contracts::*;
pub use factions::*;
pub use ships::*;
pub use systems::*;
pub use targets::*;
pub use waypoints::*;

use std::sync::Arc;

use crate::client::SpaceTradersClient;
use crate::config::ProxyConfig;
use crate::error::Result;
use crate::graph::{Page, PageRequest};
use crate::models::{parse_list, unwrap_data};
use crate::storage::Session;

/// Everything a resolver needs: the API client (and through it the session)
/// plus the arrival scheduler.
#[derive(Clone)]
pub struct Proxy {
    client: SpaceTradersClient,
    arrivals: ArrivalScheduler,
}

impl Proxy {
    pub fn new(client: SpaceTradersClient) -> Self {
        Self {
            client,
            arrivals: ArrivalScheduler::new(),
        }
    }

    /// Production wiring: reqwest transport configured from `config`
    pub fn connect(config: &ProxyConfig, session: Arc<Session>) -> Result<Self> {
        let client = SpaceTradersClient::new(&config.api, config.retry.clone(), session)?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &SpaceTradersClient {
        &self.client
    }

    pub fn session(&self) -> &Arc<Session> {
        self.client.session()
    }

    pub fn arrivals(&self) -> &ArrivalScheduler {
        &self.arrivals
    }

    pub fn agent(&self) -> AgentOperations<'_> {
        AgentOperations::new(&self.client)
    }

    pub fn factions(&self) -> FactionOperations<'_> {
        FactionOperations::new(&self.client)
    }

    pub fn contracts(&self) -> ContractOperations<'_> {
        ContractOperations::new(&self.client)
    }

    pub fn ships(&self) -> ShipOperations<'_> {
        ShipOperations::new(&self.client, &self.arrivals)
    }

    pub fn systems(&self) -> SystemOperations<'_> {
        SystemOperations::new(&self.client)
    }

    pub fn waypoints(&self) -> WaypointOperations<'_> {
        WaypointOperations::new(&self.client)
    }
}

/// GET one page of a list endpoint, with any extra filters
pub(crate) async fn fetch_page(
    client: &SpaceTradersClient,
    path: &str,
    request: PageRequest,
    filters: &[crate::client::QueryParam<'_>],
) -> Result<Page<serde_json::Value>> {
    let mut query: Vec<crate::client::QueryParam<'_>> = request.query().into_iter().collect();
    query.extend(filters.iter().cloned());
    let list = parse_list(client.get(path, &query).await?)?;
    Ok(Page {
        next: PageRequest::next_after(&list.meta),
        items: list.data,
    })
}

/// GET a single entity and strip its `data` envelope
pub(crate) async fn fetch_data(client: &SpaceTradersClient, path: &str) -> Result<serde_json::Value> {
    Ok(unwrap_data(client.get(path, &[]).await?))
}

/// POST an action and strip its `data` envelope
pub(crate) async fn post_action(
    client: &SpaceTradersClient,
    path: &str,
    body: Option<serde_json::Value>,
) -> Result<serde_json::Value> {
    Ok(unwrap_data(client.post(path, body.as_ref()).await?))
}
