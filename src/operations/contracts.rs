// Contract operations module
use serde_json::{json, Value};
use tracing::info;

use crate::client::SpaceTradersClient;
use crate::error::Result;
use crate::graph::{Page, PageRequest};
use crate::operations::{fetch_data, fetch_page, post_action, ShipTarget};

#[derive(Debug, Clone)]
pub struct DeliverArgs {
    pub ship: ShipTarget,
    pub trade_symbol: String,
    pub units: u32,
}

pub struct ContractOperations<'a> {
    client: &'a SpaceTradersClient,
}

impl<'a> ContractOperations<'a> {
    pub fn new(client: &'a SpaceTradersClient) -> Self {
        Self { client }
    }

    pub async fn list_contracts(&self, request: PageRequest) -> Result<Page<Value>> {
        fetch_page(self.client, "/my/contracts", request, &[]).await
    }

    pub async fn get_contract(&self, contract_id: &str) -> Result<Value> {
        fetch_data(self.client, &format!("/my/contracts/{}", contract_id)).await
    }

    pub async fn accept_contract(&self, contract_id: &str) -> Result<Value> {
        info!("Accepting contract {}", contract_id);
        post_action(self.client, &format!("/my/contracts/{}/accept", contract_id), None).await
    }

    pub async fn fulfill_contract(&self, contract_id: &str) -> Result<Value> {
        info!("Fulfilling contract {}", contract_id);
        post_action(self.client, &format!("/my/contracts/{}/fulfill", contract_id), None).await
    }

    pub async fn deliver_contract(&self, contract_id: &str, args: DeliverArgs) -> Result<Value> {
        let ship_symbol = args.ship.resolve()?;
        let payload = json!({
            "shipSymbol": ship_symbol,
            "tradeSymbol": args.trade_symbol,
            "units": args.units
        });
        post_action(self.client, &format!("/my/contracts/{}/deliver", contract_id), Some(payload)).await
    }

    /// Ask the faction at the ship's waypoint for a new contract
    pub async fn negotiate_contract(&self, ship: &ShipTarget) -> Result<Value> {
        let ship_symbol = ship.resolve()?;
        post_action(self.client, &format!("/my/ships/{}/negotiate/contract", ship_symbol), None).await
    }
}
