// Faction operations
use serde_json::Value;

use crate::client::SpaceTradersClient;
use crate::error::Result;
use crate::graph::{Page, PageRequest};
use crate::operations::{fetch_data, fetch_page};

pub struct FactionOperations<'a> {
    client: &'a SpaceTradersClient,
}

impl<'a> FactionOperations<'a> {
    pub fn new(client: &'a SpaceTradersClient) -> Self {
        Self { client }
    }

    pub async fn list_factions(&self, request: PageRequest) -> Result<Page<Value>> {
        fetch_page(self.client, "/factions", request, &[]).await
    }

    pub async fn get_faction(&self, faction_symbol: &str) -> Result<Value> {
        fetch_data(self.client, &format!("/factions/{}", faction_symbol)).await
    }
}
