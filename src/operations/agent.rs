// Agent operations and credential configuration
use serde_json::{json, Value};
use tracing::info;

use crate::client::SpaceTradersClient;
use crate::error::{ProxyError, Result};
use crate::models::unwrap_data;
use crate::operations::fetch_data;
use crate::storage::Credential;

/// Either an existing token, or the fields needed to register a new agent
#[derive(Debug, Clone, Default)]
pub struct ConfigureArgs {
    pub token: Option<String>,
    pub callsign: Option<String>,
    pub faction: Option<String>,
    pub email: Option<String>,
}

pub struct AgentOperations<'a> {
    client: &'a SpaceTradersClient,
}

impl<'a> AgentOperations<'a> {
    pub fn new(client: &'a SpaceTradersClient) -> Self {
        Self { client }
    }

    pub async fn get_agent(&self) -> Result<Value> {
        fetch_data(self.client, "/my/agent").await
    }

    /// Store a token, or register `callsign` with `faction` and store the
    /// token the API hands back. Returns the stored credential details.
    pub async fn configure(&self, args: ConfigureArgs) -> Result<Value> {
        if let Some(token) = args.token.filter(|t| !t.trim().is_empty()) {
            self.client.session().set_credential(Credential::token(token.trim()));
            info!("Configured existing agent token");
            return Ok(json!({ "configured": "token" }));
        }

        let (callsign, faction) = match (args.callsign, args.faction) {
            (Some(callsign), Some(faction)) => (callsign, faction),
            _ => {
                return Err(ProxyError::Config(
                    "configure needs either a token or both callsign and faction".to_string(),
                ));
            }
        };

        let mut body = json!({ "symbol": callsign, "faction": faction });
        if let Some(email) = args.email {
            body["email"] = Value::String(email);
        }

        let data = unwrap_data(self.client.post("/register", Some(&body)).await?);
        let token = data
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| ProxyError::Config("Registration response carried no token".to_string()))?;

        self.client.session().set_credential(Credential {
            token: token.to_string(),
            agent_symbol: Some(callsign.clone()),
        });
        info!("Registered agent {} with faction {}", callsign, faction);
        Ok(data)
    }
}
