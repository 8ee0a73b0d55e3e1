// Mutually exclusive "friendly reference or raw symbol" argument pairs
use crate::error::{ProxyError, Result};
use crate::graph::{ShipRef, SystemRef, WaypointRef};

fn pick_one(
    friendly_name: &str,
    friendly: Option<String>,
    symbol_name: &str,
    symbol: Option<String>,
) -> Result<Option<String>> {
    match (friendly, symbol) {
        (Some(_), Some(_)) => Err(ProxyError::invalid(format!(
            "Specify either '{}' or '{}', not both",
            friendly_name, symbol_name
        ))),
        (friendly, symbol) => Ok(friendly.or(symbol)),
    }
}

fn required(value: Option<String>, friendly_name: &str, symbol_name: &str) -> Result<String> {
    value.ok_or_else(|| {
        ProxyError::invalid(format!("One of '{}' or '{}' is required", friendly_name, symbol_name))
    })
}

/// `waypoint` / `waypointSymbol`
#[derive(Debug, Clone, Default)]
pub struct WaypointTarget {
    pub waypoint: Option<WaypointRef>,
    pub waypoint_symbol: Option<String>,
}

impl WaypointTarget {
    pub fn symbol(symbol: impl Into<String>) -> Self {
        Self {
            waypoint: None,
            waypoint_symbol: Some(symbol.into()),
        }
    }

    pub fn resolve(&self) -> Result<String> {
        let picked = pick_one(
            "waypoint",
            self.waypoint.as_ref().map(|w| w.symbol.clone()),
            "waypointSymbol",
            self.waypoint_symbol.clone(),
        )?;
        required(picked, "waypoint", "waypointSymbol")
    }
}

/// `ship` / `shipSymbol`
#[derive(Debug, Clone, Default)]
pub struct ShipTarget {
    pub ship: Option<ShipRef>,
    pub ship_symbol: Option<String>,
}

impl ShipTarget {
    pub fn symbol(symbol: impl Into<String>) -> Self {
        Self {
            ship: None,
            ship_symbol: Some(symbol.into()),
        }
    }

    pub fn resolve(&self) -> Result<String> {
        let picked = pick_one(
            "ship",
            self.ship.as_ref().map(|s| s.symbol.clone()),
            "shipSymbol",
            self.ship_symbol.clone(),
        )?;
        required(picked, "ship", "shipSymbol")
    }
}

/// `system` / `systemSymbol`
#[derive(Debug, Clone, Default)]
pub struct SystemTarget {
    pub system: Option<SystemRef>,
    pub system_symbol: Option<String>,
}

impl SystemTarget {
    pub fn resolve(&self) -> Result<String> {
        let picked = pick_one(
            "system",
            self.system.as_ref().map(|s| s.symbol.clone()),
            "systemSymbol",
            self.system_symbol.clone(),
        )?;
        required(picked, "system", "systemSymbol")
    }
}
