use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProxyError;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ShipNav {
    #[serde(rename = "systemSymbol")]
    pub system_symbol: String,
    #[serde(rename = "waypointSymbol")]
    pub waypoint_symbol: String,
    pub route: Option<ShipRoute>,
    pub status: String,
    #[serde(rename = "flightMode", default)]
    pub flight_mode: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ShipRoute {
    pub destination: ShipRouteWaypoint,
    pub origin: Option<ShipRouteWaypoint>,
    #[serde(rename = "departureTime")]
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ShipRouteWaypoint {
    pub symbol: String,
    #[serde(rename = "type", default)]
    pub waypoint_type: Option<String>,
    #[serde(rename = "systemSymbol")]
    pub system_symbol: String,
}

impl ShipNav {
    /// Short human status, e.g. "IN_TRANSIT to X1-DF55-A1 (arrives 12:04:10 UTC)"
    pub fn status_text(&self) -> String {
        match (self.status.as_str(), &self.route) {
            ("IN_TRANSIT", Some(route)) => format!(
                "IN_TRANSIT to {} (arrives {})",
                route.destination.symbol,
                route.arrival.format("%H:%M:%S UTC")
            ),
            ("DOCKED", _) => format!("DOCKED at {}", self.waypoint_symbol),
            ("IN_ORBIT", _) => format!("IN_ORBIT at {}", self.waypoint_symbol),
            (status, _) => format!("{} at {}", status, self.waypoint_symbol),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlightMode {
    Cruise,
    Burn,
    Drift,
    Stealth,
}

impl FlightMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightMode::Cruise => "CRUISE",
            FlightMode::Burn => "BURN",
            FlightMode::Drift => "DRIFT",
            FlightMode::Stealth => "STEALTH",
        }
    }
}

impl FromStr for FlightMode {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CRUISE" => Ok(FlightMode::Cruise),
            "BURN" => Ok(FlightMode::Burn),
            "DRIFT" => Ok(FlightMode::Drift),
            "STEALTH" => Ok(FlightMode::Stealth),
            other => Err(ProxyError::invalid(format!(
                "Unknown flight mode '{}', expected one of CRUISE, BURN, DRIFT, STEALTH",
                other
            ))),
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
