// Graph nodes, one module per area of the game
pub mod actions;
pub mod agent;
pub mod contract;
pub mod root;
pub mod ship;
pub mod universe;

pub use actions::*;
pub use agent::*;
pub use contract::*;
pub use root::*;
pub use ship::*;
pub use universe::*;

use serde_json::Value;

use crate::error::{ProxyError, Result};
use crate::graph::{parse_system, parse_waypoint, Field, ShipRef};
use crate::operations::{ShipTarget, SystemTarget, WaypointTarget};

/// `waypoint` (free text, parsed) / `waypointSymbol` (raw) argument pair
pub(crate) fn waypoint_target(field: &Field) -> Result<WaypointTarget> {
    let waypoint = match field.arg_str("waypoint")? {
        Some(text) => Some(
            parse_waypoint(&text)
                .ok_or_else(|| ProxyError::invalid(format!("'{}' is not a waypoint symbol", text)))?,
        ),
        None => None,
    };
    Ok(WaypointTarget {
        waypoint,
        waypoint_symbol: field.arg_str("waypointSymbol")?,
    })
}

/// `ship` / `shipSymbol` argument pair
pub(crate) fn ship_target(field: &Field) -> Result<ShipTarget> {
    Ok(ShipTarget {
        ship: field.arg_str("ship")?.map(|symbol| ShipRef { symbol }),
        ship_symbol: field.arg_str("shipSymbol")?,
    })
}

/// `system` (free text, parsed) / `systemSymbol` (raw) argument pair
pub(crate) fn system_target(field: &Field) -> Result<SystemTarget> {
    let system = match field.arg_str("system")? {
        Some(text) => Some(
            parse_system(&text).ok_or_else(|| ProxyError::invalid(format!("'{}' is not a system symbol", text)))?,
        ),
        None => None,
    };
    Ok(SystemTarget {
        system,
        system_symbol: field.arg_str("systemSymbol")?,
    })
}

pub(crate) fn str_field<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    value.get(key).and_then(Value::as_str)
}
