use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

// API Response wrappers

/// Pagination block of list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub total: u32,
    pub page: u32,
    pub limit: u32,
}

/// `{ data: [...], meta }` envelope of list responses
#[derive(Debug, Deserialize)]
pub struct ListResponse<T = Value> {
    pub data: Vec<T>,
    pub meta: Meta,
}

/// Unwrap the `data` member of a response, leaving anything else (e.g. the
/// empty object of a 204) untouched.
pub fn unwrap_data(response: Value) -> Value {
    match response {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    }
}

pub fn parse_list(response: Value) -> Result<ListResponse> {
    Ok(serde_json::from_value(response)?)
}
