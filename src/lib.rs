// SpaceTraders graph proxy library
// Lazily resolved graph view over the SpaceTraders v2 API, with actions forwarded as REST calls

pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod operations;
pub mod storage;
pub mod verbosity;

// Re-export commonly used types
pub use client::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport, SpaceTradersClient};
pub use config::{load_agent_token, ProxyConfig};
pub use error::{ErrorKind, ProxyError, Result};
pub use graph::{execute, execute_str, parse_document, parse_references, ResourceRef, WaypointRef};
pub use operations::{ArrivalEvent, ArrivalScheduler, Proxy};
pub use storage::{CacheKind, Credential, Session};

// Constants
pub const API_BASE_URL: &str = "https://api.spacetraders.io/v2";
pub const AGENT_TOKEN_FILE: &str = "AGENT_TOKEN";
pub const DEFAULT_CONFIG_FILE: &str = "spacetraders_graph.toml";
