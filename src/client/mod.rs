// Client module - SpaceTraders API access layer
pub mod api;
pub mod retry;
pub mod transport;

pub use api::{QueryParam, SpaceTradersClient};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
