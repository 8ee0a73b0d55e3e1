// Storage module for session state
pub mod api_cache;
pub mod session;

pub use api_cache::*;
pub use session::*;
