// Models module - typed views over the few API shapes the proxy inspects

pub mod responses;
pub mod ship;
pub mod waypoint;

pub use responses::*;
pub use ship::*;
pub use waypoint::*;
