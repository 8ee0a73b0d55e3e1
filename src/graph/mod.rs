// Graph view of the API: references, pages, selections and nodes

pub mod executor;
pub mod node;
pub mod nodes;
pub mod page;
pub mod reference;
pub mod selection;

pub use executor::{execute, execute_str};
pub use node::{project, GraphNode, Lazy, PageNode};
pub use page::{Page, PageRequest, DEFAULT_PAGE_LIMIT};
pub use reference::{parse_references, parse_system, parse_waypoint, ContractRef, ResourceRef, ShipRef, SystemRef, WaypointRef};
pub use selection::{needs_fetch, parse_document, parse_selection, Document, Field, Operation, Selection};
