//! Client-side navigation for the SportCare dashboard: the current path, the
//! route table that maps it to a view, and the guard in front of protected views.

pub mod guard;
pub mod navigation;
pub mod paths;
pub mod router;

pub use guard::{evaluate, landing_redirect, Access, RouteGuard};
pub use navigation::{History, MemoryHistory, Navigator};
pub use router::{Params, RouteMatch, RoutePattern, RouteTable, Segment};
