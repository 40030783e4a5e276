// Application-API resource managers (`/api/application`).
//
// These need an application key. IDs here are the panel's numeric IDs,
// not the short server identifiers used by the client API.

mod databases;
mod locations;
mod nests;
mod nodes;
mod users;

pub use databases::{DatabaseManager, NewDatabase};
pub use locations::{LocationManager, LocationUpdate, NewLocation};
pub use nests::{EggManager, NestManager};
pub use nodes::{AllocationManager, NewAllocations, NewNode, NodeManager, NodeUpdate};
pub use users::{NewUser, UserManager, UserUpdate};
