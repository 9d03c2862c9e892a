//! Observable resource stores driving the console views.
//!
//! Each store owns its collection, publishes state snapshots through a
//! watch channel, and funnels every remote operation through a port so the
//! data source can be swapped or mocked.

pub mod payments;
pub mod users;

pub use payments::{PaymentsState, PaymentsStore};
pub use users::{UsersState, UsersStore};
