pub mod identity;
pub mod memory;
pub mod store;

pub use identity::{HttpIdentity, IdentityProvider, Session};
pub use memory::{MemoryIdentity, MemoryStore};
pub use store::{HttpStore, Store};
