//! Port contracts for blackboard storage.

pub mod store;

pub use store::{BlackboardStore, BlackboardStoreError, BlackboardStoreResult};
