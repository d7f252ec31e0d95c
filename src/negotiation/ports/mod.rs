//! Port contracts for negotiation persistence.

pub mod repository;

pub use repository::{
    NegotiationRepository, NegotiationRepositoryError, NegotiationRepositoryResult,
};
