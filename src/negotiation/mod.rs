//! Consensus sessions between two agents.
//!
//! A negotiation opens with a proposal, may be countered any number of
//! times, and ends either agreed or escalated to the arbitrator. Every step
//! is announced on the [message bus](crate::bus) as a reply to the opening
//! proposal.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The state machine in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
