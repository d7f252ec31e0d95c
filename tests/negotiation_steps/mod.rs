//! Step definitions for negotiation scenarios.

pub mod world;

mod given;
mod then;
mod when;
