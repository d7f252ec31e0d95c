//! Step definitions for message bus scenarios.


mod then;
mod when;
