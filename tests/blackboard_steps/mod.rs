//! Step definitions for blackboard scenarios.


mod given;
mod then;
mod when;
