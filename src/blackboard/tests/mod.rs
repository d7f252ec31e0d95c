//! Unit tests for the shared blackboard.
