//! Unit tests for negotiation sessions.
