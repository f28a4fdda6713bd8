//! Two-participant matchmaking and relay server library.
//!
//! Clients meet in a room identified by a five-character code, receive
//! complementary roles, confirm readiness, and then exchange messages that the
//! server forwards verbatim to the other participant.

pub mod config;

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
