//! Utilities shared by the duelroom binaries.

pub mod logger;
pub mod time;
