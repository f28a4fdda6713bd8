//! Data Transfer Objects (DTOs).
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket protocol messages
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
