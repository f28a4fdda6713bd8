//! HTTP API response DTOs.

use serde::Serialize;

/// Room summary. Connection tokens are deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummaryDto {
    pub code: String,
    pub members: usize,
    pub ready: usize,
    pub roles_assigned: bool,
    pub started: bool,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

/// Liveness probe response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub rooms: usize,
}
