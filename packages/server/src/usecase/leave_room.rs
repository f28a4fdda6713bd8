//! UseCase: ルーム離脱処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 最後のメンバーの離脱で Room が削除されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人中 1 人の離脱（Room は残る）、最後の 1 人の離脱（Room 削除）
//! - 異常系：存在しない Room からの離脱

use std::sync::Arc;

use crate::domain::{ConnectionId, LeaveOutcome, RepositoryError, RoomCode, RoomRepository};

/// ルーム離脱のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl LeaveRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        code: &RoomCode,
    ) -> Result<LeaveOutcome, RepositoryError> {
        let outcome = self.repository.leave(code, connection_id).await?;
        match outcome {
            LeaveOutcome::RoomDeleted => {
                tracing::info!(
                    "Connection '{}' left room '{}'; room deleted",
                    connection_id,
                    code
                );
            }
            LeaveOutcome::MemberRemoved { remaining } => {
                tracing::info!(
                    "Connection '{}' left room '{}' ({} remaining)",
                    connection_id,
                    code,
                    remaining
                );
            }
            LeaveOutcome::NotAMember => {
                tracing::warn!(
                    "Connection '{}' was not a member of room '{}'",
                    connection_id,
                    code
                );
            }
        }
        Ok(outcome)
    }
}
