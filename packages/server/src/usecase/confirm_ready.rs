//! UseCase: ready ハンドシェイク処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConfirmReadyUseCase::execute() メソッド
//! - トークン検証、ready のカウント、start のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人目の ready（start なし）、2 人目の ready（start を全員に送信）
//! - 異常系：不正なトークン（カウントされない）

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, MessagePusher, ReadyOutcome, RoomError, SharedRoom},
    infrastructure::dto::websocket::ServerMessage,
};

use super::error::ConfirmReadyError;

/// ready 受理のユースケース
pub struct ConfirmReadyUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConfirmReadyUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// ready を実行
    ///
    /// 2 人目の ready で Room を開始し、Room のロックを保持したまま
    /// 全メンバーに start を enqueue する。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room: &SharedRoom,
        token: &str,
    ) -> Result<ReadyOutcome, ConfirmReadyError> {
        let mut room = room.lock().await;

        let outcome = room
            .mark_ready(connection_id, token)
            .map_err(|e| match e {
                RoomError::AlreadyReady(_) => ConfirmReadyError::AlreadyReady,
                _ => ConfirmReadyError::InvalidToken,
            })?;
        tracing::info!(
            "Connection '{}' is ready as {} in room '{}' ({}/2)",
            connection_id,
            outcome.role,
            room.code,
            room.ready_count()
        );

        if outcome.started {
            let targets = room.members.clone();
            if let Err(e) = self
                .message_pusher
                .broadcast(targets, &ServerMessage::Start.to_json())
                .await
            {
                tracing::warn!("Failed to broadcast start in room '{}': {}", room.code, e);
            }
            tracing::info!("Room '{}' started", room.code);
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockMessagePusher, Role, Room, RoomCode, Timestamp};
    use tokio::sync::Mutex;

    fn conn(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn paired_room() -> SharedRoom {
        let mut room = Room::new(
            RoomCode::new("ABCDE".to_string()).unwrap(),
            Timestamp::new(0),
        );
        room.join(conn("alice")).unwrap();
        room.join(conn("bob")).unwrap();
        Arc::new(Mutex::new(room))
    }

    #[tokio::test]
    async fn test_first_ready_does_not_broadcast_start() {
        // テスト項目: 1 人目の ready では start が送信されない
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        let usecase = ConfirmReadyUseCase::new(Arc::new(pusher));
        let room = paired_room();

        // when (操作):
        let outcome = usecase.execute(&conn("alice"), &room, "alice").await;

        // then (期待する結果):
        assert_eq!(
            outcome,
            Ok(ReadyOutcome {
                role: Role::Attacker,
                started: false
            })
        );
        assert_eq!(room.lock().await.ready_count(), 1);
    }

    #[tokio::test]
    async fn test_second_ready_broadcasts_start_to_both() {
        // テスト項目: 2 人目の ready で両メンバーに start が 1 度だけ送信される
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|targets, content| {
                targets.len() == 2
                    && targets.contains(&conn("alice"))
                    && targets.contains(&conn("bob"))
                    && content == r#"{"type":"start"}"#
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = ConfirmReadyUseCase::new(Arc::new(pusher));
        let room = paired_room();
        usecase.execute(&conn("alice"), &room, "alice").await.unwrap();

        // when (操作):
        let outcome = usecase.execute(&conn("bob"), &room, "bob").await;

        // then (期待する結果):
        assert_eq!(
            outcome,
            Ok(ReadyOutcome {
                role: Role::Defender,
                started: true
            })
        );
        assert!(room.lock().await.started);
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected_without_counting() {
        // テスト項目: 割り当てられていないトークンは Invalid token! になり、カウントされない
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        let usecase = ConfirmReadyUseCase::new(Arc::new(pusher));
        let room = paired_room();

        // when (操作):
        let result = usecase.execute(&conn("alice"), &room, "not-a-token").await;

        // then (期待する結果):
        assert_eq!(result, Err(ConfirmReadyError::InvalidToken));
        assert_eq!(result.unwrap_err().to_string(), "Invalid token!");
        assert_eq!(room.lock().await.ready_count(), 0);
    }

    #[tokio::test]
    async fn test_repeated_ready_is_reported() {
        // テスト項目: 同じ接続からの 2 回目の ready は AlreadyReady になる
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        let usecase = ConfirmReadyUseCase::new(Arc::new(pusher));
        let room = paired_room();
        usecase.execute(&conn("alice"), &room, "alice").await.unwrap();

        // when (操作):
        let result = usecase.execute(&conn("alice"), &room, "alice").await;

        // then (期待する結果):
        assert_eq!(result, Err(ConfirmReadyError::AlreadyReady));
        assert_eq!(room.lock().await.ready_count(), 1);
    }
}
