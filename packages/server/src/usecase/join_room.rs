//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルームコードの検証、作成 / 参加の応答、ロール通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規作成、2 人目の参加
//! - 異常系：不正なルームコード、満員の Room

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionId, JoinedRoom, MessagePusher, RepositoryError, RoomCode, RoomError,
        RoomRepository,
    },
    infrastructure::dto::websocket::ServerMessage,
};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルーム参加を実行
    ///
    /// 1. ルームコードを検証（5 文字の英数字）
    /// 2. Room を検索・作成してメンバーに追加
    /// 3. 参加者に success（トークン付き）を送信
    /// 4. 2 人目の参加であれば両者に role を送信
    ///
    /// success と role は Room のロックを保持したまま enqueue するため、
    /// どちらの接続の後続メッセージ（ready など）もその後に処理される。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room: String,
    ) -> Result<JoinedRoom, JoinRoomError> {
        let code = RoomCode::try_from(room).map_err(|_| JoinRoomError::InvalidRoomCode)?;

        let (joined, room_guard) = self
            .repository
            .join(code, connection_id.clone())
            .await
            .map_err(|e| match e {
                RepositoryError::Room(RoomError::Full) => JoinRoomError::RoomFull,
                other => JoinRoomError::Repository(other),
            })?;

        let success = if joined.created {
            tracing::info!("Connection '{}' created room '{}'", connection_id, joined.code);
            ServerMessage::created(&joined.code, connection_id)
        } else {
            tracing::info!("Connection '{}' joined room '{}'", connection_id, joined.code);
            ServerMessage::joined(&joined.code, connection_id)
        };
        self.push(connection_id, &success).await;

        if let Some(roles) = &joined.roles {
            for (member, role) in roles.entries() {
                self.push(member, &ServerMessage::Role { role }).await;
            }
            tracing::info!(
                "Room '{}' roles assigned (attacker: '{}', defender: '{}')",
                joined.code,
                roles.attacker,
                roles.defender
            );
        }
        drop(room_guard);

        Ok(joined)
    }

    async fn push(&self, connection_id: &ConnectionId, message: &ServerMessage) {
        if let Err(e) = self
            .message_pusher
            .push_to(connection_id, &message.to_json())
            .await
        {
            tracing::warn!("Failed to push to connection '{}': {}", connection_id, e);
        }
    }
}
