//! UseCase: メッセージ中継処理
//!
//! 開始済みの Room でのみ、送信元の相手の接続へメッセージをそのまま転送する。
//! 開始前のメッセージはキューに入れず破棄する。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, SharedRoom};

/// 中継の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// 相手の接続に転送した
    Forwarded(ConnectionId),
    /// Room が未開始のため破棄した
    NotStarted,
    /// 相手が離脱済みのため破棄した
    NoPeer,
}

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayMessageUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub async fn execute(
        &self,
        from: &ConnectionId,
        room: &SharedRoom,
        content: &str,
    ) -> Result<RelayOutcome, MessagePushError> {
        let peer = {
            let room = room.lock().await;
            if !room.started {
                return Ok(RelayOutcome::NotStarted);
            }
            room.peer_of(from).cloned()
        };

        let Some(peer) = peer else {
            return Ok(RelayOutcome::NoPeer);
        };
        self.message_pusher.push_to(&peer, content).await?;
        Ok(RelayOutcome::Forwarded(peer))
    }
}
