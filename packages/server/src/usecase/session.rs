//! UseCase: 接続ごとのセッション状態機械
//!
//! `AwaitingInit → AwaitingReady → Relaying`、どの状態からも `Closed` へ遷移する。
//! 参加（Joining）は `init` の処理中にのみ存在する一時的な状態。
//!
//! ## プロトコル違反時の方針
//!
//! 各フェーズ最初のメッセージ（`init` / `ready`）がデコードできない、`type` が違う、
//! 必須フィールドが無い場合は、`error` を送信したうえで接続を閉じる
//! （[`SessionControl::Close`]）。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SessionHandler の状態遷移と、各接続に届くメッセージの順序
//!
//! ### どのような状況を想定しているか
//! - 正常系：作成 → 参加 → ロール → ready × 2 → start → 中継
//! - 異常系：不正なルームコード、不正な init / ready、不正なトークン、満員
//! - エッジケース：開始前のメッセージ、切断によるクリーンアップ、コードの再利用

use std::{sync::Arc, time::Duration};

use tokio::time::Instant;

use crate::{
    domain::{ConnectionId, JoinedRoom, MessagePusher, Role, RoomCode, RoomRepository},
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
};

use super::{
    ConfirmReadyError, ConfirmReadyUseCase, JoinRoomError, JoinRoomUseCase, LeaveRoomUseCase,
    RelayMessageUseCase, RelayOutcome,
};

/// 不正な init メッセージへの応答
pub const INVALID_INIT_MESSAGE: &str = "Invalid init message";
/// 不正な ready メッセージへの応答
pub const INVALID_READY_MESSAGE: &str = "Invalid ready message";
/// ready ハンドシェイクのタイムアウト時の応答
pub const READY_TIMEOUT_MESSAGE: &str = "Ready timeout";

/// セッションが使うユースケース一式（全接続で共有）
#[derive(Clone)]
pub struct SessionUseCases {
    pub join_room: Arc<JoinRoomUseCase>,
    pub confirm_ready: Arc<ConfirmReadyUseCase>,
    pub relay_message: Arc<RelayMessageUseCase>,
    pub leave_room: Arc<LeaveRoomUseCase>,
    pub message_pusher: Arc<dyn MessagePusher>,
}

impl SessionUseCases {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            join_room: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            confirm_ready: Arc::new(ConfirmReadyUseCase::new(message_pusher.clone())),
            relay_message: Arc::new(RelayMessageUseCase::new(message_pusher.clone())),
            leave_room: Arc::new(LeaveRoomUseCase::new(repository)),
            message_pusher,
        }
    }
}

/// 外部から観測できるセッションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInit,
    AwaitingReady,
    Relaying,
    Closed,
}

/// メッセージ処理後に接続をどうするか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Continue,
    /// プロトコル違反。理由を close frame に載せて接続を閉じる
    Close(&'static str),
}

enum Phase {
    AwaitingInit,
    AwaitingReady {
        joined: JoinedRoom,
        deadline: Option<Instant>,
    },
    Relaying {
        joined: JoinedRoom,
        role: Role,
    },
    Closed,
}

/// 1 接続分のセッション
///
/// 接続を所有するハンドラーだけが操作し、他の接続と共有されない。
pub struct SessionHandler {
    connection_id: ConnectionId,
    phase: Phase,
    usecases: SessionUseCases,
    ready_timeout: Option<Duration>,
}

impl SessionHandler {
    pub fn new(
        connection_id: ConnectionId,
        usecases: SessionUseCases,
        ready_timeout: Option<Duration>,
    ) -> Self {
        Self {
            connection_id,
            phase: Phase::AwaitingInit,
            usecases,
            ready_timeout,
        }
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::AwaitingInit => SessionState::AwaitingInit,
            Phase::AwaitingReady { .. } => SessionState::AwaitingReady,
            Phase::Relaying { .. } => SessionState::Relaying,
            Phase::Closed => SessionState::Closed,
        }
    }

    /// ready 済みの場合のロール
    pub fn role(&self) -> Option<Role> {
        match self.phase {
            Phase::Relaying { role, .. } => Some(role),
            _ => None,
        }
    }

    /// 参加中の Room のコード
    pub fn room_code(&self) -> Option<&RoomCode> {
        match &self.phase {
            Phase::AwaitingReady { joined, .. } | Phase::Relaying { joined, .. } => {
                Some(&joined.code)
            }
            _ => None,
        }
    }

    /// ready を待っている場合の期限（タイムアウト設定時のみ）
    pub fn ready_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::AwaitingReady { deadline, .. } => deadline,
            _ => None,
        }
    }

    /// 受信したテキストメッセージを処理する
    pub async fn handle_text(&mut self, text: &str) -> SessionControl {
        match self.state() {
            SessionState::AwaitingInit => self.handle_init(text).await,
            SessionState::AwaitingReady => self.handle_ready(text).await,
            SessionState::Relaying => self.handle_relay(text).await,
            SessionState::Closed => {
                tracing::debug!(
                    "Ignoring message from connection '{}' after session closed",
                    self.connection_id
                );
                SessionControl::Continue
            }
        }
    }

    /// ready の期限切れを処理する
    pub async fn handle_ready_timeout(&mut self) -> SessionControl {
        if self.state() != SessionState::AwaitingReady {
            return SessionControl::Continue;
        }
        tracing::warn!(
            "Connection '{}' did not send ready in time",
            self.connection_id
        );
        self.reject(READY_TIMEOUT_MESSAGE).await
    }

    /// 接続終了時のクリーンアップ（Room からの離脱、空なら Room 削除）
    pub async fn close(&mut self) {
        let phase = std::mem::replace(&mut self.phase, Phase::Closed);
        let joined = match phase {
            Phase::AwaitingReady { joined, .. } | Phase::Relaying { joined, .. } => joined,
            Phase::AwaitingInit | Phase::Closed => return,
        };

        if let Err(e) = self
            .usecases
            .leave_room
            .execute(&self.connection_id, &joined.code)
            .await
        {
            tracing::warn!(
                "Failed to remove connection '{}' from room '{}': {}",
                self.connection_id,
                joined.code,
                e
            );
        }
    }

    async fn handle_init(&mut self, text: &str) -> SessionControl {
        let room = match ClientMessage::parse(text) {
            Ok(ClientMessage::Init { room }) => room,
            Ok(other) => {
                tracing::warn!("Expected init, got {:?}", other);
                return self.reject(INVALID_INIT_MESSAGE).await;
            }
            Err(e) => {
                tracing::warn!("Failed to parse init message: {}", e);
                return self.reject(INVALID_INIT_MESSAGE).await;
            }
        };

        match self
            .usecases
            .join_room
            .execute(&self.connection_id, room)
            .await
        {
            Ok(joined) => {
                self.phase = Phase::AwaitingReady {
                    joined,
                    deadline: self.ready_timeout.map(|timeout| Instant::now() + timeout),
                };
            }
            Err(e @ (JoinRoomError::InvalidRoomCode | JoinRoomError::RoomFull)) => {
                tracing::info!("Connection '{}' rejected: {}", self.connection_id, e);
                self.send_error(&e.to_string()).await;
                self.phase = Phase::Closed;
            }
            Err(e) => {
                tracing::error!("Connection '{}' failed to join: {}", self.connection_id, e);
                self.send_error("Internal error").await;
                self.phase = Phase::Closed;
            }
        }
        SessionControl::Continue
    }

    async fn handle_ready(&mut self, text: &str) -> SessionControl {
        let token = match ClientMessage::parse(text) {
            Ok(ClientMessage::Ready { token }) => token,
            Ok(other) => {
                tracing::warn!("Expected ready, got {:?}", other);
                return self.reject(INVALID_READY_MESSAGE).await;
            }
            Err(e) => {
                tracing::warn!("Failed to parse ready message: {}", e);
                return self.reject(INVALID_READY_MESSAGE).await;
            }
        };

        let Phase::AwaitingReady { joined, .. } = &self.phase else {
            return SessionControl::Continue;
        };
        let joined = joined.clone();

        match self
            .usecases
            .confirm_ready
            .execute(&self.connection_id, &joined.room, &token)
            .await
        {
            Ok(outcome) => {
                self.phase = Phase::Relaying {
                    joined,
                    role: outcome.role,
                };
            }
            Err(e @ ConfirmReadyError::InvalidToken) => {
                tracing::info!("Connection '{}' sent an invalid token", self.connection_id);
                self.send_error(&e.to_string()).await;
            }
            Err(e @ ConfirmReadyError::AlreadyReady) => {
                tracing::warn!("Connection '{}': {}", self.connection_id, e);
            }
        }
        SessionControl::Continue
    }

    async fn handle_relay(&mut self, text: &str) -> SessionControl {
        let Phase::Relaying { joined, role } = &self.phase else {
            return SessionControl::Continue;
        };

        match self
            .usecases
            .relay_message
            .execute(&self.connection_id, &joined.room, text)
            .await
        {
            Ok(RelayOutcome::Forwarded(peer)) => {
                tracing::debug!("Relayed message from {} to '{}'", role, peer);
            }
            Ok(RelayOutcome::NotStarted) => {
                tracing::debug!(
                    "Dropped message from '{}': room '{}' not started",
                    self.connection_id,
                    joined.code
                );
            }
            Ok(RelayOutcome::NoPeer) => {
                tracing::debug!(
                    "Dropped message from '{}': peer has left room '{}'",
                    self.connection_id,
                    joined.code
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to relay message from '{}': {}",
                    self.connection_id,
                    e
                );
            }
        }
        SessionControl::Continue
    }

    async fn reject(&self, reason: &'static str) -> SessionControl {
        self.send_error(reason).await;
        SessionControl::Close(reason)
    }

    async fn send_error(&self, message: &str) {
        let content = ServerMessage::error(message).to_json();
        if let Err(e) = self
            .usecases
            .message_pusher
            .push_to(&self.connection_id, &content)
            .await
        {
            tracing::warn!(
                "Failed to send error to connection '{}': {}",
                self.connection_id,
                e
            );
        }
    }
}
