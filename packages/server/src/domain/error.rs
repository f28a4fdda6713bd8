//! Domain 層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room code must be exactly 5 ASCII alphanumeric characters, got '{0}'")]
    InvalidRoomCode(String),

    #[error("connection id must not be empty")]
    EmptyConnectionId,
}

/// Room エンティティ操作時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// 2 人揃っている、またはロール割り当て済みの Room への参加
    #[error("room is full")]
    Full,

    #[error("connection '{0}' is already a member of the room")]
    AlreadyMember(String),

    /// 割り当て済みトークンと一致しない ready
    #[error("invalid token")]
    InvalidToken,

    #[error("connection '{0}' has already confirmed readiness")]
    AlreadyReady(String),
}

/// Repository 操作時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    /// メンバーが残っている Room は削除できない
    #[error("room '{0}' still has members")]
    RoomNotEmpty(String),

    #[error(transparent)]
    Room(#[from] RoomError),
}

/// メッセージ送信時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
