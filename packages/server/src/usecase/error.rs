//! UseCase 層のエラー型
//!
//! クライアントに返すエラーの `Display` はプロトコル上のメッセージ文字列そのもの。

use thiserror::Error;

use crate::domain::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("Invalid room code")]
    InvalidRoomCode,

    #[error("Room is full")]
    RoomFull,

    #[error("Failed to join room: {0}")]
    Repository(RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmReadyError {
    #[error("Invalid token!")]
    InvalidToken,

    #[error("Already ready")]
    AlreadyReady,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Invalid room code")]
    InvalidRoomCode,

    #[error("Room not found")]
    RoomNotFound,
}
