//! Domain 層
//!
//! マッチングの中核となる値オブジェクト、Room エンティティ、
//! および外部へのインターフェース（Repository / MessagePusher）を定義します。

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    JoinedRoom, LeaveOutcome, ReadyOutcome, RoleAssignment, Room, RoomGuard, SharedRoom,
};
pub use error::{MessagePushError, RepositoryError, RoomError, ValueObjectError};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use repository::MockRoomRepository;
pub use repository::RoomRepository;
pub use value_object::{ConnectionId, Role, RoomCode, Timestamp};
