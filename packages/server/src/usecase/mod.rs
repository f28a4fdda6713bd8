//! UseCase 層
//!
//! セッションのプロトコル（参加 → ready → 中継 → 離脱）を
//! Repository と MessagePusher を組み合わせて実現します。

mod confirm_ready;
mod error;
mod get_rooms;
mod join_room;
mod leave_room;
mod relay_message;
pub mod session;

pub use confirm_ready::ConfirmReadyUseCase;
pub use error::{ConfirmReadyError, GetRoomDetailError, JoinRoomError};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use relay_message::{RelayMessageUseCase, RelayOutcome};
pub use session::{SessionControl, SessionHandler, SessionState, SessionUseCases};
